use crate::error::{CellhubError, Entity};
use crate::server::extract::{ValidForm, ValidPath};
use crate::server::pages;
use crate::server::router::CellhubState;
use axum::{
    Json,
    extract::State,
    response::{Html, Redirect},
};
use cellhub_schema::{DeviceForm, MessageBody};

/// POST /devices
pub async fn create(
    State(state): State<CellhubState>,
    ValidForm(form): ValidForm<DeviceForm>,
) -> Result<Redirect, CellhubError> {
    let device = state.db.add_device(form.name).await?;
    Ok(Redirect::to(&format!("/devices/{}", device.id)))
}

/// GET /devices
pub async fn list(State(state): State<CellhubState>) -> Result<Html<String>, CellhubError> {
    let devices = state.db.get_devices().await?;
    Ok(Html(pages::device_list(&devices)))
}

/// GET /devices/{device_id}
pub async fn show(
    State(state): State<CellhubState>,
    ValidPath(device_id): ValidPath<i64>,
) -> Result<Html<String>, CellhubError> {
    let device = state
        .db
        .get_device(device_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Device))?;
    let batteries = state.db.list_device_batteries(device_id).await?;
    Ok(Html(pages::device_detail(&device, &batteries)))
}

/// POST /devices/{device_id}
pub async fn update(
    State(state): State<CellhubState>,
    ValidPath(device_id): ValidPath<i64>,
    ValidForm(form): ValidForm<DeviceForm>,
) -> Result<Redirect, CellhubError> {
    state
        .db
        .update_device(device_id, form.name)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Device))?;
    Ok(Redirect::to(&format!("/devices/{device_id}")))
}

/// DELETE /devices/{device_id}
///
/// Batteries owned by the device are deleted with it.
pub async fn remove(
    State(state): State<CellhubState>,
    ValidPath(device_id): ValidPath<i64>,
) -> Result<Json<MessageBody>, CellhubError> {
    state
        .db
        .delete_device(device_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Device))?;
    Ok(Json(MessageBody::new("Device deleted successfully")))
}
