use crate::error::{CellhubError, Entity};
use crate::server::extract::{ValidForm, ValidPath};
use crate::server::pages;
use crate::server::router::CellhubState;
use axum::{
    Json,
    extract::State,
    response::{Html, Redirect},
};
use cellhub_schema::{BatteryForm, MessageBody};

/// GET /batteries
pub async fn list(State(state): State<CellhubState>) -> Result<Html<String>, CellhubError> {
    let batteries = state.db.get_batteries().await?;
    Ok(Html(pages::battery_list(&batteries)))
}

/// POST /batteries
///
/// 400 when the device does not exist or already owns the maximum number of batteries.
pub async fn create(
    State(state): State<CellhubState>,
    ValidForm(form): ValidForm<BatteryForm>,
) -> Result<Redirect, CellhubError> {
    let battery = state.db.add_battery(form.name, form.device_id).await?;
    Ok(Redirect::to(&format!("/batteries/{}", battery.id)))
}

/// GET /batteries/{battery_id}
pub async fn show(
    State(state): State<CellhubState>,
    ValidPath(battery_id): ValidPath<i64>,
) -> Result<Html<String>, CellhubError> {
    let battery = state
        .db
        .get_battery(battery_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Battery))?;
    Ok(Html(pages::battery_detail(&battery)))
}

/// POST /batteries/{battery_id}
pub async fn update(
    State(state): State<CellhubState>,
    ValidPath(battery_id): ValidPath<i64>,
    ValidForm(form): ValidForm<BatteryForm>,
) -> Result<Redirect, CellhubError> {
    state
        .db
        .update_battery(battery_id, form.name, form.device_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Battery))?;
    Ok(Redirect::to(&format!("/batteries/{battery_id}")))
}

/// DELETE /batteries/{battery_id}
pub async fn remove(
    State(state): State<CellhubState>,
    ValidPath(battery_id): ValidPath<i64>,
) -> Result<Json<MessageBody>, CellhubError> {
    state
        .db
        .delete_battery(battery_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Battery))?;
    Ok(Json(MessageBody::new("Battery deleted successfully")))
}
