//! Read-only JSON views of the inventory.

use crate::db::DbBattery;
use crate::error::{CellhubError, Entity};
use crate::server::extract::ValidPath;
use crate::server::router::CellhubState;
use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use cellhub_schema::{BatteryView, DeviceView};
use std::collections::HashMap;

pub fn router() -> Router<CellhubState> {
    Router::new()
        .route("/devices", get(list_devices))
        .route("/devices/{device_id}", get(get_device))
        .route("/batteries", get(list_batteries))
        .route("/batteries/{battery_id}", get(get_battery))
}

/// GET /api/devices
async fn list_devices(
    State(state): State<CellhubState>,
) -> Result<Json<Vec<DeviceView>>, CellhubError> {
    let devices = state.db.get_devices().await?;

    let mut by_device: HashMap<i64, Vec<DbBattery>> = HashMap::new();
    for battery in state.db.get_batteries().await? {
        by_device.entry(battery.device_id).or_default().push(battery);
    }

    let views = devices
        .into_iter()
        .map(|device| {
            let batteries = by_device.remove(&device.id).unwrap_or_default();
            device.into_view(batteries)
        })
        .collect();
    Ok(Json(views))
}

/// GET /api/devices/{device_id}
async fn get_device(
    State(state): State<CellhubState>,
    ValidPath(device_id): ValidPath<i64>,
) -> Result<Json<DeviceView>, CellhubError> {
    let device = state
        .db
        .get_device(device_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Device))?;
    let batteries = state.db.list_device_batteries(device_id).await?;
    Ok(Json(device.into_view(batteries)))
}

/// GET /api/batteries
async fn list_batteries(
    State(state): State<CellhubState>,
) -> Result<Json<Vec<BatteryView>>, CellhubError> {
    let batteries = state.db.get_batteries().await?;
    Ok(Json(batteries.into_iter().map(BatteryView::from).collect()))
}

/// GET /api/batteries/{battery_id}
async fn get_battery(
    State(state): State<CellhubState>,
    ValidPath(battery_id): ValidPath<i64>,
) -> Result<Json<BatteryView>, CellhubError> {
    let battery = state
        .db
        .get_battery(battery_id)
        .await?
        .ok_or(CellhubError::NotFound(Entity::Battery))?;
    Ok(Json(battery.into()))
}
