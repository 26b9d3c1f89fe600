use cellhub_schema::{BatteryView, DeviceView};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DbDevice {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DbBattery {
    pub id: i64,
    pub name: String,
    /// Owning device; always references an existing `devices.id`.
    pub device_id: i64,
}

impl From<DbBattery> for BatteryView {
    fn from(row: DbBattery) -> Self {
        Self {
            id: row.id,
            name: row.name,
            device_id: row.device_id,
        }
    }
}

impl DbDevice {
    pub fn into_view(self, batteries: Vec<DbBattery>) -> DeviceView {
        DeviceView {
            id: self.id,
            name: self.name,
            batteries: batteries.into_iter().map(BatteryView::from).collect(),
        }
    }
}
