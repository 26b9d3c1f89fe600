use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryCreate {
    pub name: String,
    pub device_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryUpdate {
    pub id: i64,
    pub name: String,
    /// New owner. Re-parenting is subject to the same checks as creation.
    pub device_id: i64,
}
