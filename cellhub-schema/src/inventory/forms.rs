use serde::{Deserialize, Serialize};

/// `application/x-www-form-urlencoded` body for device create/update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceForm {
    pub name: String,
}

/// `application/x-www-form-urlencoded` body for battery create/update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatteryForm {
    pub name: String,
    /// Owning device. Non-integer input is rejected by the form extractor.
    pub device_id: i64,
}
