use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatteryView {
    pub id: i64,
    pub name: String,
    pub device_id: i64,
}

/// A device together with the batteries it currently owns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceView {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub batteries: Vec<BatteryView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_without_batteries_field_defaults_to_empty() {
        let device: DeviceView = serde_json::from_str(r#"{"id":3,"name":"Sensor-A"}"#).unwrap();
        assert_eq!(device.id, 3);
        assert!(device.batteries.is_empty());
    }
}
