use thiserror::Error as ThisError;

/// Domain-constraint violations raised by the data-access layer.
///
/// These are distinct from "not found" results, which are returned as `None`.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum InventoryError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Device not found")]
    DeviceNotFound { device_id: i64 },

    #[error("Device already has {limit} batteries")]
    BatteryLimitReached { device_id: i64, limit: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_message_names_the_cap() {
        let err = InventoryError::BatteryLimitReached {
            device_id: 1,
            limit: 5,
        };
        assert_eq!(err.to_string(), "Device already has 5 batteries");
    }
}
