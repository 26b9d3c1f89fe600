pub mod detail;
pub mod inventory;

pub use detail::{DetailBody, MessageBody};
pub use inventory::{BatteryForm, BatteryView, DeviceForm, DeviceView};
