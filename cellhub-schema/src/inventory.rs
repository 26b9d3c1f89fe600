mod forms;
mod views;

pub use forms::{BatteryForm, DeviceForm};
pub use views::{BatteryView, DeviceView};
