pub mod api;
pub mod batteries;
pub mod devices;
pub mod home;
