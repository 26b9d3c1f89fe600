mod cellhub;
mod inventory;

pub use cellhub::{CellhubError, Entity};
pub use inventory::InventoryError;
