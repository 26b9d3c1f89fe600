pub mod extract;
pub mod pages;
pub mod router;
pub mod routes;

pub use router::{CellhubState, cellhub_router};
