//! Database module: models, schema and data access for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `ops.rs`: transactional device/battery operations
//! - `actor.rs`: the actor that owns the pool and serializes access

pub mod actor;
pub mod commands;
pub mod models;
pub mod schema;

mod ops;

pub use actor::{DbActorHandle, spawn, spawn_with};
pub use commands::{BatteryCreate, BatteryUpdate, DeviceUpdate};
pub use models::{DbBattery, DbDevice};
pub use ops::MAX_BATTERIES_PER_DEVICE;
pub use schema::SQLITE_INIT;
