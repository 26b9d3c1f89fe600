//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `devices` table (aggregate root)
/// - `batteries` table (owned by exactly one device, removed with it)
///
/// Ids use `AUTOINCREMENT` so a deleted id is never handed out again.
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Devices
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL
);

-- ---------------------------------------------------------------------------
-- Batteries (at most 5 per device, enforced by the data-access layer)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS batteries (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL,
    device_id INTEGER NOT NULL REFERENCES devices(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_batteries_device_id ON batteries(device_id);
"#;
