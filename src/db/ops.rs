//! Device/battery data access.
//!
//! Every mutation runs inside its own `sqlx` transaction. It is committed on the
//! success path; any early return drops the `Transaction`, which rolls it back and
//! hands the connection back to the pool.
//!
//! Not-found is `Ok(None)`. Only domain-constraint violations are errors.

use super::commands::{BatteryCreate, BatteryUpdate, DeviceUpdate};
use super::models::{DbBattery, DbDevice};
use crate::error::{CellhubError, InventoryError};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

/// Maximum number of batteries a single device may own.
pub const MAX_BATTERIES_PER_DEVICE: i64 = 5;

fn normalize_name(name: &str) -> Result<String, InventoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::EmptyName);
    }
    Ok(trimmed.to_string())
}

async fn fetch_device(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<DbDevice>, sqlx::Error> {
    sqlx::query_as::<_, DbDevice>("SELECT id, name FROM devices WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

async fn fetch_battery(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<DbBattery>, sqlx::Error> {
    sqlx::query_as::<_, DbBattery>("SELECT id, name, device_id FROM batteries WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Checks that `device_id` exists and can take one more battery.
async fn ensure_capacity(conn: &mut SqliteConnection, device_id: i64) -> Result<(), CellhubError> {
    if fetch_device(&mut *conn, device_id).await?.is_none() {
        return Err(InventoryError::DeviceNotFound { device_id }.into());
    }

    let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM batteries WHERE device_id = ?")
        .bind(device_id)
        .fetch_one(&mut *conn)
        .await?;

    if owned >= MAX_BATTERIES_PER_DEVICE {
        return Err(InventoryError::BatteryLimitReached {
            device_id,
            limit: MAX_BATTERIES_PER_DEVICE,
        }
        .into());
    }
    Ok(())
}

pub(super) async fn get_device(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<DbDevice>, CellhubError> {
    let mut conn = pool.acquire().await?;
    Ok(fetch_device(&mut conn, id).await?)
}

pub(super) async fn get_devices(pool: &SqlitePool) -> Result<Vec<DbDevice>, CellhubError> {
    let rows = sqlx::query_as::<_, DbDevice>("SELECT id, name FROM devices ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub(super) async fn add_device(pool: &SqlitePool, name: &str) -> Result<DbDevice, CellhubError> {
    let name = normalize_name(name)?;

    let mut tx = pool.begin().await?;
    let device = sqlx::query_as::<_, DbDevice>(
        "INSERT INTO devices (name) VALUES (?) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(device_id = device.id, name = %device.name, "device created");
    Ok(device)
}

pub(super) async fn update_device(
    pool: &SqlitePool,
    update: DeviceUpdate,
) -> Result<Option<DbDevice>, CellhubError> {
    let mut tx = pool.begin().await?;
    if fetch_device(&mut tx, update.id).await?.is_none() {
        debug!(device_id = update.id, "update skipped: device not found");
        return Ok(None);
    }
    let name = normalize_name(&update.name)?;

    let device = sqlx::query_as::<_, DbDevice>(
        "UPDATE devices SET name = ? WHERE id = ? RETURNING id, name",
    )
    .bind(name)
    .bind(update.id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(device_id = device.id, name = %device.name, "device updated");
    Ok(Some(device))
}

/// Removes the device together with every battery it owns.
pub(super) async fn delete_device(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<DbDevice>, CellhubError> {
    let mut tx = pool.begin().await?;
    let Some(device) = fetch_device(&mut tx, id).await? else {
        debug!(device_id = id, "delete skipped: device not found");
        return Ok(None);
    };

    let cascaded = sqlx::query("DELETE FROM batteries WHERE device_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM devices WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(device_id = id, cascaded, "device deleted");
    Ok(Some(device))
}

pub(super) async fn list_device_batteries(
    pool: &SqlitePool,
    device_id: i64,
) -> Result<Vec<DbBattery>, CellhubError> {
    let rows = sqlx::query_as::<_, DbBattery>(
        "SELECT id, name, device_id FROM batteries WHERE device_id = ? ORDER BY id",
    )
    .bind(device_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub(super) async fn get_battery(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<DbBattery>, CellhubError> {
    let mut conn = pool.acquire().await?;
    Ok(fetch_battery(&mut conn, id).await?)
}

pub(super) async fn get_batteries(pool: &SqlitePool) -> Result<Vec<DbBattery>, CellhubError> {
    let rows =
        sqlx::query_as::<_, DbBattery>("SELECT id, name, device_id FROM batteries ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub(super) async fn add_battery(
    pool: &SqlitePool,
    create: BatteryCreate,
) -> Result<DbBattery, CellhubError> {
    let name = normalize_name(&create.name)?;

    let mut tx = pool.begin().await?;
    ensure_capacity(&mut tx, create.device_id).await?;

    let battery = sqlx::query_as::<_, DbBattery>(
        "INSERT INTO batteries (name, device_id) VALUES (?, ?) RETURNING id, name, device_id",
    )
    .bind(name)
    .bind(create.device_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(
        battery_id = battery.id,
        device_id = battery.device_id,
        name = %battery.name,
        "battery created"
    );
    Ok(battery)
}

pub(super) async fn update_battery(
    pool: &SqlitePool,
    update: BatteryUpdate,
) -> Result<Option<DbBattery>, CellhubError> {
    let mut tx = pool.begin().await?;
    let Some(current) = fetch_battery(&mut tx, update.id).await? else {
        debug!(battery_id = update.id, "update skipped: battery not found");
        return Ok(None);
    };
    let name = normalize_name(&update.name)?;

    let reparented = current.device_id != update.device_id;
    if reparented {
        ensure_capacity(&mut tx, update.device_id).await?;
    }

    let battery = sqlx::query_as::<_, DbBattery>(
        "UPDATE batteries SET name = ?, device_id = ? WHERE id = ? RETURNING id, name, device_id",
    )
    .bind(name)
    .bind(update.device_id)
    .bind(update.id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(
        battery_id = battery.id,
        device_id = battery.device_id,
        from_device_id = current.device_id,
        reparented,
        "battery updated"
    );
    Ok(Some(battery))
}

pub(super) async fn delete_battery(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<DbBattery>, CellhubError> {
    let mut tx = pool.begin().await?;
    let Some(battery) = sqlx::query_as::<_, DbBattery>(
        "DELETE FROM batteries WHERE id = ? RETURNING id, name, device_id",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        debug!(battery_id = id, "delete skipped: battery not found");
        return Ok(None);
    };
    tx.commit().await?;

    info!(battery_id = id, device_id = battery.device_id, "battery deleted");
    Ok(Some(battery))
}
