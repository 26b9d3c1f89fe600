use cellhub::db::MAX_BATTERIES_PER_DEVICE;
use cellhub::{CellhubError, InventoryError};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

fn temp_db(tag: &str) -> (String, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let db_path = std::env::temp_dir().join(format!(
        "cellhub-battery-{tag}-{}-{nanos}.sqlite",
        std::process::id()
    ));
    let database_url = format!("sqlite:{}", db_path.display());
    (database_url, db_path)
}

async fn remove_db(db_path: &Path) {
    let wal_path = PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    let _ = fs::remove_file(db_path).await;
}

#[tokio::test]
async fn test_battery_create_then_read_round_trip() {
    let (database_url, db_path) = temp_db("roundtrip");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let device = db.add_device("Sensor-A").await.unwrap();
    let battery = db.add_battery("Cell-1", device.id).await.unwrap();
    assert!(battery.id > 0);
    assert_eq!(battery.name, "Cell-1");
    assert_eq!(battery.device_id, device.id);

    assert_eq!(db.get_battery(battery.id).await.unwrap(), Some(battery.clone()));
    assert_eq!(db.get_batteries().await.unwrap(), vec![battery.clone()]);
    assert_eq!(
        db.list_device_batteries(device.id).await.unwrap(),
        vec![battery]
    );

    remove_db(&db_path).await;
}

#[tokio::test]
async fn test_sixth_battery_is_rejected_without_mutation() {
    let (database_url, db_path) = temp_db("limit");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let device = db.add_device("Sensor-A").await.unwrap();
    for i in 1..=MAX_BATTERIES_PER_DEVICE {
        db.add_battery(format!("Cell-{i}"), device.id)
            .await
            .unwrap_or_else(|e| panic!("battery {i} should be accepted: {e}"));
    }

    let err = db.add_battery("Cell-6", device.id).await.unwrap_err();
    match err {
        CellhubError::Inventory(InventoryError::BatteryLimitReached { device_id, limit }) => {
            assert_eq!(device_id, device.id);
            assert_eq!(limit, 5);
        }
        other => panic!("expected battery limit error, got {other:?}"),
    }
    assert_eq!(err_message(&db, device.id).await, "Device already has 5 batteries");

    let owned = db.list_device_batteries(device.id).await.unwrap();
    assert_eq!(owned.len(), 5);
    assert!(owned.iter().all(|b| b.name != "Cell-6"));
    assert_eq!(db.get_batteries().await.unwrap().len(), 5);

    // Freeing a slot makes room again.
    db.delete_battery(owned[0].id).await.unwrap();
    db.add_battery("Cell-6", device.id).await.unwrap();
    assert_eq!(db.list_device_batteries(device.id).await.unwrap().len(), 5);

    remove_db(&db_path).await;
}

async fn err_message(db: &cellhub::db::DbActorHandle, device_id: i64) -> String {
    db.add_battery("Overflow", device_id)
        .await
        .expect_err("device should be full")
        .to_string()
}

#[tokio::test]
async fn test_battery_for_missing_device_is_rejected() {
    let (database_url, db_path) = temp_db("orphan");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let err = db.add_battery("Orphan", 999).await.unwrap_err();
    assert!(matches!(
        err,
        CellhubError::Inventory(InventoryError::DeviceNotFound { device_id: 999 })
    ));
    assert_eq!(err.to_string(), "Device not found");
    assert!(db.get_batteries().await.unwrap().is_empty());

    remove_db(&db_path).await;
}

#[tokio::test]
async fn test_battery_update_and_delete_report_absent() {
    let (database_url, db_path) = temp_db("absent");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let device = db.add_device("Sensor-A").await.unwrap();

    // Absence is checked before the target device.
    assert_eq!(db.update_battery(42, "X", device.id).await.unwrap(), None);
    assert_eq!(db.update_battery(42, "X", 999).await.unwrap(), None);
    // ...and before the name is validated.
    assert_eq!(db.update_battery(42, "", device.id).await.unwrap(), None);
    assert_eq!(db.delete_battery(42).await.unwrap(), None);
    assert_eq!(db.get_battery(42).await.unwrap(), None);

    let battery = db.add_battery("Cell-1", device.id).await.unwrap();
    assert_eq!(
        db.delete_battery(battery.id).await.unwrap(),
        Some(battery.clone())
    );
    assert_eq!(db.get_battery(battery.id).await.unwrap(), None);
    assert_eq!(db.delete_battery(battery.id).await.unwrap(), None);

    remove_db(&db_path).await;
}

#[tokio::test]
async fn test_battery_rename_keeps_owner() {
    let (database_url, db_path) = temp_db("rename");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let device = db.add_device("Sensor-A").await.unwrap();
    let battery = db.add_battery("Cell-1", device.id).await.unwrap();

    let updated = db
        .update_battery(battery.id, " Cell-1b ", device.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, battery.id);
    assert_eq!(updated.name, "Cell-1b");
    assert_eq!(updated.device_id, device.id);
    assert_eq!(db.get_battery(battery.id).await.unwrap(), Some(updated));

    remove_db(&db_path).await;
}

#[tokio::test]
async fn test_battery_reparenting_applies_creation_checks() {
    let (database_url, db_path) = temp_db("reparent");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let full = db.add_device("Full").await.unwrap();
    let spare = db.add_device("Spare").await.unwrap();
    for i in 1..=MAX_BATTERIES_PER_DEVICE {
        db.add_battery(format!("F-{i}"), full.id).await.unwrap();
    }
    let loose = db.add_battery("Loose", spare.id).await.unwrap();

    // Unknown target device.
    let err = db
        .update_battery(loose.id, "Loose", 999)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CellhubError::Inventory(InventoryError::DeviceNotFound { device_id: 999 })
    ));

    // Target device already at the cap.
    let err = db
        .update_battery(loose.id, "Renamed", full.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CellhubError::Inventory(InventoryError::BatteryLimitReached { .. })
    ));

    // Neither failure touched the row.
    assert_eq!(db.get_battery(loose.id).await.unwrap(), Some(loose.clone()));

    // A battery already on the full device can still be renamed in place.
    let on_full = db.list_device_batteries(full.id).await.unwrap();
    let renamed = db
        .update_battery(on_full[0].id, "F-1 renamed", full.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.device_id, full.id);

    // Moving off the full device frees a slot there.
    let moved = db
        .update_battery(on_full[1].id, "F-2", spare.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.device_id, spare.id);
    assert_eq!(db.list_device_batteries(full.id).await.unwrap().len(), 4);
    assert_eq!(db.list_device_batteries(spare.id).await.unwrap().len(), 2);

    let moved_back = db
        .update_battery(loose.id, "Loose", full.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved_back.device_id, full.id);
    assert_eq!(db.list_device_batteries(full.id).await.unwrap().len(), 5);

    remove_db(&db_path).await;
}

#[tokio::test]
async fn test_battery_names_must_not_be_blank() {
    let (database_url, db_path) = temp_db("blank");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let device = db.add_device("Sensor-A").await.unwrap();
    let err = db.add_battery("  ", device.id).await.unwrap_err();
    assert!(matches!(
        err,
        CellhubError::Inventory(InventoryError::EmptyName)
    ));
    assert!(db.get_batteries().await.unwrap().is_empty());

    // An existing battery still rejects a blank rename.
    let battery = db.add_battery("Cell-1", device.id).await.unwrap();
    let err = db
        .update_battery(battery.id, " ", device.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CellhubError::Inventory(InventoryError::EmptyName)
    ));
    assert_eq!(db.get_battery(battery.id).await.unwrap(), Some(battery));

    remove_db(&db_path).await;
}

#[tokio::test]
async fn test_deleted_battery_id_is_not_reused() {
    let (database_url, db_path) = temp_db("id-reuse");
    let db = cellhub::db::spawn(&database_url).await.unwrap();

    let device = db.add_device("Sensor-A").await.unwrap();
    let first = db.add_battery("Cell-1", device.id).await.unwrap();
    db.delete_battery(first.id).await.unwrap();

    let second = db.add_battery("Cell-2", device.id).await.unwrap();
    assert!(second.id > first.id);
    assert_eq!(db.get_battery(first.id).await.unwrap(), None);

    remove_db(&db_path).await;
}
