use crate::config::DatabaseConfig;
use crate::db::commands::{BatteryCreate, BatteryUpdate, DeviceUpdate};
use crate::db::models::{DbBattery, DbDevice};
use crate::db::ops;
use crate::db::schema::SQLITE_INIT;
use crate::error::CellhubError;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use tracing::info;

type Reply<T> = RpcReplyPort<Result<T, CellhubError>>;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Fetch one device by id.
    GetDevice(i64, Reply<Option<DbDevice>>),
    /// List every device, ordered by id.
    ListDevices(Reply<Vec<DbDevice>>),
    /// Create a device with a trimmed, non-empty name.
    CreateDevice(String, Reply<DbDevice>),
    /// Rename a device; absent ids reply `None`.
    UpdateDevice(DeviceUpdate, Reply<Option<DbDevice>>),
    /// Delete a device and cascade to its batteries.
    DeleteDevice(i64, Reply<Option<DbDevice>>),
    /// List the batteries owned by one device.
    ListDeviceBatteries(i64, Reply<Vec<DbBattery>>),

    /// Fetch one battery by id.
    GetBattery(i64, Reply<Option<DbBattery>>),
    /// List every battery, ordered by id.
    ListBatteries(Reply<Vec<DbBattery>>),
    /// Create a battery; fails if the device is missing or already full.
    CreateBattery(BatteryCreate, Reply<DbBattery>),
    /// Rename or re-parent a battery; moving it runs the creation checks.
    UpdateBattery(BatteryUpdate, Reply<Option<DbBattery>>),
    /// Delete one battery.
    DeleteBattery(i64, Reply<Option<DbBattery>>),
}

/// Cloneable entry point to the database actor.
///
/// Absent rows come back as `Ok(None)`; domain-constraint violations come back as
/// `Err(CellhubError::Inventory(_))`.
#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn get_device(&self, id: i64) -> Result<Option<DbDevice>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::GetDevice, id)
            .map_err(|e| CellhubError::RactorError(format!("DbActor GetDevice RPC failed: {e}")))?
    }

    pub async fn get_devices(&self) -> Result<Vec<DbDevice>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::ListDevices).map_err(|e| {
            CellhubError::RactorError(format!("DbActor ListDevices RPC failed: {e}"))
        })?
    }

    pub async fn add_device(&self, name: impl Into<String>) -> Result<DbDevice, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::CreateDevice, name.into()).map_err(|e| {
            CellhubError::RactorError(format!("DbActor CreateDevice RPC failed: {e}"))
        })?
    }

    pub async fn update_device(
        &self,
        id: i64,
        name: impl Into<String>,
    ) -> Result<Option<DbDevice>, CellhubError> {
        let update = DeviceUpdate {
            id,
            name: name.into(),
        };
        ractor::call!(self.actor, DbActorMessage::UpdateDevice, update).map_err(|e| {
            CellhubError::RactorError(format!("DbActor UpdateDevice RPC failed: {e}"))
        })?
    }

    pub async fn delete_device(&self, id: i64) -> Result<Option<DbDevice>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::DeleteDevice, id).map_err(|e| {
            CellhubError::RactorError(format!("DbActor DeleteDevice RPC failed: {e}"))
        })?
    }

    pub async fn list_device_batteries(
        &self,
        device_id: i64,
    ) -> Result<Vec<DbBattery>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::ListDeviceBatteries, device_id).map_err(|e| {
            CellhubError::RactorError(format!("DbActor ListDeviceBatteries RPC failed: {e}"))
        })?
    }

    pub async fn get_battery(&self, id: i64) -> Result<Option<DbBattery>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::GetBattery, id)
            .map_err(|e| CellhubError::RactorError(format!("DbActor GetBattery RPC failed: {e}")))?
    }

    pub async fn get_batteries(&self) -> Result<Vec<DbBattery>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::ListBatteries).map_err(|e| {
            CellhubError::RactorError(format!("DbActor ListBatteries RPC failed: {e}"))
        })?
    }

    pub async fn add_battery(
        &self,
        name: impl Into<String>,
        device_id: i64,
    ) -> Result<DbBattery, CellhubError> {
        let create = BatteryCreate {
            name: name.into(),
            device_id,
        };
        ractor::call!(self.actor, DbActorMessage::CreateBattery, create).map_err(|e| {
            CellhubError::RactorError(format!("DbActor CreateBattery RPC failed: {e}"))
        })?
    }

    pub async fn update_battery(
        &self,
        id: i64,
        name: impl Into<String>,
        device_id: i64,
    ) -> Result<Option<DbBattery>, CellhubError> {
        let update = BatteryUpdate {
            id,
            name: name.into(),
            device_id,
        };
        ractor::call!(self.actor, DbActorMessage::UpdateBattery, update).map_err(|e| {
            CellhubError::RactorError(format!("DbActor UpdateBattery RPC failed: {e}"))
        })?
    }

    pub async fn delete_battery(&self, id: i64) -> Result<Option<DbBattery>, CellhubError> {
        ractor::call!(self.actor, DbActorMessage::DeleteBattery, id).map_err(|e| {
            CellhubError::RactorError(format!("DbActor DeleteBattery RPC failed: {e}"))
        })?
    }

    /// Stop the actor and wait until its pool is closed.
    ///
    /// Calls made through any clone of this handle afterwards fail with
    /// `CellhubError::RactorError`.
    pub async fn shutdown(&self) -> Result<(), CellhubError> {
        self.actor
            .stop_and_wait(None, None)
            .await
            .map_err(|e| CellhubError::RactorError(format!("DbActor shutdown failed: {e}")))
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActorArgs {
    database_url: String,
    database: DatabaseConfig,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = DbActorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(args.database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(args.database.busy_timeout())
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(args.database.max_connections)
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!(
            max_connections = args.database.max_connections,
            "DbActor initialized"
        );
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::GetDevice(id, reply) => {
                let _ = reply.send(ops::get_device(pool, id).await);
            }
            DbActorMessage::ListDevices(reply) => {
                let _ = reply.send(ops::get_devices(pool).await);
            }
            DbActorMessage::CreateDevice(name, reply) => {
                let _ = reply.send(ops::add_device(pool, &name).await);
            }
            DbActorMessage::UpdateDevice(update, reply) => {
                let _ = reply.send(ops::update_device(pool, update).await);
            }
            DbActorMessage::DeleteDevice(id, reply) => {
                let _ = reply.send(ops::delete_device(pool, id).await);
            }
            DbActorMessage::ListDeviceBatteries(device_id, reply) => {
                let _ = reply.send(ops::list_device_batteries(pool, device_id).await);
            }
            DbActorMessage::GetBattery(id, reply) => {
                let _ = reply.send(ops::get_battery(pool, id).await);
            }
            DbActorMessage::ListBatteries(reply) => {
                let _ = reply.send(ops::get_batteries(pool).await);
            }
            DbActorMessage::CreateBattery(create, reply) => {
                let _ = reply.send(ops::add_battery(pool, create).await);
            }
            DbActorMessage::UpdateBattery(update, reply) => {
                let _ = reply.send(ops::update_battery(pool, update).await);
            }
            DbActorMessage::DeleteBattery(id, reply) => {
                let _ = reply.send(ops::delete_battery(pool, id).await);
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        info!("DbActor stopped, pool closed");
        Ok(())
    }
}

/// Spawn the database actor with default pool settings.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, CellhubError> {
    spawn_with(database_url, &DatabaseConfig::default()).await
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn_with(
    database_url: &str,
    database: &DatabaseConfig,
) -> Result<DbActorHandle, CellhubError> {
    let args = DbActorArgs {
        database_url: database_url.to_string(),
        database: database.clone(),
    };
    // Unnamed: several stores may live in one process (one per test database).
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, args)
        .await
        .map_err(|e| CellhubError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), CellhubError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
