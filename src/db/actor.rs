use crate::db::models::DbModuleState;
use crate::db::patch::{DbPatchable, ModuleStateCreate, ModuleStatePatch};
use crate::db::schema::SQLITE_INIT;
use crate::error::ModsyncError;
use chrono::Utc;
use modsync_schema::ModuleStatus;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Fetch the state row of one module, `None` if it was never recorded.
    Get(String, RpcReplyPort<Result<Option<DbModuleState>, ModsyncError>>),

    /// Insert a state row and return its id.
    Create(ModuleStateCreate, RpcReplyPort<Result<i64, ModsyncError>>),

    /// Patch a state row by module name.
    Patch(ModuleStatePatch, RpcReplyPort<Result<(), ModsyncError>>),

    /// List enabled modules (enabled=1), ordered by name.
    ListEnabled(RpcReplyPort<Result<Vec<DbModuleState>, ModsyncError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn get(&self, name: &str) -> Result<Option<DbModuleState>, ModsyncError> {
        ractor::call!(self.actor, DbActorMessage::Get, name.to_string())
            .map_err(|e| ModsyncError::RactorError(format!("DbActor Get RPC failed: {e}")))?
    }

    pub async fn create(&self, create: ModuleStateCreate) -> Result<i64, ModsyncError> {
        ractor::call!(self.actor, DbActorMessage::Create, create)
            .map_err(|e| ModsyncError::RactorError(format!("DbActor Create RPC failed: {e}")))?
    }

    pub async fn patch(&self, patch: ModuleStatePatch) -> Result<(), ModsyncError> {
        ractor::call!(self.actor, DbActorMessage::Patch, patch)
            .map_err(|e| ModsyncError::RactorError(format!("DbActor Patch RPC failed: {e}")))?
    }

    pub async fn list_enabled(&self) -> Result<Vec<DbModuleState>, ModsyncError> {
        ractor::call!(self.actor, DbActorMessage::ListEnabled).map_err(|e| {
            ModsyncError::RactorError(format!("DbActor ListEnabled RPC failed: {e}"))
        })?
    }

    /// Stops the actor; later calls fail with `RactorError`.
    pub fn shutdown(&self) {
        self.actor.stop(None);
    }
}

struct DbActorState {
    pool: SqlitePool,
}

/// How the actor opens its database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the file and schema when missing.
    ReadWrite,
    /// Never create or modify anything on disk. A missing file or table reads as an empty
    /// store (backed by a private in-memory database).
    ReadOnly,
}

struct DbActorArgs {
    database_url: String,
    mode: OpenMode,
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
            .busy_timeout(Duration::from_secs(5));

        let pool = match args.mode {
            OpenMode::ReadWrite => {
                let pool = SqlitePoolOptions::new()
                    .connect_with(
                        connect_opts
                            .create_if_missing(true)
                            .journal_mode(SqliteJournalMode::Wal)
                            .synchronous(SqliteSynchronous::Normal),
                    )
                    .await
                    .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;
                apply_schema(&pool)
                    .await
                    .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;
                pool
            }
            OpenMode::ReadOnly => open_read_only(connect_opts)
                .await
                .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?,
        };

        info!(mode = ?args.mode, "DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::Get(name, reply) => {
                let res = self.get_by_name(&state.pool, &name).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Create(create, reply) => {
                let res = self.create_state(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Patch(patch, reply) => {
                let res = patch.apply_patch(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListEnabled(reply) => {
                let res = self.list_enabled(&state.pool).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn get_by_name(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<DbModuleState>, ModsyncError> {
        let row = sqlx::query_as::<_, DbModuleState>(
            r#"
        SELECT id, name, version, description, enabled, status, last_enabled_at, last_disabled_at, created_at, updated_at
        FROM module_states
        WHERE name = ?
        "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn create_state(
        &self,
        pool: &SqlitePool,
        create: ModuleStateCreate,
    ) -> Result<i64, ModsyncError> {
        let now = Utc::now();
        let status = ModuleStatus::from_enabled(create.enabled).as_str();
        let last_enabled_at = create.enabled.then_some(now);
        let last_disabled_at = (!create.enabled).then_some(now);

        let id: i64 = sqlx::query_scalar(
            r#"
        INSERT INTO module_states (
            name, version, description, enabled, status, last_enabled_at, last_disabled_at, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
        )
        .bind(create.name)
        .bind(create.version)
        .bind(create.description)
        .bind(create.enabled)
        .bind(status)
        .bind(last_enabled_at)
        .bind(last_disabled_at)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    async fn list_enabled(&self, pool: &SqlitePool) -> Result<Vec<DbModuleState>, ModsyncError> {
        let rows = sqlx::query_as::<_, DbModuleState>(
            r#"
        SELECT id, name, version, description, enabled, status, last_enabled_at, last_disabled_at, created_at, updated_at
        FROM module_states
        WHERE enabled = 1
        ORDER BY name
        "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed so several stores can live in one process (tests do this).
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, ModsyncError> {
    spawn_with(database_url, OpenMode::ReadWrite).await
}

/// Spawn for dry runs: nothing on disk is created or changed.
pub async fn spawn_read_only(database_url: &str) -> Result<DbActorHandle, ModsyncError> {
    spawn_with(database_url, OpenMode::ReadOnly).await
}

pub async fn spawn_with(
    database_url: &str,
    mode: OpenMode,
) -> Result<DbActorHandle, ModsyncError> {
    let args = DbActorArgs {
        database_url: database_url.to_string(),
        mode,
    };
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, args)
        .await
        .map_err(|e| ModsyncError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn open_read_only(opts: SqliteConnectOptions) -> Result<SqlitePool, ModsyncError> {
    if opts.get_filename().is_file() {
        let pool = SqlitePoolOptions::new()
            .connect_with(opts.read_only(true).create_if_missing(false))
            .await?;
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'module_states'",
        )
        .fetch_one(&pool)
        .await?;
        if tables > 0 {
            return Ok(pool);
        }
        pool.close().await;
    }

    // One connection: every in-memory connection would otherwise see its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await?;
    apply_schema(&pool).await?;
    Ok(pool)
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), ModsyncError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
