use chrono::{DateTime, Utc};
use modsync_schema::ModuleStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbModuleState {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub description: String,
    pub enabled: bool,
    /// `enabled` | `disabled`, kept in step with `enabled`.
    pub status: String,
    pub last_enabled_at: Option<DateTime<Utc>>,
    pub last_disabled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbModuleState {
    pub fn module_status(&self) -> ModuleStatus {
        ModuleStatus::from_enabled(self.enabled)
    }
}
