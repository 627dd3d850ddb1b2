use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::ModsyncError;

/// Abstraction for applying a patch payload to the database.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<(), ModsyncError>;
}

/// Insert payload for a module that has no state row yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleStateCreate {
    pub name: String,
    pub version: String,
    pub description: String,
    pub enabled: bool,
}

/// Partial update of an existing row, addressed by module name.
///
/// Setting `enabled` also moves `status` and stamps the matching `last_*_at` column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleStatePatch {
    pub name: String,
    /// `None` => do not change; `Some(v)` => update
    pub version: Option<String>,
    /// `None` => do not change; `Some(v)` => update
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

impl ModuleStatePatch {
    pub fn set_enabled(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled: Some(enabled),
            ..Default::default()
        }
    }
}
