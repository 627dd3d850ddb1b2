//! Per-module outcome of a sync run.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    NeedsSync,
    Conflict,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    #[default]
    None,
    CreateDbEntry,
    UpdateJsonFromDb,
    UpdateDbFromJson,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::NeedsSync => "needs_sync",
            Self::Conflict => "conflict",
            Self::Error => "error",
        }
    }
}

impl SyncAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CreateDbEntry => "create_db_entry",
            Self::UpdateJsonFromDb => "update_json_from_db",
            Self::UpdateDbFromJson => "update_db_from_json",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub module: String,
    pub status: SyncStatus,
    pub action: SyncAction,
    pub message: String,
    /// `None` when the descriptor could not be read.
    pub descriptor_enabled: Option<bool>,
    /// `None` when the state row is absent.
    pub state_enabled: Option<bool>,
}

impl SyncResult {
    pub fn error(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            status: SyncStatus::Error,
            action: SyncAction::None,
            message: message.into(),
            descriptor_enabled: None,
            state_enabled: None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status == SyncStatus::Conflict
    }
}
