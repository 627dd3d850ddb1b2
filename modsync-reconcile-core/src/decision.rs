//! The reconciliation decision table.
//!
//! Both the sync path and the explicit enable/disable path plan their writes here, so the
//! rules for which store gets touched live in exactly one place.

use modsync_schema::{SyncAction, SyncResult, SyncStatus};

use crate::policy::{Resolution, SyncPolicy};

/// What the two stores currently say about one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observed {
    pub descriptor_enabled: bool,
    /// `None` when the module has no state row yet.
    pub state_enabled: Option<bool>,
}

/// Writes needed to bring a module to `enabled` in both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub enabled: bool,
    pub write_descriptor: bool,
    pub write_state: bool,
    /// The state row does not exist and has to be inserted rather than patched.
    pub create_state: bool,
}

impl TransitionPlan {
    pub fn towards(enabled: bool, observed: Observed) -> Self {
        Self {
            enabled,
            write_descriptor: observed.descriptor_enabled != enabled,
            write_state: observed.state_enabled != Some(enabled),
            create_state: observed.state_enabled.is_none(),
        }
    }

    pub fn is_noop(&self) -> bool {
        !self.write_descriptor && !self.write_state
    }

    /// The state row is the tracked actual state; only its changes are lifecycle events.
    pub fn emits_event(&self) -> bool {
        self.write_state
    }

    /// The tracked state becomes enabled. Sync activates requirements only then; an explicit
    /// enable activates them for any non-noop plan.
    pub fn activates(&self) -> bool {
        self.enabled && self.write_state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Apply(TransitionPlan),
    /// Stores agree; re-run the dependency install/removal as a safety net.
    EnsureDependencies { enabled: bool },
    /// Unresolved conflict: nothing is touched.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub status: SyncStatus,
    pub action: SyncAction,
    pub message: String,
    pub effect: Effect,
}

impl Decision {
    pub fn into_result(self, module: impl Into<String>, observed: Observed) -> SyncResult {
        SyncResult {
            module: module.into(),
            status: self.status,
            action: self.action,
            message: self.message,
            descriptor_enabled: Some(observed.descriptor_enabled),
            state_enabled: observed.state_enabled,
        }
    }
}

/// First matching row wins. `policy.dry_run` does not influence the decision, only whether
/// the caller applies it.
pub fn decide(observed: Observed, policy: &SyncPolicy) -> Decision {
    let d = observed.descriptor_enabled;

    let Some(s) = observed.state_enabled else {
        let message = if d {
            "JSON shows enabled but no DB entry - will create enabled DB entry"
        } else {
            "JSON shows disabled but no DB entry - will create disabled DB entry"
        };
        return Decision {
            status: SyncStatus::NeedsSync,
            action: SyncAction::CreateDbEntry,
            message: message.to_string(),
            effect: Effect::Apply(TransitionPlan::towards(d, observed)),
        };
    };

    if s == d {
        return Decision {
            status: SyncStatus::Synced,
            action: SyncAction::None,
            message: "JSON and DB are already synchronized".to_string(),
            effect: Effect::EnsureDependencies { enabled: d },
        };
    }

    let conflict = format!("Conflict: JSON={d}, DB={s}");
    match policy.resolution() {
        Some(Resolution::PreferState) => Decision {
            status: SyncStatus::Synced,
            action: SyncAction::UpdateJsonFromDb,
            message: format!("{conflict} - Will update JSON to match DB"),
            effect: Effect::Apply(TransitionPlan::towards(s, observed)),
        },
        Some(Resolution::PreferDescriptor) => Decision {
            status: SyncStatus::Synced,
            action: SyncAction::UpdateDbFromJson,
            message: format!("{conflict} - Will update DB to match JSON"),
            effect: Effect::Apply(TransitionPlan::towards(d, observed)),
        },
        None => Decision {
            status: SyncStatus::Conflict,
            action: SyncAction::None,
            message: conflict,
            effect: Effect::Nothing,
        },
    }
}
