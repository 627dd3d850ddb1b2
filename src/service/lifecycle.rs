use modsync_reconcile_core::{Observed, TransitionPlan};
use std::fmt;
use tracing::{info, warn};

use crate::error::ModsyncError;

use super::{ModuleService, log_failure};
use super::activator::{ActivationOutcome, activate_requirements};
use super::transition::{apply_transition, ensure_dependencies};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Enabled,
    AlreadyEnabled,
    Disabled,
    AlreadyDisabled,
    /// The user declined during required-module activation; the module was not touched.
    Aborted { reason: String },
    Failed { error: String },
}

impl LifecycleOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Aborted { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for LifecycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::AlreadyEnabled => f.write_str("already enabled"),
            Self::Disabled => f.write_str("disabled"),
            Self::AlreadyDisabled => f.write_str("already disabled"),
            Self::Aborted { reason } => write!(f, "aborted: {reason}"),
            Self::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub module: String,
    pub outcome: LifecycleOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ModuleOutcome>,
}

impl BatchReport {
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|o| o.outcome.is_success())
    }

    pub fn outcome_of(&self, module: &str) -> Option<&LifecycleOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.module == module)
            .map(|o| &o.outcome)
    }
}

impl ModuleService {
    /// Enables one module after activating what it requires.
    ///
    /// An already enabled module only gets its dependencies re-installed.
    pub async fn enable(&self, module: &str) -> Result<LifecycleOutcome, ModsyncError> {
        let ctx = &self.ctx;
        let mut loaded = ctx.descriptors.load(module)?;
        let plan = self.plan_towards(module, loaded.descriptor.enabled, true).await?;

        if plan.is_noop() {
            info!(module = %module, "already enabled, re-checking dependencies");
            ensure_dependencies(ctx, &loaded, true).await;
            return Ok(LifecycleOutcome::AlreadyEnabled);
        }

        // Also runs when only the descriptor lags behind an enabled row.
        if let ActivationOutcome::Aborted { reason } = activate_requirements(ctx, &loaded).await? {
            warn!(module = %module, reason = %reason, "operation cancelled, module was not enabled");
            return Ok(LifecycleOutcome::Aborted { reason });
        }

        apply_transition(ctx, &mut loaded, plan).await?;
        info!(module = %module, "module enabled");
        Ok(LifecycleOutcome::Enabled)
    }

    /// Disables one module and removes packages no other enabled module needs.
    pub async fn disable(&self, module: &str) -> Result<LifecycleOutcome, ModsyncError> {
        let ctx = &self.ctx;
        let mut loaded = ctx.descriptors.load(module)?;
        let plan = self.plan_towards(module, loaded.descriptor.enabled, false).await?;

        if plan.is_noop() {
            info!(module = %module, "already disabled");
            return Ok(LifecycleOutcome::AlreadyDisabled);
        }

        apply_transition(ctx, &mut loaded, plan).await?;
        info!(module = %module, "module disabled");
        Ok(LifecycleOutcome::Disabled)
    }

    pub async fn enable_many(&self, modules: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for module in modules {
            let outcome = settle(module, self.enable(module).await);
            report.outcomes.push(ModuleOutcome {
                module: module.clone(),
                outcome,
            });
        }
        report
    }

    pub async fn disable_many(&self, modules: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for module in modules {
            let outcome = settle(module, self.disable(module).await);
            report.outcomes.push(ModuleOutcome {
                module: module.clone(),
                outcome,
            });
        }
        report
    }

    async fn plan_towards(
        &self,
        module: &str,
        descriptor_enabled: bool,
        enabled: bool,
    ) -> Result<TransitionPlan, ModsyncError> {
        let state_enabled = self.ctx.states.get(module).await?.map(|row| row.enabled);
        Ok(TransitionPlan::towards(
            enabled,
            Observed {
                descriptor_enabled,
                state_enabled,
            },
        ))
    }
}

fn settle(module: &str, res: Result<LifecycleOutcome, ModsyncError>) -> LifecycleOutcome {
    match res {
        Ok(outcome) => outcome,
        Err(e) => {
            log_failure(module, &e, "module operation");
            LifecycleOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
