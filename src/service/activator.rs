//! Enables the modules a module declares as required before the module itself.

use std::collections::HashSet;

use modsync_reconcile_core::{Observed, RequirementState, TransitionPlan, plan_requirements};
use tracing::{info, warn};

use crate::descriptor::LoadedDescriptor;
use crate::error::ModsyncError;
use crate::utils::logging::join_names;

use super::ModuleContext;
use super::transition::apply_transition;

/// Whether the module that asked for activation may go ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Proceed,
    Aborted { reason: String },
}

impl ActivationOutcome {
    fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }
}

/// How missing or failing requirements are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivationMode {
    /// Ask whether to continue; declining aborts (explicit `enable`).
    Confirm,
    /// Warn and continue (sync).
    Warn,
}

/// Walks the requirements of `loaded` down to `activation.max_depth` levels.
///
/// Must run before `loaded`'s own stores are written so an abort leaves it untouched.
pub(crate) async fn activate_requirements(
    ctx: &ModuleContext,
    loaded: &LoadedDescriptor,
) -> Result<ActivationOutcome, ModsyncError> {
    walk(ctx, loaded, ActivationMode::Confirm).await
}

/// Sync flavour of `activate_requirements`: requirements are offered as usual, but a
/// missing or failing requirement is only logged.
pub(crate) async fn sync_requirements(
    ctx: &ModuleContext,
    loaded: &LoadedDescriptor,
) -> Result<(), ModsyncError> {
    match walk(ctx, loaded, ActivationMode::Warn).await? {
        ActivationOutcome::Proceed => Ok(()),
        ActivationOutcome::Aborted { reason } => Err(ModsyncError::UnexpectedError(format!(
            "activation aborted during sync: {reason}"
        ))),
    }
}

async fn walk(
    ctx: &ModuleContext,
    loaded: &LoadedDescriptor,
    mode: ActivationMode,
) -> Result<ActivationOutcome, ModsyncError> {
    if ctx.activation.max_depth == 0 {
        return Ok(ActivationOutcome::Proceed);
    }
    let mut visited = HashSet::from([loaded.module.clone()]);
    activate_level(ctx, loaded, 1, mode, &mut visited).await
}

async fn activate_level(
    ctx: &ModuleContext,
    loaded: &LoadedDescriptor,
    depth: usize,
    mode: ActivationMode,
    visited: &mut HashSet<String>,
) -> Result<ActivationOutcome, ModsyncError> {
    let module = loaded.module.as_str();
    let requirements = loaded.descriptor.required_modules();
    if requirements.is_empty() {
        return Ok(ActivationOutcome::Proceed);
    }
    info!(module = %module, requires = %join_names(requirements), depth, "checking required modules");

    let mut observed = Vec::with_capacity(requirements.len());
    for name in requirements {
        observed.push((name.as_str(), requirement_state(ctx, name.trim()).await?));
    }
    let plan = plan_requirements(module, observed);

    for name in &plan.satisfied {
        info!(module = %module, required = %name, "required module already enabled");
    }

    if !plan.missing.is_empty() {
        let missing = join_names(&plan.missing);
        warn!(module = %module, missing = %missing, "required modules not found, module may not work correctly");
        if mode == ActivationMode::Confirm {
            let question = format!(
                "Module [{module}] requires missing modules ({missing}) to work properly. Do you want to continue anyway?"
            );
            if !ctx.confirm.confirm(&question, false).await {
                return Ok(ActivationOutcome::aborted(format!(
                    "required modules not found: {missing}"
                )));
            }
            warn!(module = %module, "continuing without missing required modules");
        }
    }

    for required in &plan.to_enable {
        if !visited.insert(required.clone()) {
            continue;
        }

        let question = format!("Module [{module}] requires [{required}]. Enable it now?");
        if !ctx.confirm.confirm(&question, true).await {
            warn!(module = %module, required = %required, "required module skipped, module may not work correctly");
            continue;
        }

        let failure = match enable_requirement(ctx, required, depth, mode, visited).await {
            Ok(ActivationOutcome::Proceed) => {
                info!(module = %module, required = %required, "required module enabled");
                continue;
            }
            Ok(ActivationOutcome::Aborted { reason }) => reason,
            Err(e) => e.to_string(),
        };

        warn!(module = %module, required = %required, error = %failure, "failed to enable required module");
        if mode == ActivationMode::Warn {
            continue;
        }
        let question = format!("Continue enabling [{module}] without [{required}]?");
        if !ctx.confirm.confirm(&question, false).await {
            return Ok(ActivationOutcome::aborted(format!(
                "required module [{required}] could not be enabled: {failure}"
            )));
        }
    }

    Ok(ActivationOutcome::Proceed)
}

async fn enable_requirement(
    ctx: &ModuleContext,
    required: &str,
    depth: usize,
    mode: ActivationMode,
    visited: &mut HashSet<String>,
) -> Result<ActivationOutcome, ModsyncError> {
    let mut loaded = ctx.descriptors.load(required)?;

    if depth < ctx.activation.max_depth {
        let nested = Box::pin(activate_level(ctx, &loaded, depth + 1, mode, visited)).await?;
        if nested != ActivationOutcome::Proceed {
            return Ok(nested);
        }
    }

    let state_enabled = ctx.states.get(required).await?.map(|row| row.enabled);
    let plan = TransitionPlan::towards(
        true,
        Observed {
            descriptor_enabled: loaded.descriptor.enabled,
            state_enabled,
        },
    );
    apply_transition(ctx, &mut loaded, plan).await?;
    Ok(ActivationOutcome::Proceed)
}

async fn requirement_state(
    ctx: &ModuleContext,
    name: &str,
) -> Result<RequirementState, ModsyncError> {
    if !ctx.descriptors.exists(name) {
        return Ok(RequirementState::Missing);
    }
    let state = match ctx.states.get(name).await? {
        Some(row) if row.enabled => RequirementState::Enabled,
        _ => RequirementState::Inactive,
    };
    Ok(state)
}
