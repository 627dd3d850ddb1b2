use chrono::Utc;
use modsync_reconcile_core::TransitionPlan;
use tracing::{debug, info, warn};

use crate::db::{ModuleStateCreate, ModuleStatePatch};
use crate::descriptor::LoadedDescriptor;
use crate::error::ModsyncError;
use crate::events::ModuleEvent;

use super::ModuleContext;

/// Applies `plan` to one module.
///
/// Order: install packages (enabling), state row, descriptor, remove unused packages
/// (disabling), event. A failed removal is logged and does not undo the transition.
pub(crate) async fn apply_transition(
    ctx: &ModuleContext,
    loaded: &mut LoadedDescriptor,
    plan: TransitionPlan,
) -> Result<(), ModsyncError> {
    if plan.is_noop() {
        return Ok(());
    }
    let module = loaded.module.clone();
    debug!(module = %module, plan = ?plan, "applying transition");

    if plan.enabled {
        let specs = loaded.descriptor.dependency_specs();
        ctx.installer.install_specs(&module, &specs).await;
    }

    if plan.write_state {
        if plan.create_state {
            let id = ctx
                .states
                .create(ModuleStateCreate {
                    name: module.clone(),
                    version: loaded.descriptor.version_or_default(),
                    description: loaded.descriptor.description_or_default(&module),
                    enabled: plan.enabled,
                })
                .await?;
            info!(module = %module, id, enabled = plan.enabled, "state row created");
        } else {
            ctx.states
                .patch(ModuleStatePatch::set_enabled(&module, plan.enabled))
                .await?;
            info!(module = %module, enabled = plan.enabled, "state row updated");
        }
    }

    if plan.write_descriptor {
        loaded.descriptor.mark_enabled(plan.enabled, Utc::now());
        ctx.descriptors.save(loaded)?;
        info!(module = %module, enabled = plan.enabled, "descriptor updated");
    }

    // A freshly recorded disabled module never had its packages installed by us.
    if !plan.enabled && !plan.create_state {
        ensure_removed(ctx, &module).await;
    }

    if plan.emits_event() {
        ctx.events.dispatch(ModuleEvent::transition(&module, plan.enabled));
    }
    Ok(())
}

/// Safety net for modules whose stores already agree.
pub(crate) async fn ensure_dependencies(
    ctx: &ModuleContext,
    loaded: &LoadedDescriptor,
    enabled: bool,
) {
    if enabled {
        let specs = loaded.descriptor.dependency_specs();
        ctx.installer.install_specs(&loaded.module, &specs).await;
    } else {
        ensure_removed(ctx, &loaded.module).await;
    }
}

async fn ensure_removed(ctx: &ModuleContext, module: &str) {
    match ctx.installer.remove_dependencies(module).await {
        Ok(report) if !report.removed.is_empty() => {
            info!(module = %module, removed = report.removed.len(), "unused dependencies removed");
        }
        Ok(_) => {}
        Err(e) => warn!(module = %module, error = %e, "dependency removal incomplete"),
    }
}
