use modsync_reconcile_core::{Effect, Observed, SyncPolicy, decide};
use modsync_schema::SyncResult;
use tracing::info;

use crate::error::ModsyncError;

use super::{ModuleService, log_failure};
use super::activator::sync_requirements;
use super::transition::{apply_transition, ensure_dependencies};

impl ModuleService {
    /// Brings descriptor and state row of one module into agreement.
    ///
    /// With `policy.dry_run` the decision is reported and nothing else happens: no writes, no
    /// package manager calls, no prompts. Missing or failing required modules never block a
    /// sync, so the dry-run result is always the applied result.
    pub async fn reconcile(
        &self,
        module: &str,
        policy: &SyncPolicy,
    ) -> Result<SyncResult, ModsyncError> {
        let ctx = &self.ctx;
        let mut loaded = ctx.descriptors.load(module)?;
        let state_enabled = ctx.states.get(module).await?.map(|row| row.enabled);
        let observed = Observed {
            descriptor_enabled: loaded.descriptor.enabled,
            state_enabled,
        };

        let decision = decide(observed, policy);
        if policy.dry_run {
            return Ok(decision.into_result(module, observed));
        }

        let effect = decision.effect;
        match effect {
            Effect::Apply(plan) => {
                if plan.activates() {
                    sync_requirements(ctx, &loaded).await?;
                }
                apply_transition(ctx, &mut loaded, plan).await?;
            }
            Effect::EnsureDependencies { enabled } => {
                ensure_dependencies(ctx, &loaded, enabled).await;
            }
            Effect::Nothing => {}
        }

        Ok(decision.into_result(module, observed))
    }

    /// Reconciles `modules` in order, or every discovered module when empty.
    ///
    /// A failing module becomes an `error` result; the batch always runs to the end.
    pub async fn reconcile_all(&self, modules: &[String], policy: &SyncPolicy) -> Vec<SyncResult> {
        let modules = if modules.is_empty() {
            self.ctx.descriptors.discover()
        } else {
            modules.to_vec()
        };

        let mut results = Vec::with_capacity(modules.len());
        for module in &modules {
            let result = match self.reconcile(module, policy).await {
                Ok(result) => result,
                Err(e) => {
                    log_failure(module, &e, "sync");
                    SyncResult::error(module, e.to_string())
                }
            };
            info!(
                module = %result.module,
                status = %result.status,
                action = %result.action,
                "module reconciled"
            );
            results.push(result);
        }
        results
    }
}
