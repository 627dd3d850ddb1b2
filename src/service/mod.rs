//! Module lifecycle orchestration: sync, enable, disable.
//!
//! Every path plans its writes with `modsync_reconcile_core` and applies them through
//! `transition::apply_transition`, so the stores are always touched in the same order.

mod activator;
mod context;
mod lifecycle;
mod reconciler;
pub mod report;
mod transition;

pub use activator::ActivationOutcome;
pub use context::ModuleContext;
pub use lifecycle::{BatchReport, LifecycleOutcome, ModuleOutcome};

/// Entry point for the CLI commands; cheap to clone.
#[derive(Clone)]
pub struct ModuleService {
    ctx: ModuleContext,
}

impl ModuleService {
    pub fn new(ctx: ModuleContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }
}

/// Module-caused failures are warnings; store or environment failures are errors.
fn log_failure(module: &str, error: &crate::error::ModsyncError, what: &str) {
    use crate::error::IsModuleFault;
    if error.is_module_fault() {
        tracing::warn!(module = %module, error = %error, "{what} failed");
    } else {
        tracing::error!(module = %module, error = %error, "{what} failed");
    }
}
