use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::dependencies::run_command;

/// Regenerates the host application's class loader after a batch changed modules.
#[async_trait]
pub trait AutoloadTrigger: Send + Sync {
    async fn regenerate(&self);
}

/// Runs each configured command in order. Failures are logged, never propagated.
#[derive(Debug, Clone)]
pub struct CommandAutoload {
    commands: Vec<Vec<String>>,
    working_dir: PathBuf,
}

impl CommandAutoload {
    pub fn new(commands: Vec<Vec<String>>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            commands,
            working_dir: working_dir.into(),
        }
    }
}

#[async_trait]
impl AutoloadTrigger for CommandAutoload {
    async fn regenerate(&self) {
        for command in &self.commands {
            let Some((program, args)) = command.split_first() else {
                continue;
            };
            match run_command(program, args, &self.working_dir).await {
                Ok(()) => info!(program = %program, "autoload regenerated"),
                Err(e) => warn!(program = %program, error = %e, "autoload regeneration failed"),
            }
        }
    }
}
