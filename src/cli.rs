use clap::{Args, Parser, Subcommand};
use modsync_reconcile_core::SyncPolicy;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Keeps module descriptors and the module state table in agreement"
)]
pub struct Cli {
    /// Configuration file (TOML). Defaults to `modsync.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enable modules, activating the modules they require.
    Enable {
        #[arg(required = true)]
        modules: Vec<String>,
        #[command(flatten)]
        interaction: InteractionArgs,
    },
    /// Disable modules and remove packages no other enabled module needs.
    Disable {
        #[arg(required = true)]
        modules: Vec<String>,
    },
    /// Reconcile descriptors with the state table (all discovered modules by default).
    Sync(SyncArgs),
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct InteractionArgs {
    /// Answer yes to every question.
    #[arg(long, short = 'y', conflicts_with = "no_interaction")]
    pub yes: bool,
    /// Never ask; every question takes its default answer.
    #[arg(long, short = 'n')]
    pub no_interaction: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    pub modules: Vec<String>,
    /// Resolve conflicts like --db-priority unless --json-priority is given.
    #[arg(long)]
    pub force: bool,
    /// Resolve conflicts by rewriting descriptors to match the state table.
    #[arg(long)]
    pub db_priority: bool,
    /// Resolve conflicts by updating the state table to match descriptors.
    #[arg(long)]
    pub json_priority: bool,
    /// Report what would happen without changing anything.
    #[arg(long)]
    pub dry_run: bool,
    #[command(flatten)]
    pub interaction: InteractionArgs,
}

impl SyncArgs {
    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            force: self.force,
            db_priority: self.db_priority,
            json_priority: self.json_priority,
            dry_run: self.dry_run,
        }
    }
}
