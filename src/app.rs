//! Wiring from configuration to a running command.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;

use crate::autoload::{AutoloadTrigger, CommandAutoload};
use crate::cli::{Cli, Command, InteractionArgs};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::db::{self, DbActorHandle};
use crate::dependencies::{DependencyInstaller, PackageManager, ProcessPackageManager};
use crate::descriptor::DescriptorStore;
use crate::error::ModsyncError;
use crate::events::{EventSink, TracingEventSink};
use crate::prompt::{AcceptDefaults, AutoConfirm, Confirm, StdinConfirm};
use crate::service::{ModuleContext, ModuleService, report};

/// Resolves the configuration file: an explicit `--config` must exist, the default may not.
pub fn load_config(explicit: Option<&PathBuf>) -> Result<Config, ModsyncError> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(figment::Error::from(format!(
                "config file {} not found",
                path.display()
            ))
            .into());
        }
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    Ok(Config::load(&path)?)
}

fn confirm_for(interaction: InteractionArgs) -> Arc<dyn Confirm> {
    if interaction.yes {
        Arc::new(AutoConfirm)
    } else if interaction.no_interaction || !std::io::stdin().is_terminal() {
        Arc::new(AcceptDefaults)
    } else {
        Arc::new(StdinConfirm)
    }
}

/// Builds the service on top of an already running state store.
pub fn build_service(
    cfg: &Config,
    states: DbActorHandle,
    confirm: Arc<dyn Confirm>,
) -> ModuleService {
    let descriptors = DescriptorStore::from_paths(&cfg.paths);
    let manager: Arc<dyn PackageManager> = Arc::new(ProcessPackageManager::from_config(
        &cfg.package_manager,
        cfg.paths.base_path.clone(),
    ));
    let installer = DependencyInstaller::new(descriptors.clone(), states.clone(), manager);
    let events: Arc<dyn EventSink> = Arc::new(TracingEventSink);

    ModuleService::new(ModuleContext {
        descriptors,
        states,
        installer,
        events,
        confirm,
        activation: cfg.activation.clone(),
    })
}

/// Runs one CLI command to completion and maps the outcome to a process exit code.
pub async fn run(cli: Cli, cfg: &Config) -> Result<ExitCode, ModsyncError> {
    let dry_run = matches!(&cli.command, Command::Sync(args) if args.dry_run);
    let states = if dry_run {
        db::spawn_read_only(&cfg.basic.database_url).await?
    } else {
        db::spawn(&cfg.basic.database_url).await?
    };
    let autoload = CommandAutoload::new(
        cfg.package_manager.autoload_commands.clone(),
        cfg.paths.base_path.clone(),
    );

    let code = match cli.command {
        Command::Enable {
            modules,
            interaction,
        } => {
            let service = build_service(cfg, states.clone(), confirm_for(interaction));
            let batch = service.enable_many(&modules).await;
            print!("{}", report::render_batch(&batch));
            autoload.regenerate().await;
            exit_code(batch.success())
        }
        Command::Disable { modules } => {
            let service =
                build_service(cfg, states.clone(), confirm_for(InteractionArgs::default()));
            let batch = service.disable_many(&modules).await;
            print!("{}", report::render_batch(&batch));
            autoload.regenerate().await;
            exit_code(batch.success())
        }
        Command::Sync(args) => {
            let policy = args.policy();
            if policy.dry_run {
                println!("DRY RUN MODE - No changes will be made");
            }
            let service = build_service(cfg, states.clone(), confirm_for(args.interaction));
            let results = service.reconcile_all(&args.modules, &policy).await;
            if results.is_empty() {
                println!("No modules found to sync.");
            }
            print!("{}", report::render_sync_table(&results));
            if !policy.resolves_conflicts()
                && let Some(guidance) = report::conflict_guidance(&results)
            {
                print!("{guidance}");
            }
            if !policy.dry_run {
                autoload.regenerate().await;
            }
            info!(modules = results.len(), "module synchronization completed");
            ExitCode::SUCCESS
        }
    };

    states.shutdown();
    Ok(code)
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
