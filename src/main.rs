use clap::Parser;
use mimalloc::MiMalloc;
use modsync::cli::Cli;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = match modsync::app::load_config(cli.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("modsync: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        base_path = %cfg.paths.base_path.display(),
        loglevel = %cfg.basic.loglevel,
        package_manager = %cfg.package_manager.program,
        max_depth = cfg.activation.max_depth,
    );

    match modsync::app::run(cli, &cfg).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "modsync failed");
            ExitCode::FAILURE
        }
    }
}
