use clap::Parser;
use modsync::cli::Cli;
use modsync::config::Config;
use std::process::ExitCode;

#[tokio::test]
async fn dry_run_sync_leaves_a_fresh_checkout_untouched() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let module_dir = tmp_dir.path().join("Modules/Blog");
    std::fs::create_dir_all(&module_dir).unwrap();
    let descriptor = r#"{"enabled": true, "dependencies": ["acme/markdown"]}"#;
    std::fs::write(module_dir.join("module.json"), descriptor).unwrap();
    let db_path = tmp_dir.path().join("modules.db");

    let mut cfg = Config::default();
    cfg.basic.database_url = format!("sqlite:{}", db_path.to_str().unwrap());
    cfg.paths.base_path = tmp_dir.path().to_path_buf();
    cfg.package_manager.program = "modsync-no-such-program".to_string();
    cfg.package_manager.autoload_commands = Vec::new();

    let cli = Cli::parse_from(["modsync", "sync", "--dry-run", "--no-interaction"]);
    let code = modsync::app::run(cli, &cfg).await.unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(!db_path.exists(), "dry run must not create the database");
    assert_eq!(
        std::fs::read_to_string(module_dir.join("module.json")).unwrap(),
        descriptor
    );
}
