use async_trait::async_trait;
use modsync_schema::DependencySpec;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::config::{PACKAGE_PLACEHOLDER, PackageManagerConfig, SPEC_PLACEHOLDER};
use crate::error::PackageError;

/// One install or removal per call; batching is the caller's business.
#[async_trait]
pub trait PackageManager: Send + Sync {
    async fn install_package(&self, spec: &DependencySpec) -> Result<(), PackageError>;

    async fn remove_package(&self, package: &str) -> Result<(), PackageError>;
}

/// Runs the configured package manager executable as a blocking child process.
#[derive(Debug, Clone)]
pub struct ProcessPackageManager {
    program: String,
    install_args: Vec<String>,
    remove_args: Vec<String>,
    working_dir: PathBuf,
}

impl ProcessPackageManager {
    pub fn from_config(cfg: &PackageManagerConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: cfg.program.clone(),
            install_args: cfg.install_args.clone(),
            remove_args: cfg.remove_args.clone(),
            working_dir: working_dir.into(),
        }
    }

    fn expand(args: &[String], placeholder: &str, value: &str) -> Vec<String> {
        args.iter().map(|a| a.replace(placeholder, value)).collect()
    }
}

#[async_trait]
impl PackageManager for ProcessPackageManager {
    async fn install_package(&self, spec: &DependencySpec) -> Result<(), PackageError> {
        let args = Self::expand(&self.install_args, SPEC_PLACEHOLDER, &spec.to_string());
        run_command(&self.program, &args, &self.working_dir).await
    }

    async fn remove_package(&self, package: &str) -> Result<(), PackageError> {
        let args = Self::expand(&self.remove_args, PACKAGE_PLACEHOLDER, package);
        run_command(&self.program, &args, &self.working_dir).await
    }
}

/// Runs `program args...` in `dir` to completion, capturing output for error reports.
pub(crate) async fn run_command(
    program: &str,
    args: &[String],
    dir: &Path,
) -> Result<(), PackageError> {
    let command_line = std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    debug!(command = %command_line, dir = %dir.display(), "running external command");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| PackageError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Err(PackageError::Exit {
        command: command_line,
        status: output.status.to_string(),
        output: combined.trim().to_string(),
    })
}
