//! Module dependency installation and removal through an external package manager.

mod installer;
mod package_manager;

pub use installer::{DependencyInstaller, InstallReport, RemovalReport};
pub use package_manager::{PackageManager, ProcessPackageManager};
pub(crate) use package_manager::run_command;
