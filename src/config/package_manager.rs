use serde::{Deserialize, Serialize};

/// Replaced by `package:constraint` in `install_args`.
pub const SPEC_PLACEHOLDER: &str = "{spec}";
/// Replaced by the bare package id in `remove_args`.
pub const PACKAGE_PLACEHOLDER: &str = "{package}";

/// External package manager configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManagerConfig {
    /// Executable invoked for install/remove.
    /// TOML: `package_manager.program`. Default: `composer`.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments for installing one package; `{spec}` expands to `package:constraint`.
    /// TOML: `package_manager.install_args`.
    #[serde(default = "default_install_args")]
    pub install_args: Vec<String>,

    /// Arguments for removing one package; `{package}` expands to the package id.
    /// TOML: `package_manager.remove_args`.
    #[serde(default = "default_remove_args")]
    pub remove_args: Vec<String>,

    /// Commands run once after a batch changed module state, each as `[program, args...]`.
    /// TOML: `package_manager.autoload_commands`. Default: `[["composer", "dump-autoload"]]`.
    #[serde(default = "default_autoload_commands")]
    pub autoload_commands: Vec<Vec<String>>,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            install_args: default_install_args(),
            remove_args: default_remove_args(),
            autoload_commands: default_autoload_commands(),
        }
    }
}

fn default_program() -> String {
    "composer".to_string()
}

fn default_install_args() -> Vec<String> {
    ["require", SPEC_PLACEHOLDER, "--optimize-autoloader", "--no-interaction"]
        .map(String::from)
        .to_vec()
}

fn default_remove_args() -> Vec<String> {
    ["remove", PACKAGE_PLACEHOLDER, "--no-interaction"]
        .map(String::from)
        .to_vec()
}

fn default_autoload_commands() -> Vec<Vec<String>> {
    vec![vec!["composer".to_string(), "dump-autoload".to_string()]]
}
