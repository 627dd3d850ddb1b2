mod activation;
mod basic;
mod package_manager;
mod paths;

pub use activation::ActivationConfig;
pub use basic::BasicConfig;
pub use package_manager::{PACKAGE_PLACEHOLDER, PackageManagerConfig, SPEC_PLACEHOLDER};
pub use paths::PathsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core settings (see `basic` table in modsync.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Where modules and their descriptors live (see `paths` table).
    #[serde(default)]
    pub paths: PathsConfig,

    /// External package manager invocation (see `package_manager` table).
    #[serde(default)]
    pub package_manager: PackageManagerConfig,

    /// Required-module activation (see `activation` table).
    #[serde(default)]
    pub activation: ActivationConfig,
}

pub const DEFAULT_CONFIG_FILE: &str = "modsync.toml";

/// Environment overrides, e.g. `MODSYNC_BASIC__DATABASE_URL`.
const ENV_PREFIX: &str = "MODSYNC_";

impl Config {
    /// Builds a Figment that merges defaults, a TOML file (if present) and the environment.
    pub fn figment(path: &Path) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if path.is_file() {
            figment.merge(Toml::file(path))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from `path` (optional) on top of defaults.
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_without_a_file() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(cfg.basic.database_url, "sqlite://modules.db");
        assert_eq!(cfg.paths.modules_dir, PathBuf::from("Modules"));
        assert_eq!(cfg.package_manager.program, "composer");
        assert_eq!(cfg.activation.max_depth, 1);
    }

    #[test]
    fn toml_overrides_nested_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modsync.toml");
        std::fs::write(
            &path,
            r#"
            [paths]
            base_path = "/srv/app"

            [package_manager]
            program = "echo"
            autoload_commands = []

            [activation]
            max_depth = 3
            "#,
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.paths.base_path, PathBuf::from("/srv/app"));
        assert_eq!(cfg.paths.descriptor_file, "module.json");
        assert_eq!(cfg.package_manager.program, "echo");
        assert!(cfg.package_manager.autoload_commands.is_empty());
        assert_eq!(cfg.activation.max_depth, 3);
    }
}
