use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Module tree layout. Relative directories resolve against `base_path`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Project root; also the working directory of package manager commands.
    /// TOML: `paths.base_path`. Default: `.`.
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// Primary module directory, one sub-directory per module.
    /// TOML: `paths.modules_dir`. Default: `Modules`.
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,

    /// Secondary module directory for vendor-installed modules, searched after `modules_dir`.
    /// TOML: `paths.vendor_dir`. Default: `vendor/rcv`.
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: Option<PathBuf>,

    /// Descriptor file name inside each module directory.
    /// TOML: `paths.descriptor_file`. Default: `module.json`.
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            modules_dir: default_modules_dir(),
            vendor_dir: default_vendor_dir(),
            descriptor_file: default_descriptor_file(),
        }
    }
}

impl PathsConfig {
    /// Module roots in lookup order.
    pub fn module_roots(&self) -> Vec<PathBuf> {
        std::iter::once(&self.modules_dir)
            .chain(self.vendor_dir.as_ref())
            .map(|dir| self.base_path.join(dir))
            .collect()
    }
}

fn default_base_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("Modules")
}

#[allow(clippy::unnecessary_wraps)]
fn default_vendor_dir() -> Option<PathBuf> {
    Some(PathBuf::from("vendor/rcv"))
}

fn default_descriptor_file() -> String {
    "module.json".to_string()
}
