use std::fs;
use std::path::{Component, Path, PathBuf};

use modsync_schema::{DependencySpec, ModuleDescriptor};
use tracing::debug;

use crate::config::PathsConfig;
use crate::error::ModsyncError;
use crate::utils::logging::with_pretty_json_debug;

use super::discovery::discover_modules;

/// A parsed descriptor together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDescriptor {
    pub module: String,
    pub path: PathBuf,
    pub descriptor: ModuleDescriptor,
}

/// Reads and writes `module.json` files under one or more module roots.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    roots: Vec<PathBuf>,
    file_name: String,
}

impl DescriptorStore {
    pub fn new(roots: Vec<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            roots,
            file_name: file_name.into(),
        }
    }

    pub fn from_paths(paths: &PathsConfig) -> Self {
        Self::new(paths.module_roots(), paths.descriptor_file.clone())
    }

    /// All module directory names across the roots, primary root first.
    pub fn discover(&self) -> Vec<String> {
        discover_modules(&self.roots)
    }

    /// First root containing a directory called `module`.
    pub fn module_dir(&self, module: &str) -> Option<PathBuf> {
        if !is_plain_name(module) {
            return None;
        }
        self.roots
            .iter()
            .map(|root| root.join(module))
            .find(|dir| dir.is_dir())
    }

    pub fn descriptor_path(&self, module: &str) -> Result<PathBuf, ModsyncError> {
        let dir = self
            .module_dir(module)
            .ok_or_else(|| ModsyncError::ModuleNotFound(module.to_string()))?;
        let path = dir.join(&self.file_name);
        if !path.is_file() {
            return Err(ModsyncError::DescriptorNotFound {
                module: module.to_string(),
                path,
            });
        }
        Ok(path)
    }

    /// Directory and descriptor file both present.
    pub fn exists(&self, module: &str) -> bool {
        self.descriptor_path(module).is_ok()
    }

    pub fn load(&self, module: &str) -> Result<LoadedDescriptor, ModsyncError> {
        let path = self.descriptor_path(module)?;
        let raw = fs::read_to_string(&path)?;
        let descriptor = ModuleDescriptor::from_json_str(&raw).map_err(|source| {
            ModsyncError::MalformedDescriptor {
                module: module.to_string(),
                source,
            }
        })?;
        Ok(LoadedDescriptor {
            module: module.to_string(),
            path,
            descriptor,
        })
    }

    pub fn save(&self, loaded: &LoadedDescriptor) -> Result<(), ModsyncError> {
        let json = loaded.descriptor.to_json_pretty()?;
        with_pretty_json_debug(&loaded.descriptor, |pretty| {
            debug!(module = %loaded.module, path = %loaded.path.display(), descriptor = %pretty, "writing descriptor");
        });
        write_atomically(&loaded.path, json.as_bytes())?;
        Ok(())
    }

    /// Parsed dependency specs of `module`; a module without a descriptor declares none.
    pub fn dependency_specs(&self, module: &str) -> Result<Vec<DependencySpec>, ModsyncError> {
        match self.load(module) {
            Ok(loaded) => Ok(loaded.descriptor.dependency_specs()),
            Err(ModsyncError::ModuleNotFound(_) | ModsyncError::DescriptorNotFound { .. }) => {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Module names are single path components; anything else can never match a module directory.
fn is_plain_name(module: &str) -> bool {
    let mut components = Path::new(module).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn store_with(dir: &Path) -> DescriptorStore {
        DescriptorStore::new(
            vec![dir.join("Modules"), dir.join("vendor/rcv")],
            "module.json",
        )
    }

    fn write_module(root: &Path, name: &str, body: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("module.json"), body).unwrap();
    }

    #[test]
    fn falls_back_to_vendor_root() {
        let dir = tempfile::tempdir().unwrap();
        write_module(&dir.path().join("vendor/rcv"), "Billing", r#"{"enabled": true}"#);
        let store = store_with(dir.path());

        let loaded = store.load("Billing").unwrap();
        assert!(loaded.descriptor.enabled);
        assert!(loaded.path.starts_with(dir.path().join("vendor/rcv")));
    }

    #[test]
    fn missing_directory_and_missing_file_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Modules/Empty")).unwrap();
        let store = store_with(dir.path());

        assert!(matches!(
            store.load("Nope"),
            Err(ModsyncError::ModuleNotFound(name)) if name == "Nope"
        ));
        assert!(matches!(
            store.load("Empty"),
            Err(ModsyncError::DescriptorNotFound { .. })
        ));
        assert!(!store.exists("Empty"));
    }

    #[test]
    fn malformed_json_is_reported_per_module() {
        let dir = tempfile::tempdir().unwrap();
        write_module(&dir.path().join("Modules"), "Broken", "{ not json");
        let store = store_with(dir.path());

        assert!(matches!(
            store.load("Broken"),
            Err(ModsyncError::MalformedDescriptor { module, .. }) if module == "Broken"
        ));
        assert!(store.dependency_specs("Broken").is_err());
    }

    #[test]
    fn path_like_names_never_resolve() {
        let dir = tempfile::tempdir().unwrap();
        write_module(&dir.path().join("Modules"), "Blog", "{}");
        let store = store_with(dir.path());

        assert!(store.module_dir("../Modules").is_none());
        assert!(store.module_dir("Blog/..").is_none());
        assert!(store.module_dir("Blog").is_some());
    }

    #[test]
    fn save_round_trips_and_preserves_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        write_module(
            &dir.path().join("Modules"),
            "Blog",
            r#"{"name":"Blog","enabled":false,"dependencies":["acme/md:^1.0"],"providers":["Blog/Provider"]}"#,
        );
        let store = store_with(dir.path());

        let mut loaded = store.load("Blog").unwrap();
        loaded.descriptor.mark_enabled(true, Utc::now());
        store.save(&loaded).unwrap();

        let raw = fs::read_to_string(&loaded.path).unwrap();
        assert!(raw.contains("\"Blog/Provider\""));
        let reloaded = store.load("Blog").unwrap();
        assert!(reloaded.descriptor.enabled);
        assert!(reloaded.descriptor.last_enabled_at.is_some());
        assert_eq!(
            reloaded.descriptor.dependency_specs(),
            loaded.descriptor.dependency_specs()
        );
    }

    #[test]
    fn absent_module_declares_no_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(dir.path());
        assert!(store.dependency_specs("Ghost").unwrap().is_empty());
    }
}
