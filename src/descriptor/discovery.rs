use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Lists module names (directory names) under each root.
///
/// Roots are scanned in order; a name already seen in an earlier root is skipped. Names are
/// sorted within each root.
pub fn discover_modules(roots: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for root in roots {
        for name in module_dirs(root) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    debug!(count = names.len(), "modules discovered");
    names
}

fn module_dirs(root: &Path) -> BTreeSet<String> {
    if !root.is_dir() {
        info!(path = %root.display(), "module root not found; skipping");
        return BTreeSet::new();
    }
    let iter = match fs::read_dir(root) {
        Ok(iter) => iter,
        Err(e) => {
            warn!(path = %root.display(), error = %e, "failed to read module root");
            return BTreeSet::new();
        }
    };
    iter.filter_map(|entry| match entry {
        Ok(e) => Some(e.path()),
        Err(e) => {
            warn!(error = %e, "failed to read module root entry");
            None
        }
    })
    .filter(|path| path.is_dir())
    .filter_map(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    })
    .filter(|name| !name.starts_with('.'))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primary_root_wins_and_names_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let modules = dir.path().join("Modules");
        let vendor = dir.path().join("vendor");
        for path in [
            modules.join("Shop"),
            modules.join("Blog"),
            modules.join(".git"),
            vendor.join("Blog"),
            vendor.join("Analytics"),
        ] {
            fs::create_dir_all(path).unwrap();
        }
        fs::write(modules.join("README.md"), "not a module").unwrap();

        let names = discover_modules(&[modules, vendor, dir.path().join("missing")]);
        assert_eq!(names, vec!["Blog", "Shop", "Analytics"]);
    }
}
