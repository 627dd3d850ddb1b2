use std::collections::HashSet;
use std::sync::Arc;

use modsync_reconcile_core::{declared_packages, removable_packages};
use modsync_schema::DependencySpec;
use tracing::{debug, info, warn};

use crate::db::DbActorHandle;
use crate::descriptor::DescriptorStore;
use crate::error::ModsyncError;
use crate::utils::logging::join_names;

use super::PackageManager;

/// Packages handled by one install pass. Failures never fail the pass as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: Vec<String>,
    /// Still declared by another enabled module.
    pub retained: Vec<String>,
}

/// Installs and removes a module's declared packages, never removing one another enabled
/// module still needs.
#[derive(Clone)]
pub struct DependencyInstaller {
    descriptors: DescriptorStore,
    states: DbActorHandle,
    manager: Arc<dyn PackageManager>,
}

impl DependencyInstaller {
    pub fn new(
        descriptors: DescriptorStore,
        states: DbActorHandle,
        manager: Arc<dyn PackageManager>,
    ) -> Self {
        Self {
            descriptors,
            states,
            manager,
        }
    }

    /// Installs every package `module` declares, one call each.
    ///
    /// An unreadable descriptor is logged and yields an empty report.
    pub async fn install_dependencies(&self, module: &str) -> InstallReport {
        match self.descriptors.dependency_specs(module) {
            Ok(specs) => self.install_specs(module, &specs).await,
            Err(e) => {
                warn!(module = %module, error = %e, "cannot read dependencies, skipping install");
                InstallReport::default()
            }
        }
    }

    pub async fn install_specs(&self, module: &str, specs: &[DependencySpec]) -> InstallReport {
        let mut report = InstallReport::default();
        if specs.is_empty() {
            debug!(module = %module, "no dependencies declared");
            return report;
        }

        info!(module = %module, count = specs.len(), "installing dependencies");
        for spec in specs {
            match self.manager.install_package(spec).await {
                Ok(()) => {
                    info!(module = %module, package = %spec, "installed");
                    report.installed.push(spec.package.clone());
                }
                Err(source) => {
                    let e = ModsyncError::DependencyInstall {
                        package: spec.to_string(),
                        source,
                    };
                    warn!(module = %module, package = %spec, error = %e, "install failed, continuing");
                    report.failed.push(spec.package.clone());
                }
            }
        }
        report
    }

    /// Removes the packages of `module` that no other enabled module declares.
    ///
    /// Every candidate is attempted; any failure turns the result into `DependencyRemoval`.
    /// When another enabled module's descriptor cannot be read nothing is removed, since
    /// its needs are unknown.
    pub async fn remove_dependencies(&self, module: &str) -> Result<RemovalReport, ModsyncError> {
        let specs = self.descriptors.dependency_specs(module)?;
        if specs.is_empty() {
            debug!(module = %module, "no dependencies declared, nothing to remove");
            return Ok(RemovalReport::default());
        }

        let still_required = self.packages_needed_by_others(module).await?;
        let removable = removable_packages(&specs, &still_required);
        let retained: Vec<String> = specs
            .iter()
            .filter(|s| still_required.contains(&s.package))
            .map(|s| s.package.clone())
            .collect();
        if !retained.is_empty() {
            info!(
                module = %module,
                retained = %join_names(&retained),
                "keeping packages used by other enabled modules"
            );
        }

        let mut report = RemovalReport {
            retained,
            ..RemovalReport::default()
        };
        let mut failed = Vec::new();
        for spec in removable {
            match self.manager.remove_package(&spec.package).await {
                Ok(()) => {
                    info!(module = %module, package = %spec.package, "removed");
                    report.removed.push(spec.package);
                }
                Err(e) => {
                    warn!(module = %module, package = %spec.package, error = %e, "remove failed");
                    failed.push(spec.package);
                }
            }
        }

        if failed.is_empty() {
            Ok(report)
        } else {
            Err(ModsyncError::DependencyRemoval {
                module: module.to_string(),
                packages: failed,
            })
        }
    }

    async fn packages_needed_by_others(
        &self,
        module: &str,
    ) -> Result<HashSet<String>, ModsyncError> {
        let enabled = self.states.list_enabled().await?;
        let mut needed = HashSet::new();
        for row in enabled.iter().filter(|row| row.name != module) {
            let specs = self.descriptors.dependency_specs(&row.name)?;
            needed.extend(declared_packages(&specs));
        }
        Ok(needed)
    }
}
