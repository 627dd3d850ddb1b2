use std::path::PathBuf;
use thiserror::Error as ThisError;

use super::IsModuleFault;
use super::package::PackageError;

#[derive(Debug, ThisError)]
pub enum ModsyncError {
    #[error("Module [{0}] not found")]
    ModuleNotFound(String),

    #[error("Descriptor for module [{module}] not found at {}", path.display())]
    DescriptorNotFound { module: String, path: PathBuf },

    #[error("Malformed descriptor for module [{module}]: {source}")]
    MalformedDescriptor {
        module: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to install {package}: {source}")]
    DependencyInstall {
        package: String,
        #[source]
        source: PackageError,
    },

    #[error("Failed to remove dependencies for module [{module}]: {}", packages.join(", "))]
    DependencyRemoval {
        module: String,
        packages: Vec<String>,
    },

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<figment::Error> for ModsyncError {
    fn from(e: figment::Error) -> Self {
        ModsyncError::ConfigError(Box::new(e))
    }
}

impl IsModuleFault for ModsyncError {
    fn is_module_fault(&self) -> bool {
        match self {
            ModsyncError::ModuleNotFound(_)
            | ModsyncError::DescriptorNotFound { .. }
            | ModsyncError::MalformedDescriptor { .. }
            | ModsyncError::DependencyRemoval { .. } => true,
            ModsyncError::DependencyInstall { source, .. } => source.is_module_fault(),
            ModsyncError::Package(e) => e.is_module_fault(),
            _ => false,
        }
    }
}
