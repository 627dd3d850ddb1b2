mod modsync;
mod package;

pub use modsync::ModsyncError;
pub use package::PackageError;

/// Separates problems in a module's own files from environment failures, so batch loops can
/// report the former as warnings.
pub trait IsModuleFault {
    fn is_module_fault(&self) -> bool;
}
