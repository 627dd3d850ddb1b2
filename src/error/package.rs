use thiserror::Error as ThisError;

use super::IsModuleFault;

/// Failure of one external package manager invocation.
#[derive(Debug, ThisError)]
pub enum PackageError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {output}")]
    Exit {
        command: String,
        status: String,
        output: String,
    },
}

impl IsModuleFault for PackageError {
    fn is_module_fault(&self) -> bool {
        // A non-zero exit usually means the declared package or constraint is bad.
        matches!(self, PackageError::Exit { .. })
    }
}
