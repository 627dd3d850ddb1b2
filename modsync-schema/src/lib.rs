pub mod dependency;
pub mod descriptor;
pub mod state;
pub mod sync;

pub use dependency::{ANY_VERSION, DependencySpec, parse_dependencies};
pub use descriptor::{DEFAULT_MODULE_VERSION, ModuleDescriptor, default_description};
pub use state::ModuleStatus;
pub use sync::{SyncAction, SyncResult, SyncStatus};
