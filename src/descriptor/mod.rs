//! File-backed module descriptors.

mod discovery;
mod store;

pub use discovery::discover_modules;
pub use store::{DescriptorStore, LoadedDescriptor};
