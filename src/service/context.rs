use std::sync::Arc;

use crate::config::ActivationConfig;
use crate::db::DbActorHandle;
use crate::dependencies::DependencyInstaller;
use crate::descriptor::DescriptorStore;
use crate::events::EventSink;
use crate::prompt::Confirm;

/// Collaborators shared by every lifecycle operation.
#[derive(Clone)]
pub struct ModuleContext {
    pub descriptors: DescriptorStore,
    pub states: DbActorHandle,
    pub installer: DependencyInstaller,
    pub events: Arc<dyn EventSink>,
    pub confirm: Arc<dyn Confirm>,
    pub activation: ActivationConfig,
}
