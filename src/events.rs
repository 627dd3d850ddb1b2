//! Lifecycle notifications for module state transitions.

use std::fmt;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleEvent {
    Enabled(String),
    Disabled(String),
}

impl ModuleEvent {
    pub fn transition(module: impl Into<String>, enabled: bool) -> Self {
        if enabled {
            Self::Enabled(module.into())
        } else {
            Self::Disabled(module.into())
        }
    }

    pub fn module(&self) -> &str {
        match self {
            Self::Enabled(m) | Self::Disabled(m) => m,
        }
    }
}

impl fmt::Display for ModuleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled(m) => write!(f, "ModuleEnabled({m})"),
            Self::Disabled(m) => write!(f, "ModuleDisabled({m})"),
        }
    }
}

/// Receives one event per state-row transition.
pub trait EventSink: Send + Sync {
    fn dispatch(&self, event: ModuleEvent);
}

/// Default sink: events become log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn dispatch(&self, event: ModuleEvent) {
        info!(module = %event.module(), event = %event, "module event");
    }
}
