use serde::{Deserialize, Serialize};

/// Required-module activation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActivationConfig {
    /// How many levels of required modules are walked when a module is enabled.
    /// `1` only looks at the module's own list; larger values follow requirements of
    /// requirements.
    /// TOML: `activation.max_depth`. Default: `1`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    1
}
