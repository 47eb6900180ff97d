//! Plugin system configuration.

use serde::{Deserialize, Serialize};

/// Plugin system configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Names of the plugins to load, in load order.
    ///
    /// The order here is the registration order, and therefore the order in
    /// which every hook is dispatched.
    #[serde(default)]
    pub enabled: Vec<String>,
}
