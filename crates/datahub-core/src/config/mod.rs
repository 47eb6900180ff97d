//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod plugin;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::plugin::PluginConfig;

use crate::error::AppError;
use crate::types::Settings;

/// Prefix for environment variable overrides (`DATAHUB__PLUGINS__ENABLED`).
const ENV_PREFIX: &str = "DATAHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Plugin loading settings.
    #[serde(default)]
    pub plugins: PluginConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Free-form settings handed to configurer and configurable plugins.
    #[serde(default)]
    pub settings: Settings,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// and environment variables prefixed with `DATAHUB__`. The plugin list
    /// may be given in the environment as a space-separated string.
    pub fn load(env: &str) -> Result<Self, AppError> {
        tracing::debug!(env = %env, "Loading configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("plugins.enabled")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_toml_keeps_plugin_order() {
        let config = AppConfig::from_toml(
            r#"
            [plugins]
            enabled = ["example_ifacets", "example_idatasetform", "audit_log"]

            [logging]
            level = "debug"

            [settings]
            site_title = "Open Data"
            "#,
        )
        .expect("valid config");

        assert_eq!(
            config.plugins.enabled,
            vec!["example_ifacets", "example_idatasetform", "audit_log"]
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(
            config.settings.get("site_title").map(String::as_str),
            Some("Open Data")
        );
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").expect("empty config");
        assert!(config.plugins.enabled.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_malformed_document_is_configuration_error() {
        let err = AppConfig::from_toml("[plugins\nenabled = 3").unwrap_err();
        assert!(err.is(crate::error::ErrorKind::Configuration));
    }
}
