//! Prelude for plugin crates.

pub use datahub_core::error::AppError;
pub use datahub_core::result::AppResult;
pub use datahub_core::types::{Context, DataDict, FacetsDict, Schema, Settings};

pub use crate::exports::PluginExport;
pub use crate::interfaces::*;
pub use crate::loader::PluginCatalog;
pub use crate::registry::PluginInfo;

pub use crate::{plugin_export, plugin_info};
