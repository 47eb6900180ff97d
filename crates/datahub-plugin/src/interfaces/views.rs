//! Resource views and previews.

use serde::{Deserialize, Serialize};

use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict, Schema};

/// Configuration of a resource view type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInfo {
    /// Name of the view type, e.g. `image_view`.
    pub name: String,
    /// Display title.
    pub title: Option<String>,
    /// Schema for validating extra view configuration.
    #[serde(default)]
    pub schema: Schema,
    /// Icon name.
    pub icon: Option<String>,
    /// Whether to render the view in an iframe.
    #[serde(default = "default_true")]
    pub iframed: bool,
    /// Whether a preview button appears for this view.
    #[serde(default)]
    pub preview_enabled: bool,
    /// Whether the edit form spans the full page width.
    #[serde(default)]
    pub full_page_edit: bool,
}

impl ViewInfo {
    /// View info with the given name and default options.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            title: None,
            schema: Schema::new(),
            icon: None,
            iframed: true,
            preview_enabled: false,
            full_page_edit: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Adds a custom data view for resource file types.
///
/// `data` holds `resource` and `package`, plus `resource_view` for the
/// template hooks.
pub trait ResourceView: Send + Sync {
    /// Configuration of this view type.
    fn info(&self) -> ViewInfo;

    /// Whether this view can display the resource.
    fn can_view(&self, _data: &DataDict) -> bool {
        false
    }

    /// Extra template variables. Returns a new dict; `data` is not modified.
    fn setup_template_variables(&self, _ctx: &Context, _data: &DataDict) -> AppResult<DataDict> {
        Ok(DataDict::new())
    }

    /// Template rendered when the view is shown.
    fn view_template(&self, ctx: &Context, data: &DataDict) -> String;

    /// Template for the view's edit form, if it has one.
    fn form_template(&self, _ctx: &Context, _data: &DataDict) -> Option<String> {
        None
    }
}

/// Whether and how well a plugin can preview a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSupport {
    /// Whether the plugin can preview the resource.
    pub can_preview: bool,
    /// How preview could be enabled when it currently cannot, e.g. by
    /// enabling a proxy plugin.
    pub fixable: Option<String>,
    /// Preview quality: 1 (poor), 2 (average), or 3 (good). When several
    /// plugins can preview the same resource, the highest quality wins.
    pub quality: u8,
}

impl PreviewSupport {
    /// Cannot preview.
    pub fn unsupported() -> Self {
        Self {
            can_preview: false,
            fixable: None,
            quality: 1,
        }
    }

    /// Can preview at the given quality.
    pub fn supported(quality: u8) -> Self {
        Self {
            can_preview: true,
            fixable: None,
            quality,
        }
    }

    /// Cannot preview, but could if the described change were made.
    pub fn fixable(reason: &str) -> Self {
        Self {
            can_preview: false,
            fixable: Some(reason.to_string()),
            quality: 1,
        }
    }
}

impl From<bool> for PreviewSupport {
    fn from(can_preview: bool) -> Self {
        Self {
            can_preview,
            fixable: None,
            quality: 1,
        }
    }
}

/// Provides a preview of a resource.
///
/// `data` holds the `resource` and the `package` it belongs to.
pub trait ResourcePreview: Send + Sync {
    /// Whether this plugin can preview the resource. Check the resource's
    /// `on_same_domain` value if the preview is subject to the same-origin
    /// policy.
    fn can_preview(&self, _data: &DataDict) -> PreviewSupport {
        PreviewSupport::unsupported()
    }

    /// Extra template variables, e.g. a proxied resource URL.
    fn setup_template_variables(&self, _ctx: &Context, _data: &DataDict) -> AppResult<DataDict> {
        Ok(DataDict::new())
    }

    /// Template rendered for the preview.
    fn preview_template(&self, ctx: &Context, data: &DataDict) -> String;
}
