use std::sync::Arc;

use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict};

use crate::interfaces::{PreviewSupport, ResourcePreview, ResourceView, ViewInfo};
use crate::registry::PluginInfo;

use super::HookDispatcher;

/// The preview plugin chosen for a resource.
pub struct SelectedPreview<'a> {
    /// The plugin providing the preview.
    pub plugin: &'a PluginInfo,
    /// What the plugin reported.
    pub support: PreviewSupport,
    /// The preview hook object.
    pub hook: &'a Arc<dyn ResourcePreview>,
}

impl SelectedPreview<'_> {
    /// Template variables and template of the preview.
    pub fn render(&self, ctx: &Context, data: &DataDict) -> AppResult<(DataDict, String)> {
        let variables = self.hook.setup_template_variables(ctx, data)?;
        Ok((variables, self.hook.preview_template(ctx, data)))
    }
}

impl HookDispatcher {
    /// Picks the preview plugin for a resource.
    ///
    /// Every preview plugin is asked whether it can preview `data`; the
    /// highest quality wins and ties go to the plugin loaded first.
    pub fn select_preview(&self, data: &DataDict) -> Option<SelectedPreview<'_>> {
        let mut best: Option<SelectedPreview<'_>> = None;
        for implementation in self.registry().implementations::<dyn ResourcePreview>() {
            let support = implementation.hook.can_preview(data);
            if !support.can_preview {
                continue;
            }
            if best
                .as_ref()
                .is_some_and(|current| current.support.quality >= support.quality)
            {
                continue;
            }
            best = Some(SelectedPreview {
                plugin: implementation.plugin,
                support,
                hook: implementation.hook,
            });
        }
        best
    }

    /// Reasons previews could be enabled for a resource no plugin can
    /// currently preview.
    pub fn fixable_previews(&self, data: &DataDict) -> Vec<(String, String)> {
        self.registry()
            .implementations::<dyn ResourcePreview>()
            .filter_map(|implementation| {
                implementation
                    .hook
                    .can_preview(data)
                    .fixable
                    .map(|reason| (implementation.plugin.name.clone(), reason))
            })
            .collect()
    }

    /// Info of every registered resource view, in load order.
    pub fn view_plugins(&self) -> Vec<ViewInfo> {
        self.registry()
            .implementations::<dyn ResourceView>()
            .map(|implementation| implementation.hook.info())
            .collect()
    }

    /// Views that can display a resource.
    pub fn views_for(&self, data: &DataDict) -> Vec<ViewInfo> {
        self.registry()
            .implementations::<dyn ResourceView>()
            .filter(|implementation| implementation.hook.can_view(data))
            .map(|implementation| implementation.hook.info())
            .collect()
    }

    /// Looks up a resource view by its `info().name`.
    pub fn view(&self, name: &str) -> Option<&Arc<dyn ResourceView>> {
        self.registry()
            .implementations::<dyn ResourceView>()
            .find(|implementation| implementation.hook.info().name == name)
            .map(|implementation| implementation.hook)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::exports::PluginExport;
    use crate::registry::PluginRegistry;
    use datahub_core::types::dict::data_dict;

    struct Preview {
        format: &'static str,
        quality: u8,
        template: &'static str,
    }

    impl ResourcePreview for Preview {
        fn can_preview(&self, data: &DataDict) -> PreviewSupport {
            match data.get("format").and_then(|v| v.as_str()) {
                Some(format) if format == self.format => PreviewSupport::supported(self.quality),
                Some(_) if self.format == "proxy" => PreviewSupport::fixable("Enable resource_proxy"),
                _ => PreviewSupport::unsupported(),
            }
        }

        fn preview_template(&self, _ctx: &Context, _data: &DataDict) -> String {
            self.template.to_string()
        }
    }

    struct TextView;

    impl ResourceView for TextView {
        fn info(&self) -> ViewInfo {
            ViewInfo::named("text_view")
        }

        fn can_view(&self, data: &DataDict) -> bool {
            data.get("format").and_then(|v| v.as_str()) == Some("txt")
        }

        fn view_template(&self, _ctx: &Context, _data: &DataDict) -> String {
            "text_view.html".to_string()
        }
    }

    fn dispatcher() -> HookDispatcher {
        let mut registry = PluginRegistry::new();
        let previews = [
            ("plain", "csv", 1, "plain.html"),
            ("grid", "csv", 3, "grid.html"),
            ("grid2", "csv", 3, "grid2.html"),
            ("proxy", "proxy", 1, "proxy.html"),
        ];
        for (name, format, quality, template) in previews {
            registry
                .register(
                    PluginExport::new(PluginInfo::new(name, "1.0.0")).implements::<dyn ResourcePreview>(
                        Arc::new(Preview {
                            format,
                            quality,
                            template,
                        }),
                    ),
                )
                .expect("register");
        }
        registry
            .register(
                PluginExport::new(PluginInfo::new("text_view", "1.0.0"))
                    .implements::<dyn ResourceView>(Arc::new(TextView)),
            )
            .expect("register");
        HookDispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_highest_quality_wins_ties_go_first() {
        let dispatcher = dispatcher();
        let data = data_dict(json!({"format": "csv"})).expect("object");

        let selected = dispatcher.select_preview(&data).expect("preview");
        assert_eq!(selected.plugin.name, "grid");
        let (_, template) = selected.render(&Context::anonymous(), &data).expect("render");
        assert_eq!(template, "grid.html");
    }

    #[test]
    fn test_no_preview_reports_fixes() {
        let dispatcher = dispatcher();
        let data = data_dict(json!({"format": "pdf"})).expect("object");

        assert!(dispatcher.select_preview(&data).is_none());
        assert_eq!(
            dispatcher.fixable_previews(&data),
            vec![("proxy".to_string(), "Enable resource_proxy".to_string())]
        );
    }

    #[test]
    fn test_views_for_resource() {
        let dispatcher = dispatcher();
        let txt = data_dict(json!({"format": "txt"})).expect("object");

        assert_eq!(dispatcher.view_plugins().len(), 1);
        assert_eq!(dispatcher.views_for(&txt)[0].name, "text_view");
        assert!(dispatcher.views_for(&DataDict::new()).is_empty());
        assert!(dispatcher.view("text_view").is_some());
    }
}
