//! Convenience macros for plugin development.

/// Builds a [`PluginInfo`](crate::registry::PluginInfo).
///
/// # Example
/// ```rust,ignore
/// let info = plugin_info!(
///     name: "example_ifacets",
///     version: "1.0.0",
///     description: "Relabels search facets",
///     author: "DataHub"
/// );
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        name: $name:expr,
        version: $version:expr
    ) => {
        $crate::prelude::PluginInfo::new($name, $version)
    };
    (
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr,
        author: $author:expr
    ) => {
        $crate::prelude::PluginInfo {
            name: $name.to_string(),
            version: $version.to_string(),
            description: $desc.to_string(),
            author: $author.to_string(),
        }
    };
}

/// Builds a [`PluginExport`](crate::exports::PluginExport) declaring the
/// listed interfaces for one plugin object.
///
/// # Example
/// ```rust,ignore
/// let export = plugin_export!(info, Arc::new(MyPlugin), [Facets, DatasetForm]);
/// ```
#[macro_export]
macro_rules! plugin_export {
    ($info:expr, $plugin:expr, [$($interface:ident),* $(,)?]) => {{
        let plugin = $plugin;
        $crate::prelude::PluginExport::new($info)
            $(.implements::<dyn $crate::interfaces::$interface>(plugin.clone()))*
    }};
}
