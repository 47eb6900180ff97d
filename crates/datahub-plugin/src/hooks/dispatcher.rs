//! Hook dispatcher: invokes the providers of an interface in registration
//! order under one of the dispatch disciplines.
//!
//! - **filter**: each provider receives the value returned by the previous
//!   one. An error aborts the chain; later providers do not run and the
//!   caller gets the error, not a partial value.
//! - **notify**: every provider is called with the same arguments and
//!   returns nothing. The first error is returned immediately and the
//!   remaining providers are not notified.
//! - **first match**: providers are asked in order until one answers.
//!
//! Hook errors are passed to the caller unchanged.

use std::sync::Arc;

use tracing::{debug, error};

use datahub_core::result::AppResult;

use crate::interfaces::Hook;
use crate::registry::{PluginInfo, PluginRegistry};

/// Dispatches hook calls to the plugins of a frozen registry.
#[derive(Debug, Clone)]
pub struct HookDispatcher {
    registry: Arc<PluginRegistry>,
}

impl HookDispatcher {
    /// Creates a dispatcher over a frozen registry.
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Creates a dispatcher over the process-wide registry.
    pub fn current() -> AppResult<Self> {
        crate::global::current().map(Self::new)
    }

    /// Threads `initial` through every provider of `H`.
    pub fn filter<H, T, F>(&self, hook: &str, initial: T, mut call: F) -> AppResult<T>
    where
        H: Hook + ?Sized,
        F: FnMut(&H, T) -> AppResult<T>,
    {
        let mut value = initial;
        for implementation in self.registry.implementations::<H>() {
            debug!(
                plugin = %implementation.plugin.name,
                interface = %H::INTERFACE,
                hook = hook,
                "Dispatching filter hook"
            );
            value = call(implementation.hook.as_ref(), value)
                .inspect_err(|e| log_failure(implementation.plugin, H::INTERFACE.as_str(), hook, e))?;
        }
        Ok(value)
    }

    /// Calls every provider of `H`, stopping at the first error.
    pub fn notify<H, F>(&self, hook: &str, mut call: F) -> AppResult<()>
    where
        H: Hook + ?Sized,
        F: FnMut(&H) -> AppResult<()>,
    {
        for implementation in self.registry.implementations::<H>() {
            debug!(
                plugin = %implementation.plugin.name,
                interface = %H::INTERFACE,
                hook = hook,
                "Dispatching notification"
            );
            call(implementation.hook.as_ref())
                .inspect_err(|e| log_failure(implementation.plugin, H::INTERFACE.as_str(), hook, e))?;
        }
        Ok(())
    }

    /// Asks providers of `H` in order and returns the first answer, with
    /// the plugin that gave it.
    pub fn first_match<H, T, F>(&self, hook: &str, mut call: F) -> AppResult<Option<(&PluginInfo, T)>>
    where
        H: Hook + ?Sized,
        F: FnMut(&H) -> AppResult<Option<T>>,
    {
        for implementation in self.registry.implementations::<H>() {
            let answer = call(implementation.hook.as_ref())
                .inspect_err(|e| log_failure(implementation.plugin, H::INTERFACE.as_str(), hook, e))?;
            if let Some(value) = answer {
                debug!(
                    plugin = %implementation.plugin.name,
                    interface = %H::INTERFACE,
                    hook = hook,
                    "Hook answered"
                );
                return Ok(Some((implementation.plugin, value)));
            }
        }
        Ok(None)
    }

    /// The registry this dispatcher reads.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }
}

fn log_failure(plugin: &PluginInfo, interface: &str, hook: &str, err: &datahub_core::error::AppError) {
    error!(
        plugin = %plugin.name,
        interface = %interface,
        hook = hook,
        error = %err,
        "Plugin hook failed"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::exports::PluginExport;
    use crate::interfaces::StreamFilter;
    use datahub_core::error::AppError;

    struct Append(&'static str);

    impl StreamFilter for Append {
        fn filter(&self, stream: String) -> AppResult<String> {
            if self.0 == "fail" {
                return Err(AppError::plugin("stream filter failed"));
            }
            Ok(format!("{stream}{}", self.0))
        }
    }

    fn dispatcher(filters: &[&'static str]) -> HookDispatcher {
        let mut registry = PluginRegistry::new();
        for (i, suffix) in filters.iter().enumerate() {
            registry
                .register(
                    PluginExport::new(PluginInfo::new(&format!("p{i}"), "1.0.0"))
                        .implements::<dyn StreamFilter>(Arc::new(Append(*suffix))),
                )
                .expect("register");
        }
        HookDispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_filter_threads_value_in_order() {
        let result = dispatcher(&["a", "b", "c"])
            .filter::<dyn StreamFilter, _, _>("filter", String::new(), |hook, stream| {
                hook.filter(stream)
            })
            .expect("filter");
        assert_eq!(result, "abc");
    }

    #[test]
    fn test_filter_without_providers_returns_input() {
        let result = dispatcher(&[])
            .filter::<dyn StreamFilter, _, _>("filter", "x".to_string(), |hook, stream| {
                hook.filter(stream)
            })
            .expect("filter");
        assert_eq!(result, "x");
    }

    #[test]
    fn test_notify_stops_at_first_error() {
        let seen = Mutex::new(Vec::new());
        let err = dispatcher(&["a", "fail", "c"])
            .notify::<dyn StreamFilter, _>("filter", |hook| {
                let out = hook.filter(String::new())?;
                seen.lock().expect("lock").push(out);
                Ok(())
            })
            .unwrap_err();

        assert_eq!(err.message, "stream filter failed");
        assert_eq!(*seen.lock().expect("lock"), vec!["a".to_string()]);
    }

    #[test]
    fn test_first_match_reports_plugin() {
        let dispatcher = dispatcher(&["", "b", "c"]);
        let (plugin, value) = dispatcher
            .first_match::<dyn StreamFilter, _, _>("filter", |hook| {
                let out = hook.filter(String::new())?;
                Ok((!out.is_empty()).then_some(out))
            })
            .expect("dispatch")
            .expect("answer");
        assert_eq!(plugin.name, "p1");
        assert_eq!(value, "b");
    }
}
