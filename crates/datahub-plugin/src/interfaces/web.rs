//! Web-layer interfaces: middleware, routes, template stream filters, and
//! authentication.
//!
//! The web framework itself lives outside this crate. These interfaces only
//! see it through the small shapes defined here.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use datahub_core::result::AppResult;
use datahub_core::types::{Context, DataDict, Settings};

/// The web application as seen by middleware plugins.
pub trait Application: Send + Sync {
    /// Handles one request.
    fn call(&self, request: &DataDict) -> AppResult<DataDict>;
}

/// Shared handle to a (possibly wrapped) application.
pub type App = Arc<dyn Application>;

/// Wraps the web application in middleware.
pub trait Middleware: Send + Sync {
    /// Returns the application wrapped in this plugin's middleware.
    fn make_middleware(&self, app: App, _settings: &Settings) -> AppResult<App> {
        Ok(app)
    }

    /// Returns the application wrapped in this plugin's error-log middleware.
    fn make_error_log_middleware(&self, app: App, _settings: &Settings) -> AppResult<App> {
        Ok(app)
    }
}

/// Rewrites a rendered template stream before it is sent.
pub trait StreamFilter: Send + Sync {
    /// Returns the filtered stream.
    fn filter(&self, stream: String) -> AppResult<String> {
        Ok(stream)
    }
}

/// One named URL route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route name used for URL generation.
    pub name: String,
    /// URL path template, e.g. `/dataset/{id}`.
    pub path: String,
    /// Controller handling the route.
    pub controller: String,
    /// Controller action.
    pub action: String,
}

/// Ordered URL route table. Earlier routes win on match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMap {
    /// Routes in match order.
    pub routes: Vec<RouteEntry>,
}

impl RouteMap {
    /// Creates an empty route map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    pub fn connect(&mut self, name: &str, path: &str, controller: &str, action: &str) {
        self.routes.push(RouteEntry {
            name: name.to_string(),
            path: path.to_string(),
            controller: controller.to_string(),
            action: action.to_string(),
        });
    }

    /// Finds the first route with the given name.
    pub fn find(&self, name: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether the map has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Adds URL routes to the route map.
pub trait Routes: Send + Sync {
    /// Called before the core routes are added. Routes added here take
    /// precedence over core routes.
    fn before_map(&self, map: RouteMap) -> AppResult<RouteMap> {
        Ok(map)
    }

    /// Called after the core routes are added.
    fn after_map(&self, map: RouteMap) -> AppResult<RouteMap> {
        Ok(map)
    }
}

/// An abort about to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Detail shown to the client.
    pub detail: Option<String>,
    /// Extra response headers.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Comment for logs.
    pub comment: Option<String>,
}

impl AbortResponse {
    /// Creates an abort with the given status code.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            detail: None,
            headers: Vec::new(),
            comment: None,
        }
    }

    /// Sets the detail message.
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

/// Integrates a custom authentication method.
pub trait Authenticator: Send + Sync {
    /// Identifies the user making the request.
    ///
    /// Returns the user name when this authenticator recognizes the
    /// request. Authenticators are asked in load order and the first
    /// identity wins.
    fn identify(&self, _ctx: &Context) -> AppResult<Option<String>> {
        Ok(None)
    }

    /// Called at login.
    fn login(&self, _ctx: &Context) -> AppResult<()> {
        Ok(())
    }

    /// Called at logout.
    fn logout(&self, _ctx: &Context) -> AppResult<()> {
        Ok(())
    }

    /// Called on abort. Lets authorization aborts be rewritten, e.g. to
    /// redirect anonymous users to a login page.
    fn abort(&self, response: AbortResponse) -> AppResult<AbortResponse> {
        Ok(response)
    }
}

impl fmt::Debug for dyn Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Application")
    }
}
