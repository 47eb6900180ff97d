use datahub_core::result::AppResult;
use datahub_core::types::{Context, Settings};

use crate::interfaces::{
    AbortResponse, App, Authenticator, Middleware, RouteMap, Routes, StreamFilter,
};

use super::HookDispatcher;

impl HookDispatcher {
    /// Wraps `app` in every plugin's middleware, in load order.
    pub fn make_middleware(&self, app: App, settings: &Settings) -> AppResult<App> {
        self.filter::<dyn Middleware, _, _>("make_middleware", app, |hook, app| {
            hook.make_middleware(app, settings)
        })
    }

    /// Wraps `app` in every plugin's error-log middleware.
    pub fn make_error_log_middleware(&self, app: App, settings: &Settings) -> AppResult<App> {
        self.filter::<dyn Middleware, _, _>("make_error_log_middleware", app, |hook, app| {
            hook.make_error_log_middleware(app, settings)
        })
    }

    /// Runs a rendered template stream through every stream filter.
    pub fn filter_stream(&self, stream: String) -> AppResult<String> {
        self.filter::<dyn StreamFilter, _, _>("filter", stream, |hook, stream| hook.filter(stream))
    }

    /// Builds the route map: plugin routes before the core ones, then the
    /// core routes added by `core`, then plugin routes after them.
    pub fn build_route_map<F>(&self, core: F) -> AppResult<RouteMap>
    where
        F: FnOnce(&mut RouteMap),
    {
        let mut map = self.filter::<dyn Routes, _, _>("before_map", RouteMap::new(), |hook, map| {
            hook.before_map(map)
        })?;
        core(&mut map);
        self.filter::<dyn Routes, _, _>("after_map", map, |hook, map| hook.after_map(map))
    }

    /// The user the first authenticator recognizes, if any.
    pub fn identify(&self, ctx: &Context) -> AppResult<Option<String>> {
        Ok(self
            .first_match::<dyn Authenticator, _, _>("identify", |hook| hook.identify(ctx))?
            .map(|(_, user)| user))
    }

    /// Notifies authenticators of a login request.
    pub fn login(&self, ctx: &Context) -> AppResult<()> {
        self.notify::<dyn Authenticator, _>("login", |hook| hook.login(ctx))
    }

    /// Notifies authenticators of a logout request.
    pub fn logout(&self, ctx: &Context) -> AppResult<()> {
        self.notify::<dyn Authenticator, _>("logout", |hook| hook.logout(ctx))
    }

    /// The abort response after every authenticator has seen it.
    pub fn abort(&self, response: AbortResponse) -> AppResult<AbortResponse> {
        self.filter::<dyn Authenticator, _, _>("abort", response, |hook, response| {
            hook.abort(response)
        })
    }
}
