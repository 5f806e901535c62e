//! # RHTMX Router
//!
//! Verb-based route engine used to run middleware over in-memory files
//! (pages, layouts, partials) as they move through their lifecycle.
//!
//! - A [`Router`] owns an ordered list of [`Route`]s and the set of verbs
//!   (`onLoad`, `preRender`, ...) it is allowed to dispatch.
//! - A [`Route`] is bound to one [`RoutePattern`] and keeps one ordered
//!   handler stack per verb.
//! - [`Router::handle`] reads the item's current verb and path, then runs the
//!   stacks of every matching route in registration order.
//!
//! ## Pattern syntax
//!
//! - Static segments: `/about.md`
//! - Parameters: `/posts/:slug`, optional `/docs/:version?/index.md`
//! - Catch-all: `/docs/*rest`, optional `/docs/*rest?`, anonymous `*`
//! - Regular expressions via [`RoutePattern::regex`] or a [`regex::Regex`]
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use rhtmx_router::{Dispatchable, Router};
//!
//! struct Page {
//!     path: String,
//!     verb: Option<String>,
//!     title: Option<String>,
//! }
//!
//! impl Dispatchable for Page {
//!     fn route_path(&self) -> &str { &self.path }
//!     fn route_method(&self) -> Option<&str> { self.verb.as_deref() }
//!     fn set_params(&mut self, _params: HashMap<String, String>) {}
//! }
//!
//! let mut router: Router<Page, String> = Router::new(["onLoad"]);
//! router.route("*").push("onLoad", [Arc::new(|page: &mut Page| {
//!     page.title = Some("Hello".to_string());
//!     Ok::<(), String>(())
//! }) as rhtmx_router::Handler<Page, String>]);
//!
//! let mut page = Page { path: "a.md".into(), verb: Some("onLoad".into()), title: None };
//! router.handle(&mut page).unwrap();
//! assert_eq!(page.title.as_deref(), Some("Hello"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

pub mod path;
pub mod route;

pub use path::{basename, is_valid_path, normalize_path};
pub use route::{Route, RoutePattern};

// ============================================================================
// Core Types
// ============================================================================

/// Middleware run for one verb on a matching route
pub type Handler<T, E> = Arc<dyn Fn(&mut T) -> Result<(), E> + Send + Sync>;

/// Callback run with the captured value of a named route parameter
pub type ParamHandler<T, E> = Arc<dyn Fn(&mut T, &str) -> Result<(), E> + Send + Sync>;

/// An item the router can dispatch
pub trait Dispatchable {
    /// Path used for route matching
    fn route_path(&self) -> &str;

    /// Verb whose stacks should run, if any
    fn route_method(&self) -> Option<&str>;

    /// Receives the params captured by the route about to run
    fn set_params(&mut self, params: HashMap<String, String>);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

// ============================================================================
// Router
// ============================================================================

/// Ordered routes plus the verbs they may be dispatched for
pub struct Router<T, E> {
    routes: Vec<Route<T, E>>,
    methods: Vec<String>,
    params: HashMap<String, Vec<ParamHandler<T, E>>>,
    case_insensitive: bool,
}

impl<T, E> Router<T, E> {
    /// Creates a router that dispatches the given verbs
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut router = Self {
            routes: Vec::new(),
            methods: Vec::new(),
            params: HashMap::new(),
            case_insensitive: false,
        };
        router.method(methods);
        router
    }

    /// Builder-style case sensitivity toggle
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn set_case_insensitive(&mut self, case_insensitive: bool) {
        self.case_insensitive = case_insensitive;
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Registers additional verbs; duplicates are ignored
    pub fn method<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.methods.contains(&name) {
                self.methods.push(name);
            }
        }
        self
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    /// Returns the route bound to `pattern`, creating it if absent
    ///
    /// Equal patterns (after normalization) always resolve to the same route,
    /// so handlers registered in several calls accumulate on one stack.
    pub fn route(&mut self, pattern: impl Into<RoutePattern>) -> &mut Route<T, E> {
        let pattern = pattern.into();
        let index = match self.routes.iter().position(|r| r.pattern().same_as(&pattern)) {
            Some(index) => index,
            None => {
                tracing::trace!(pattern = %pattern, "creating route");
                self.routes.push(Route::new(pattern));
                self.routes.len() - 1
            }
        };
        &mut self.routes[index]
    }

    /// Registers a handler for a named route parameter
    pub fn param(&mut self, name: &str, handler: ParamHandler<T, E>) -> &mut Self {
        self.params.entry(name.to_string()).or_default().push(handler);
        self
    }

    pub fn routes(&self) -> &[Route<T, E>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<T: Dispatchable, E> Router<T, E> {
    /// Runs every matching route's stack for the item's current verb
    ///
    /// No verb, an unregistered verb, or no matching route is not an error.
    /// The first handler error stops the dispatch and is returned as is.
    pub fn handle(&self, item: &mut T) -> Result<(), E> {
        let Some(verb) = item.route_method().map(str::to_string) else {
            return Ok(());
        };
        if !self.has_method(&verb) {
            tracing::trace!(verb = %verb, "verb not registered on router");
            return Ok(());
        }

        for route in &self.routes {
            if !route.has_verb(&verb) {
                continue;
            }
            let Some(params) = route.matches(item.route_path(), self.case_insensitive) else {
                continue;
            };

            let values: Vec<(String, String)> = params
                .iter()
                .filter(|(name, _)| self.params.contains_key(name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            item.set_params(params);

            for (name, value) in &values {
                for handler in &self.params[name] {
                    handler(&mut *item, value)?;
                }
            }

            for handler in route.stack(&verb) {
                handler(&mut *item)?;
            }
        }

        Ok(())
    }
}

impl<T, E> std::fmt::Debug for Router<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("methods", &self.methods)
            .field("routes", &self.routes)
            .field("params", &self.params.keys().collect::<Vec<_>>())
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}
