// File: src/app.rs
// Purpose: The host that owns verbs, routes, events and named collections

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use rhtmx_router::{ParamHandler, Route, RoutePattern};

use crate::binder::{FileRouter, LazyRouter};
use crate::config::DispatchConfig;
use crate::error::{ErrorKind, Result};
use crate::events::{Emitter, Event};
use crate::mixer::{self, Middleware, VerbMethod};
use crate::plugin::{DispatchPlugin, PLUGIN_NAME};
use crate::registry::MethodRegistry;
use crate::rethrow::{Rethrow, StrictRenderer};
use crate::{Error, File};

/// What kind of host an [`App`] is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Top-level application
    pub app: bool,
    /// Owns named collections that files can declare membership in
    pub templates: bool,
    /// Is itself a collection owned by another host
    pub collection: bool,
    /// A single view; never hosts routes
    pub view: bool,
}

impl Capabilities {
    pub fn app() -> Self {
        Self {
            app: true,
            templates: true,
            ..Self::default()
        }
    }

    pub fn collection() -> Self {
        Self {
            collection: true,
            ..Self::default()
        }
    }

    pub fn view() -> Self {
        Self {
            view: true,
            ..Self::default()
        }
    }

    /// Whether routes and verbs can be installed on this host
    pub fn is_host(&self) -> bool {
        (self.app || self.collection) && !self.view
    }
}

/// Host-level recovery hook for dispatches made without a callback
pub type RecoverHook = Arc<dyn Fn(&Error) -> bool + Send + Sync>;

/// Host of verb methods, routes, event listeners and collections
pub struct App {
    pub(crate) name: String,
    pub(crate) caps: Capabilities,
    pub(crate) registry: MethodRegistry,
    pub(crate) routes: LazyRouter,
    pub(crate) verbs: HashMap<String, VerbMethod>,
    pub(crate) events: Emitter,
    pub(crate) collections: HashMap<String, App>,
    pub(crate) rethrow: Arc<dyn Rethrow>,
    pub(crate) recover: Option<RecoverHook>,
    registered: HashSet<String>,
}

impl App {
    /// Bare host; verb methods are installed by [`DispatchPlugin`]
    pub fn new(name: impl Into<String>, caps: Capabilities) -> Self {
        Self {
            name: name.into(),
            caps,
            registry: MethodRegistry::new(),
            routes: LazyRouter::new(),
            verbs: HashMap::new(),
            events: Emitter::new(),
            collections: HashMap::new(),
            rethrow: Arc::new(StrictRenderer::new()),
            recover: None,
            registered: HashSet::new(),
        }
    }

    /// Top-level host with the dispatch plugin installed
    pub fn from_config(config: &DispatchConfig) -> Self {
        let caps = Capabilities {
            templates: config.templates,
            ..Capabilities::app()
        };
        let mut app = Self::new(config.name.clone(), caps);
        DispatchPlugin::new(config.clone()).install(&mut app);
        app
    }

    pub fn with_rethrow(mut self, rethrow: impl Rethrow + 'static) -> Self {
        self.rethrow = Arc::new(rethrow);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    // ------------------------------------------------------------------
    // Plugin registration
    // ------------------------------------------------------------------

    pub fn is_registered(&self, plugin: &str) -> bool {
        self.registered.contains(plugin)
    }

    pub(crate) fn mark_registered(&mut self, plugin: &str) {
        self.registered.insert(plugin.to_string());
    }

    // ------------------------------------------------------------------
    // Verb methods
    // ------------------------------------------------------------------

    /// Installs (or replaces) a named method in the method table
    pub fn define(&mut self, name: impl Into<String>, method: VerbMethod) -> &mut Self {
        self.verbs.insert(name.into(), method);
        self
    }

    /// Whether a callable method named `name` is installed
    pub fn has_verb_method(&self, name: &str) -> bool {
        self.verbs.contains_key(name)
    }

    /// Calls the installed method `name`: appends `handlers` to that verb's
    /// stack on the route for `pattern`, creating the route if needed
    pub fn verb<P, I>(&mut self, name: &str, pattern: P, handlers: I) -> Result<&mut Self>
    where
        P: Into<RoutePattern>,
        I: IntoIterator<Item = Middleware>,
    {
        let method = self
            .verbs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::UnknownMethod(name.to_string())))?;
        let router = self.routes.ensure(&self.registry, None);
        method(router, pattern.into(), handlers.into_iter().collect());
        Ok(self)
    }

    /// Verbs known to this host, in registration order
    pub fn methods(&self) -> &[String] {
        self.registry.names()
    }

    /// Registers a new verb and makes it callable right away
    pub fn handler(&mut self, name: impl Into<String>) -> &mut Self {
        self.handlers([name.into()])
    }

    /// Registers new verbs, extends the router and re-installs verb methods
    pub fn handlers<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = self.registry.extend(names);
        self.routes.ensure(&self.registry, Some(&added));
        mixer::mix(self);
        self
    }

    // ------------------------------------------------------------------
    // Router access
    // ------------------------------------------------------------------

    /// Route bound to `pattern`, created if absent
    pub fn route(&mut self, pattern: impl Into<RoutePattern>) -> &mut Route<File, Error> {
        self.routes.ensure(&self.registry, None).route(pattern)
    }

    /// Registers a handler for a named route parameter
    pub fn param<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut File, &str) -> Result<()> + Send + Sync + 'static,
    {
        let handler: ParamHandler<File, Error> = Arc::new(handler);
        self.routes.ensure(&self.registry, None).param(name, handler);
        self
    }

    /// The router, if it has been created yet
    pub fn router(&self) -> Option<&FileRouter> {
        self.routes.get()
    }

    /// The router, created on demand
    pub fn router_mut(&mut self) -> &mut FileRouter {
        self.routes.ensure(&self.registry, None)
    }

    pub fn set_case_insensitive(&mut self, case_insensitive: bool) -> &mut Self {
        self.routes.set_case_insensitive(case_insensitive);
        self
    }

    // ------------------------------------------------------------------
    // Events and error recovery
    // ------------------------------------------------------------------

    pub fn on<F>(&mut self, event: impl Into<String>, listener: F) -> &mut Self
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.events.on(event, listener);
        self
    }

    pub fn emit(&self, event: &str, payload: &Event<'_>) {
        self.events.emit(event, payload);
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.events.has_listeners(event)
    }

    /// Hook consulted when a dispatch made without a callback fails;
    /// returning `true` recovers the error instead of returning it
    pub fn on_error_recover<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Error) -> bool + Send + Sync + 'static,
    {
        self.recover = Some(Arc::new(hook));
        self
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Creates (or returns) the named collection
    ///
    /// A new collection inherits this host's verbs, rethrow collaborator,
    /// recovery hook and routing options. It gets the dispatch plugin when
    /// this host has it.
    pub fn create_collection(&mut self, name: &str) -> &mut App {
        match self.collections.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut collection = App::new(name, Capabilities::collection());
                collection.rethrow = Arc::clone(&self.rethrow);
                collection.recover = self.recover.clone();

                if self.registered.contains(PLUGIN_NAME) {
                    let config = DispatchConfig {
                        name: name.to_string(),
                        methods: self.registry.names().to_vec(),
                        case_insensitive: self.routes.is_case_insensitive(),
                        templates: false,
                    };
                    DispatchPlugin::new(config).install(&mut collection);
                }

                tracing::debug!(host = %self.name, collection = name, "created collection");
                entry.insert(collection)
            }
        }
    }

    pub fn collection(&self, name: &str) -> Option<&App> {
        self.collections.get(name)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut App> {
        self.collections.get_mut(name)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut verbs: Vec<&String> = self.verbs.keys().collect();
        verbs.sort();
        f.debug_struct("App")
            .field("name", &self.name)
            .field("caps", &self.caps)
            .field("registry", &self.registry)
            .field("routes", &self.routes)
            .field("verbs", &verbs)
            .field("events", &self.events)
            .field("collections", &self.collections.keys().collect::<Vec<_>>())
            .field("registered", &self.registered)
            .finish()
    }
}
