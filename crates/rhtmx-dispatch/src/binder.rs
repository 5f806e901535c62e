// File: src/binder.rs
// Purpose: Creates a host's router on first use

use rhtmx_router::Router;

use crate::registry::MethodRegistry;
use crate::{Error, File};

/// Router over dispatched files
pub type FileRouter = Router<File, Error>;

/// Holds a host's router, built lazily from its method registry
#[derive(Debug, Default)]
pub struct LazyRouter {
    router: Option<FileRouter>,
    case_insensitive: bool,
}

impl LazyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the router, creating it from `registry` if needed
    ///
    /// `methods`, when given, are registered on the router as extra verbs.
    /// Safe to call before every dispatch or registration.
    pub fn ensure(&mut self, registry: &MethodRegistry, methods: Option<&[String]>) -> &mut FileRouter {
        let case_insensitive = self.case_insensitive;
        let router = self.router.get_or_insert_with(|| {
            tracing::debug!(methods = registry.len(), "creating router");
            Router::new(registry.names().iter().cloned()).with_case_insensitive(case_insensitive)
        });
        if let Some(methods) = methods {
            router.method(methods.iter().cloned());
        }
        router
    }

    pub fn get(&self) -> Option<&FileRouter> {
        self.router.as_ref()
    }

    pub fn is_created(&self) -> bool {
        self.router.is_some()
    }

    /// Applies to the current router and to one created later
    pub fn set_case_insensitive(&mut self, case_insensitive: bool) {
        self.case_insensitive = case_insensitive;
        if let Some(router) = self.router.as_mut() {
            router.set_case_insensitive(case_insensitive);
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}
