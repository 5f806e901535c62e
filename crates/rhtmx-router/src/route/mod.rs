/// Route module: a path pattern bound to per-verb handler stacks
pub mod pattern;

use std::collections::HashMap;
use std::fmt;

pub use pattern::RoutePattern;

use crate::Handler;

/// A path-bound collection of per-verb middleware stacks
///
/// Handlers for one verb run strictly in the order they were pushed.
pub struct Route<T, E> {
    pattern: RoutePattern,
    stacks: HashMap<String, Vec<Handler<T, E>>>,
}

impl<T, E> Route<T, E> {
    pub fn new(pattern: impl Into<RoutePattern>) -> Self {
        Self {
            pattern: pattern.into(),
            stacks: HashMap::new(),
        }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Appends handlers to the stack for `verb`
    pub fn push<I>(&mut self, verb: &str, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = Handler<T, E>>,
    {
        self.stacks
            .entry(verb.to_string())
            .or_default()
            .extend(handlers);
        self
    }

    /// Appends the same handlers to the stack of every verb in `verbs`
    pub fn all<I>(&mut self, verbs: &[String], handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = Handler<T, E>>,
    {
        let handlers: Vec<Handler<T, E>> = handlers.into_iter().collect();
        for verb in verbs {
            self.push(verb, handlers.iter().cloned());
        }
        self
    }

    /// Handlers registered for `verb`, in registration order
    pub fn stack(&self, verb: &str) -> &[Handler<T, E>] {
        self.stacks.get(verb).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_verb(&self, verb: &str) -> bool {
        !self.stack(verb).is_empty()
    }

    /// Verbs that have at least one handler
    pub fn verbs(&self) -> impl Iterator<Item = &str> {
        self.stacks
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(verb, _)| verb.as_str())
    }

    pub fn matches(
        &self,
        path: &str,
        case_insensitive: bool,
    ) -> Option<HashMap<String, String>> {
        self.pattern.matches(path, case_insensitive)
    }
}

impl<T, E> fmt::Debug for Route<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stacks: HashMap<&str, usize> = self
            .stacks
            .iter()
            .map(|(verb, stack)| (verb.as_str(), stack.len()))
            .collect();
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("stacks", &stacks)
            .finish()
    }
}
