// File: src/events.rs
// Purpose: Fire-and-forget event broadcast for dispatch observers

use std::collections::HashMap;
use std::fmt;

use crate::{Error, File};

/// Payload delivered to listeners
#[derive(Debug)]
pub enum Event<'a> {
    /// A verb is about to be dispatched for `file`
    File { verb: &'a str, file: &'a File },
    /// A middleware error was seen for the first time
    Error { error: &'a Error, file: &'a File },
}

pub type Listener = Box<dyn Fn(&Event<'_>) + Send + Sync>;

/// Named-event listener registry
///
/// Listeners run synchronously in registration order and cannot affect the
/// dispatch that emitted the event.
#[derive(Default)]
pub struct Emitter {
    listeners: HashMap<String, Vec<Listener>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, event: impl Into<String>, listener: F) -> &mut Self
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(listener));
        self
    }

    pub fn emit(&self, event: &str, payload: &Event<'_>) {
        let Some(listeners) = self.listeners.get(event) else {
            return;
        };
        tracing::trace!(event, listeners = listeners.len(), "emitting event");
        for listener in listeners {
            listener(payload);
        }
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    pub fn off(&mut self, event: &str) {
        self.listeners.remove(event);
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("Emitter").field("listeners", &counts).finish()
    }
}
