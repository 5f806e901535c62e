// File: src/dispatcher.rs
// Purpose: Verb dispatch (handle / handle_once) and error normalization (handle_error)

use crate::error::{ErrorKind, Result};
use crate::events::{Emitter, Event};
use crate::file::{Callback, File, Outcome};
use crate::rethrow::Rethrow;
use crate::{App, Error};

/// Completion callback bound to one host and verb
///
/// Created by [`App::handle_error`]. Finishing it with an error enriches the
/// error on first sighting, broadcasts it to `error` listeners, optionally
/// source-maps reference errors, and forwards it to the resolved callback.
pub struct ErrorHandler<'a> {
    host: &'a str,
    verb: String,
    events: &'a Emitter,
    rethrow: &'a dyn Rethrow,
    next: Option<Callback<'a>>,
}

impl<'a> ErrorHandler<'a> {
    fn new(
        host: &'a str,
        verb: &str,
        events: &'a Emitter,
        rethrow: &'a dyn Rethrow,
        next: Option<Callback<'a>>,
    ) -> Self {
        Self {
            host,
            verb: verb.to_string(),
            events,
            rethrow,
            next,
        }
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Completes the dispatch of `file` with `result`
    ///
    /// The callback given at creation wins over `file.next`. When neither is
    /// present this is a programming error and is returned as
    /// [`ErrorKind::MissingCallback`] without touching `result`.
    pub fn finish(self, file: &mut File, result: Result<()>) -> Result<()> {
        let Self {
            host,
            verb,
            events,
            rethrow,
            next,
        } = self;

        let Some(next) = next.or_else(|| file.next.take()) else {
            tracing::error!(verb = %verb, path = %file.path, "no callback to complete dispatch");
            return Err(Error::new(ErrorKind::MissingCallback {
                verb,
                path: file.path.clone(),
            }));
        };

        let mut err = match result {
            Ok(()) => return next(file, Outcome::Done),
            Err(err) => err,
        };

        if err.is_handled() {
            return next(file, Outcome::Suppressed);
        }

        err.enrich(
            format!("{}#handle(\"{}\"): {}", host, verb, file.path),
            file.to_ref(),
        );

        if events.has_listeners("error") {
            events.emit("error", &Event::Error { error: &err, file });
        }

        if err.is_reference() {
            if let Err(mapped) = rethrow.rethrow(&file.content, &file.data) {
                tracing::debug!(verb = %verb, path = %file.path, "reference error source-mapped");
                return next(file, Outcome::Failed(mapped));
            }
        }

        next(file, Outcome::Failed(err))
    }

    /// Adapts this handler into a callback for a nested dispatch
    ///
    /// A nested success or suppression completes as success here; a nested
    /// failure goes through [`finish`](Self::finish) as an error.
    pub fn into_callback(self) -> Callback<'a> {
        Box::new(move |file: &mut File, outcome: Outcome| {
            let result = match outcome {
                Outcome::Failed(err) => Err(err),
                Outcome::Done | Outcome::Suppressed => Ok(()),
            };
            self.finish(file, result)
        })
    }
}

impl App {
    /// Dispatches `verb` for `file` through this host's router
    ///
    /// Records the verb on `file.options`, emits an event named after the
    /// verb, then runs the host's routes. When this host owns collections and
    /// the file names one, the collection's own `handle` runs after every host
    /// route has finished, and only if they all succeeded.
    ///
    /// Without a callback, a failure is offered to the recovery hook and
    /// returned as `Err` unless the hook recovers it.
    pub fn handle<'a>(
        &mut self,
        verb: &str,
        file: &mut File,
        callback: Option<Callback<'a>>,
    ) -> Result<()> {
        let callback: Callback<'a> = match callback {
            Some(callback) => callback,
            None => self.fallback(),
        };

        file.options.method = Some(verb.to_string());
        file.options.handled.push(verb.to_string());

        tracing::debug!(host = %self.name, verb, path = %file.path, "dispatching");
        self.events.emit(verb, &Event::File { verb, file });

        let App {
            name,
            caps,
            registry,
            routes,
            events,
            collections,
            rethrow,
            ..
        } = self;
        let done = ErrorHandler::new(name, verb, events, &**rethrow, Some(callback));
        let router = &*routes.ensure(registry, None);

        let target = match &file.options.collection {
            Some(collection) if caps.templates && !caps.collection => collection.clone(),
            _ => {
                let result = router.handle(file);
                return done.finish(file, result);
            }
        };

        if let Err(err) = router.handle(file) {
            return done.finish(file, Err(err));
        }

        match collections.get_mut(&target) {
            Some(collection) => collection.handle(verb, file, Some(done.into_callback())),
            None => done.finish(file, Err(Error::new(ErrorKind::UnknownCollection(target)))),
        }
    }

    /// Dispatches `verb` unless `file` has already been through it
    ///
    /// Falls back to `file.next` when no callback is given. A skipped
    /// dispatch completes with [`Outcome::Done`] without running middleware.
    pub fn handle_once<'a>(
        &mut self,
        verb: &str,
        file: &mut File,
        callback: Option<Callback<'a>>,
    ) -> Result<()> {
        let callback = callback.or_else(|| file.next.take());

        if file.options.has_handled(verb) {
            tracing::trace!(verb, path = %file.path, "verb already handled, skipping");
            return match callback {
                Some(callback) => callback(file, Outcome::Done),
                None => Ok(()),
            };
        }

        self.handle(verb, file, callback)
    }

    /// Completion callback for `verb` that normalizes errors before calling `next`
    pub fn handle_error<'a>(&'a self, verb: &str, next: Option<Callback<'a>>) -> ErrorHandler<'a> {
        ErrorHandler::new(&self.name, verb, &self.events, &*self.rethrow, next)
    }

    fn fallback(&self) -> Callback<'static> {
        let recover = self.recover.clone();
        Box::new(move |_file: &mut File, outcome: Outcome| match outcome {
            Outcome::Failed(err) if recover.as_ref().is_some_and(|hook| hook(&err)) => Ok(()),
            Outcome::Failed(err) => Err(err),
            Outcome::Done | Outcome::Suppressed => Ok(()),
        })
    }
}
