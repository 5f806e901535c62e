// File: src/file.rs
// Purpose: The mutable document/view record that flows through dispatch

use std::collections::HashMap;
use std::fmt;

use rhtmx_router::{basename, Dispatchable};

use crate::error::{FileRef, Result};
use crate::value::{Data, Value};
use crate::Error;

/// How a dispatch finished, as seen by a completion callback
#[derive(Debug)]
pub enum Outcome {
    /// Every middleware ran; the file is passed along with the outcome
    Done,
    /// A middleware (or the dispatch itself) failed
    Failed(Error),
    /// The error was already reported upstream and is not propagated again
    Suppressed,
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Completion callback
///
/// Receives the dispatched file and the outcome. Its own result is what the
/// dispatching call returns.
pub type Callback<'a> = Box<dyn FnOnce(&mut File, Outcome) -> Result<()> + 'a>;

/// Dispatch bookkeeping kept on every file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOptions {
    /// Verbs already dispatched, in order. `handle` always appends, so direct
    /// repeated calls leave duplicates; only `handle_once` reads it.
    pub handled: Vec<String>,
    /// Verb of the most recent dispatch
    pub method: Option<String>,
    /// Collection this file belongs to
    pub collection: Option<String>,
    /// Params captured by the route currently running
    pub params: HashMap<String, String>,
}

impl FileOptions {
    pub fn has_handled(&self, verb: &str) -> bool {
        self.handled.iter().any(|v| v == verb)
    }
}

/// A page, layout or partial being processed
pub struct File {
    pub path: String,
    pub basename: String,
    pub content: String,
    pub data: Data,
    pub options: FileOptions,
    /// Fallback completion used when a dispatch is given no callback
    pub next: Option<Callback<'static>>,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            basename: basename(&path).to_string(),
            path,
            content: String::new(),
            data: Data::new(),
            options: FileOptions::default(),
            next: None,
        }
    }

    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.options.collection = Some(collection.into());
        self
    }

    pub fn with_next<F>(mut self, next: F) -> Self
    where
        F: FnOnce(&mut File, Outcome) -> Result<()> + 'static,
    {
        self.next = Some(Box::new(next));
        self
    }

    pub(crate) fn to_ref(&self) -> FileRef {
        FileRef {
            path: self.path.clone(),
            basename: self.basename.clone(),
        }
    }
}

impl Dispatchable for File {
    fn route_path(&self) -> &str {
        &self.path
    }

    fn route_method(&self) -> Option<&str> {
        self.options.method.as_deref()
    }

    fn set_params(&mut self, params: HashMap<String, String>) {
        self.options.params = params;
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("path", &self.path)
            .field("basename", &self.basename)
            .field("content", &self.content)
            .field("data", &self.data)
            .field("options", &self.options)
            .field("next", &self.next.is_some())
            .finish()
    }
}
