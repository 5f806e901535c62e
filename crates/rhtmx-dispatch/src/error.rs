// File: src/error.rs
// Purpose: Dispatch error carrying one-shot enrichment metadata

use std::fmt;
use std::panic::Location;

use rhtmx_router::RouteError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Use of an identifier that is not defined (e.g. a template variable)
    #[error("{0} is not defined")]
    Reference(String),

    /// Source-mapped template failure produced by a [`Rethrow`](crate::Rethrow)
    #[error("{name} is not defined (line {line}, column {column})\n{excerpt}")]
    Template {
        name: String,
        line: usize,
        column: usize,
        excerpt: String,
    },

    #[error("{0}")]
    Message(String),

    /// No completion callback could be resolved for a finished dispatch
    #[error("no callback to complete {verb:?} for {path}")]
    MissingCallback { verb: String, path: String },

    #[error("unknown verb method {0:?}")]
    UnknownMethod(String),

    #[error("unknown collection {0:?}")]
    UnknownCollection(String),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Snapshot of the file being processed when an error was enriched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub path: String,
    pub basename: String,
}

/// Error flowing through the middleware chain
///
/// The first [`handle_error`](crate::App::handle_error) that sees an error
/// marks it handled and fills `source`, `reason` and `file`. Every later
/// encounter passes it through untouched.
pub struct Error {
    kind: ErrorKind,
    location: &'static Location<'static>,
    handled: bool,
    source: Option<String>,
    reason: Option<String>,
    file: Option<FileRef>,
}

impl Error {
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: Location::caller(),
            handled: false,
            source: None,
            reason: None,
            file: None,
        }
    }

    #[track_caller]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message(message.into()))
    }

    #[track_caller]
    pub fn reference(identifier: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference(identifier.into()))
    }

    #[track_caller]
    pub fn other(error: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorKind::Other(error.into()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, ErrorKind::Reference(_))
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Where the error was constructed
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Message followed by the construction frame
    ///
    /// The frame is always the final line; `enrich` reads `source` from there.
    pub fn stack(&self) -> String {
        format!(
            "{}\n    at {}:{}:{}",
            self.kind,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )
    }

    /// Frame recorded at enrichment time
    pub fn source_line(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    /// Marks the error handled and attaches diagnostics; a no-op once handled
    pub(crate) fn enrich(&mut self, reason: String, file: FileRef) {
        if self.handled {
            return;
        }
        self.handled = true;
        self.source = self
            .stack()
            .lines()
            .last()
            .map(|line| line.trim().to_string());
        self.reason = Some(reason);
        self.file = Some(file);
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("handled", &self.handled)
            .field("source", &self.source)
            .field("reason", &self.reason)
            .field("file", &self.file)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{} ({})", self.kind, reason),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Route(err) => Some(err),
            ErrorKind::Other(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<RouteError> for Error {
    #[track_caller]
    fn from(err: RouteError) -> Self {
        Self::new(ErrorKind::Route(err))
    }
}

impl From<anyhow::Error> for Error {
    #[track_caller]
    fn from(err: anyhow::Error) -> Self {
        Self::new(ErrorKind::Other(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_ref() -> FileRef {
        FileRef {
            path: "a.md".into(),
            basename: "a.md".into(),
        }
    }

    #[test]
    fn test_stack_second_line_is_construction_site() {
        let err = Error::msg("boom");
        let stack = err.stack();
        let mut lines = stack.lines();
        assert_eq!(lines.next(), Some("boom"));
        assert!(lines.next().unwrap().trim().starts_with("at "));
        assert!(stack.contains(file!()));
    }

    #[test]
    fn test_enrich_is_one_shot() {
        let mut err = Error::reference("title");
        err.enrich("first".into(), file_ref());
        let source = err.source_line().map(str::to_string);

        err.enrich(
            "second".into(),
            FileRef {
                path: "b.md".into(),
                basename: "b.md".into(),
            },
        );

        assert!(err.is_handled());
        assert_eq!(err.reason(), Some("first"));
        assert_eq!(err.file().unwrap().path, "a.md");
        assert_eq!(err.source_line().map(str::to_string), source);
    }

    #[test]
    fn test_display_includes_reason() {
        let mut err = Error::reference("title");
        assert_eq!(err.to_string(), "title is not defined");
        err.enrich("app#handle(\"onLoad\"): a.md".into(), file_ref());
        assert_eq!(
            err.to_string(),
            "title is not defined (app#handle(\"onLoad\"): a.md)"
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err.kind(), ErrorKind::Other(_)));
        assert!(!err.is_reference());
    }
}
