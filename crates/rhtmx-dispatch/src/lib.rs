// RHTMX Dispatch - verb-based middleware for pages, layouts and partials
// Files move through lifecycle verbs (onLoad, preRender, ...); each verb runs
// the middleware registered on matching routes, then the file's collection.

pub mod app;
pub mod binder;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod file;
pub mod mixer;
pub mod plugin;
pub mod registry;
pub mod rethrow;
pub mod value;

// Re-export the host and dispatch surface
pub use app::{App, Capabilities, RecoverHook};
pub use binder::{FileRouter, LazyRouter};
pub use config::DispatchConfig;
pub use dispatcher::ErrorHandler;
pub use error::{Error, ErrorKind, FileRef, Result};
pub use events::{Emitter, Event, Listener};
pub use file::{Callback, File, FileOptions, Outcome};
pub use mixer::{middleware, Middleware, VerbMethod};
pub use plugin::{is_valid, DispatchPlugin, PLUGIN_NAME};
pub use registry::{MethodRegistry, ALL, DEFAULT_METHODS};
pub use rethrow::{Rethrow, StrictRenderer};
pub use value::{data_from_json, lookup, Data, Value};

// Re-export routing types used in public signatures
pub use rhtmx_router::{Route, RoutePattern};
