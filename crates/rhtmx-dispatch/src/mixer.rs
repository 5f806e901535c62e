// File: src/mixer.rs
// Purpose: Generates one host method per verb and installs it in the host's method table

use std::sync::Arc;

use rhtmx_router::{Handler, RoutePattern};

use crate::binder::FileRouter;
use crate::error::Result;
use crate::registry::ALL;
use crate::{App, Error, File};

/// Middleware run for a verb on a matching route
pub type Middleware = Handler<File, Error>;

/// Generated host method: resolves the route for a pattern and appends handlers
pub type VerbMethod = Arc<dyn Fn(&mut FileRouter, RoutePattern, Vec<Middleware>) + Send + Sync>;

/// Wraps a closure as [`Middleware`]
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(&mut File) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Method appending handlers to one verb's stack
pub fn verb_method(verb: &str) -> VerbMethod {
    let verb = verb.to_string();
    Arc::new(
        move |router: &mut FileRouter, pattern: RoutePattern, handlers: Vec<Middleware>| {
            router.route(pattern).push(&verb, handlers);
        },
    )
}

/// Method appending handlers to every verb the router knows
pub fn all_method() -> VerbMethod {
    Arc::new(
        |router: &mut FileRouter, pattern: RoutePattern, handlers: Vec<Middleware>| {
            let methods = router.methods().to_vec();
            router.route(pattern).all(&methods, handlers);
        },
    )
}

/// Installs a method for every verb in the host's registry, plus `all`
///
/// Re-running it after the registry grows makes the new verbs callable.
pub fn mix(app: &mut App) {
    let names = app.methods().to_vec();
    for name in &names {
        app.define(name, verb_method(name));
    }
    app.define(ALL, all_method());
    tracing::debug!(host = app.name(), verbs = names.len(), "installed verb methods");
}

macro_rules! verb_methods {
    ($($fn_name:ident => $verb:literal),* $(,)?) => {
        impl App {
            $(
                #[doc = concat!("Registers `", $verb, "` middleware on the route for `pattern`.")]
                pub fn $fn_name<P, I>(&mut self, pattern: P, handlers: I) -> Result<&mut Self>
                where
                    P: Into<RoutePattern>,
                    I: IntoIterator<Item = Middleware>,
                {
                    self.verb($verb, pattern, handlers)
                }
            )*
        }
    };
}

verb_methods! {
    all => "all",
    on_load => "onLoad",
    pre_compile => "preCompile",
    pre_layout => "preLayout",
    on_layout => "onLayout",
    post_layout => "postLayout",
    on_merge => "onMerge",
    on_stream => "onStream",
    post_compile => "postCompile",
    pre_render => "preRender",
    post_render => "postRender",
    pre_write => "preWrite",
    post_write => "postWrite",
}
