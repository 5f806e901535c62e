//! Integration tests for rhtmx-router
//!
//! Covers:
//! - Route lookup-or-create
//! - Verb registration and per-verb stacks
//! - Dispatch ordering across routes
//! - Param handlers
//! - Regex and case-insensitive matching

use pretty_assertions::assert_eq;
use rhtmx_router::*;
use rstest::rstest;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Doc {
    path: String,
    verb: Option<String>,
    params: HashMap<String, String>,
    log: Vec<String>,
}

impl Doc {
    fn new(path: &str, verb: &str) -> Self {
        Self {
            path: path.to_string(),
            verb: Some(verb.to_string()),
            ..Default::default()
        }
    }
}

impl Dispatchable for Doc {
    fn route_path(&self) -> &str {
        &self.path
    }

    fn route_method(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

fn mark(label: &'static str) -> Handler<Doc, String> {
    Arc::new(move |doc: &mut Doc| {
        doc.log.push(label.to_string());
        Ok(())
    })
}

fn fail(message: &'static str) -> Handler<Doc, String> {
    Arc::new(move |_doc: &mut Doc| Err(message.to_string()))
}

fn router() -> Router<Doc, String> {
    Router::new(["onLoad", "preRender", "postRender"])
}

#[test]
fn test_route_lookup_or_create_is_idempotent() {
    let mut router = router();
    router.route("/posts/:slug").push("onLoad", [mark("a")]);
    router.route("posts/:slug/").push("onLoad", [mark("b")]);

    assert_eq!(router.len(), 1);
    assert_eq!(router.routes()[0].stack("onLoad").len(), 2);
}

#[test]
fn test_distinct_patterns_create_distinct_routes() {
    let mut router = router();
    router.route("*");
    router.route("/posts/*rest");
    router.route(RoutePattern::regex(r"\.md$").unwrap());

    assert_eq!(router.len(), 3);
}

#[test]
fn test_method_registration_deduplicates() {
    let mut router = router();
    router.method(["custom", "onLoad", "custom"]);

    assert_eq!(
        router.methods(),
        &["onLoad", "preRender", "postRender", "custom"]
    );
    assert!(router.has_method("custom"));
    assert!(!router.has_method("other"));
}

#[test]
fn test_stack_runs_in_registration_order() {
    let mut router = router();
    router
        .route("*")
        .push("onLoad", [mark("first"), mark("second")])
        .push("onLoad", [mark("third")]);

    let mut doc = Doc::new("a.md", "onLoad");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log, vec!["first", "second", "third"]);
}

#[test]
fn test_routes_run_in_registration_order() {
    let mut router = router();
    router.route("/posts/*rest").push("onLoad", [mark("posts")]);
    router.route("*").push("onLoad", [mark("any")]);
    router.route("/pages/*rest").push("onLoad", [mark("pages")]);

    let mut doc = Doc::new("posts/a.md", "onLoad");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log, vec!["posts", "any"]);
}

#[test]
fn test_only_current_verb_runs() {
    let mut router = router();
    router
        .route("*")
        .push("onLoad", [mark("load")])
        .push("preRender", [mark("render")]);

    let mut doc = Doc::new("a.md", "preRender");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log, vec!["render"]);
}

#[test]
fn test_all_registers_every_verb() {
    let mut router = router();
    let methods = router.methods().to_vec();
    router.route("*").all(&methods, [mark("all")]);

    for verb in ["onLoad", "preRender", "postRender"] {
        let mut doc = Doc::new("a.md", verb);
        router.handle(&mut doc).unwrap();
        assert_eq!(doc.log, vec!["all"], "verb {verb}");
    }
}

#[rstest]
#[case::no_verb(None)]
#[case::unregistered_verb(Some("unknown"))]
fn test_nothing_to_dispatch_succeeds(#[case] verb: Option<&str>) {
    let mut router = router();
    router.route("*").push("unknown", [fail("should not run")]);

    let mut doc = Doc {
        path: "a.md".into(),
        verb: verb.map(str::to_string),
        ..Default::default()
    };

    assert_eq!(router.handle(&mut doc), Ok(()));
}

#[test]
fn test_no_matching_route_succeeds() {
    let mut router = router();
    router.route("/posts/*rest").push("onLoad", [fail("should not run")]);

    let mut doc = Doc::new("pages/a.md", "onLoad");
    assert_eq!(router.handle(&mut doc), Ok(()));
}

#[test]
fn test_error_short_circuits_dispatch() {
    let mut router = router();
    router
        .route("*")
        .push("onLoad", [mark("before"), fail("boom"), mark("after")]);
    router.route("/a.md").push("onLoad", [mark("next route")]);

    let mut doc = Doc::new("a.md", "onLoad");
    assert_eq!(router.handle(&mut doc), Err("boom".to_string()));
    assert_eq!(doc.log, vec!["before"]);
}

#[test]
fn test_params_are_set_before_stack() {
    let mut router = router();
    router.route("/posts/:slug").push(
        "onLoad",
        [Arc::new(|doc: &mut Doc| {
            let slug = doc.params.get("slug").cloned().unwrap_or_default();
            doc.log.push(slug);
            Ok(())
        }) as Handler<Doc, String>],
    );

    let mut doc = Doc::new("posts/hello.md", "onLoad");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log, vec!["hello.md"]);
}

#[test]
fn test_param_handlers_run_before_route_stack() {
    let mut router = router();
    router.param(
        "slug",
        Arc::new(|doc: &mut Doc, value: &str| {
            doc.log.push(format!("param:{value}"));
            Ok(())
        }),
    );
    router.route("/posts/:slug").push("onLoad", [mark("stack")]);
    router.route("*").push("onLoad", [mark("no params")]);

    let mut doc = Doc::new("posts/x.md", "onLoad");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log, vec!["param:x.md", "stack", "no params"]);
}

#[test]
fn test_param_handler_error_skips_stack() {
    let mut router = router();
    router.param(
        "slug",
        Arc::new(|_doc: &mut Doc, _value: &str| Err("bad slug".to_string())),
    );
    router.route("/posts/:slug").push("onLoad", [mark("stack")]);

    let mut doc = Doc::new("posts/x.md", "onLoad");
    assert_eq!(router.handle(&mut doc), Err("bad slug".to_string()));
    assert!(doc.log.is_empty());
}

#[test]
fn test_regex_route() {
    let mut router = router();
    router
        .route(regex::Regex::new(r"\.md$").unwrap())
        .push("onLoad", [mark("markdown")]);

    let mut md = Doc::new("notes/a.md", "onLoad");
    router.handle(&mut md).unwrap();
    assert_eq!(md.log, vec!["markdown"]);

    let mut hbs = Doc::new("notes/a.hbs", "onLoad");
    router.handle(&mut hbs).unwrap();
    assert!(hbs.log.is_empty());
}

#[rstest]
#[case(false, 0)]
#[case(true, 1)]
fn test_case_sensitivity(#[case] case_insensitive: bool, #[case] expected: usize) {
    let mut router = router().with_case_insensitive(case_insensitive);
    router.route("/About.md").push("onLoad", [mark("about")]);

    let mut doc = Doc::new("about.md", "onLoad");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log.len(), expected);
}

#[test]
fn test_windows_style_paths_match() {
    let mut router = router();
    router.route("/posts/:slug").push("onLoad", [mark("posts")]);

    let mut doc = Doc::new("posts\\a.md", "onLoad");
    router.handle(&mut doc).unwrap();

    assert_eq!(doc.log, vec!["posts"]);
}
