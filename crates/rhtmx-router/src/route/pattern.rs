/// Route patterns and the path matcher
///
/// A route is bound to exactly one pattern. String patterns are split into
/// segments and matched segment by segment; regex patterns are matched against
/// the normalized path and expose their named groups as params.
use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::path::normalize_path;
use crate::RouteError;

/// Path pattern a [`Route`](crate::Route) is bound to
///
/// # Segment syntax
///
/// - `about`: static text
/// - `:slug`: required parameter (one segment)
/// - `:slug?`: optional parameter
/// - `*rest`: catch-all (one or more segments)
/// - `*rest?`: optional catch-all (zero or more segments)
/// - `*`: anonymous catch-all, matches but captures nothing
///
/// # Examples
///
/// ```
/// use rhtmx_router::RoutePattern;
///
/// let pattern = RoutePattern::from("posts/:slug");
/// let params = pattern.matches("/posts/a.md", false).unwrap();
/// assert_eq!(params.get("slug"), Some(&"a.md".to_string()));
///
/// let pattern = RoutePattern::regex(r"\.md$").unwrap();
/// assert!(pattern.matches("notes/b.md", false).is_some());
/// assert!(pattern.matches("notes/b.hbs", false).is_none());
/// ```
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// Normalized segment pattern like `/posts/:slug`
    Segments(String),
    /// Regular expression tested against the normalized path
    Regex(Regex),
}

impl RoutePattern {
    /// Compiles a regex pattern
    pub fn regex(source: &str) -> Result<Self, RouteError> {
        Regex::new(source)
            .map(RoutePattern::Regex)
            .map_err(|e| RouteError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Source text of the pattern, used as the route identity
    pub fn as_str(&self) -> &str {
        match self {
            RoutePattern::Segments(pattern) => pattern,
            RoutePattern::Regex(regex) => regex.as_str(),
        }
    }

    /// Whether two patterns designate the same route
    pub fn same_as(&self, other: &RoutePattern) -> bool {
        match (self, other) {
            (RoutePattern::Segments(a), RoutePattern::Segments(b)) => a == b,
            (RoutePattern::Regex(a), RoutePattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }

    /// Names of the parameters this pattern can capture
    pub fn param_names(&self) -> Vec<String> {
        match self {
            RoutePattern::Segments(pattern) => pattern
                .split('/')
                .filter_map(|seg| match classify_segment(seg) {
                    Segment::Required(name)
                    | Segment::Optional(name)
                    | Segment::CatchAll(name)
                    | Segment::OptionalCatchAll(name)
                        if !name.is_empty() =>
                    {
                        Some(name.to_string())
                    }
                    _ => None,
                })
                .collect(),
            RoutePattern::Regex(regex) => regex
                .capture_names()
                .flatten()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Matches a path against this pattern, returning the captured params
    ///
    /// The path is normalized first, so relative and backslashed file paths
    /// match the same patterns as canonical ones.
    pub fn matches(&self, path: &str, case_insensitive: bool) -> Option<HashMap<String, String>> {
        let path = normalize_path(path);
        match self {
            RoutePattern::Segments(pattern) => {
                let pattern_segments: Vec<&str> =
                    pattern.split('/').filter(|s| !s.is_empty()).collect();
                let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                match_segments(
                    &pattern_segments,
                    &path_segments,
                    HashMap::new(),
                    case_insensitive,
                )
            }
            RoutePattern::Regex(regex) => {
                let caps = regex.captures(&path)?;
                Some(
                    regex
                        .capture_names()
                        .flatten()
                        .filter_map(|name| {
                            caps.name(name)
                                .map(|m| (name.to_string(), m.as_str().to_string()))
                        })
                        .collect(),
                )
            }
        }
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        RoutePattern::Segments(normalize_path(pattern).into_owned())
    }
}

impl From<String> for RoutePattern {
    fn from(pattern: String) -> Self {
        RoutePattern::from(pattern.as_str())
    }
}

impl From<&String> for RoutePattern {
    fn from(pattern: &String) -> Self {
        RoutePattern::from(pattern.as_str())
    }
}

impl From<Regex> for RoutePattern {
    fn from(regex: Regex) -> Self {
        RoutePattern::Regex(regex)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePattern::Segments(pattern) => f.write_str(pattern),
            RoutePattern::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// One parsed segment of a string pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Static(&'a str),
    Required(&'a str),
    Optional(&'a str),
    CatchAll(&'a str),
    OptionalCatchAll(&'a str),
}

fn classify_segment(segment: &str) -> Segment<'_> {
    if let Some(name) = segment.strip_prefix('*') {
        return match name.strip_suffix('?') {
            Some(name) => Segment::OptionalCatchAll(name),
            None => Segment::CatchAll(name),
        };
    }

    match segment.strip_prefix(':') {
        Some(name) => match name.strip_suffix('?') {
            Some(name) => Segment::Optional(name),
            None => Segment::Required(name),
        },
        None => Segment::Static(segment),
    }
}

fn segment_eq(pattern: &str, path: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        pattern.eq_ignore_ascii_case(path)
    } else {
        pattern == path
    }
}

fn capture(params: &mut HashMap<String, String>, name: &str, value: String) {
    if !name.is_empty() {
        params.insert(name.to_string(), value);
    }
}

/// Tail-recursive segment matcher
///
/// Walks pattern and path segments together. An optional parameter only
/// consumes a path segment when the next pattern segment would not match it.
fn match_segments(
    pattern: &[&str],
    path: &[&str],
    mut params: HashMap<String, String>,
    case_insensitive: bool,
) -> Option<HashMap<String, String>> {
    let Some((&head, rest)) = pattern.split_first() else {
        return path.is_empty().then_some(params);
    };

    match classify_segment(head) {
        Segment::CatchAll(name) | Segment::OptionalCatchAll(name) => {
            let optional = matches!(classify_segment(head), Segment::OptionalCatchAll(_));
            if path.is_empty() && !optional {
                return None;
            }
            capture(&mut params, name, path.join("/"));
            Some(params)
        }
        Segment::Optional(name) => {
            let should_consume = match (path.first(), rest.first()) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(seg), Some(next)) => match classify_segment(next) {
                    Segment::Static(text) => !segment_eq(text, seg, case_insensitive),
                    _ => true,
                },
            };

            if should_consume {
                capture(&mut params, name, path[0].to_string());
                match_segments(rest, &path[1..], params, case_insensitive)
            } else {
                match_segments(rest, path, params, case_insensitive)
            }
        }
        Segment::Required(name) => {
            let (&seg, path_rest) = path.split_first()?;
            capture(&mut params, name, seg.to_string());
            match_segments(rest, path_rest, params, case_insensitive)
        }
        Segment::Static(text) => {
            let (&seg, path_rest) = path.split_first()?;
            if !segment_eq(text, seg, case_insensitive) {
                return None;
            }
            match_segments(rest, path_rest, params, case_insensitive)
        }
    }
}
