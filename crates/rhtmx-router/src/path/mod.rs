/// Path utilities for validation and normalization of dispatched file paths
///
/// Files are routed by their `path` ("posts/a.md", "C:\\site\\index.html", ...).
/// Before matching, both the file path and string route patterns are brought into
/// one canonical, slash-separated form so that `posts/a.md`, `/posts/a.md` and
/// `\posts\a.md` all hit the same route.
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use rhtmx_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/posts/a.md"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("a.md")); // Missing leading /
/// assert!(!is_valid_path("/posts/")); // Trailing /
/// assert!(!is_valid_path("/posts//a.md")); // Double //
/// assert!(!is_valid_path("/posts\\a.md")); // Backslash
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already canonical (zero allocations)
/// and `Cow::Owned` otherwise.
///
/// - Relative paths: `a.md` → `/a.md`
/// - Trailing slashes: `/posts/` → `/posts`
/// - Double slashes: `/posts//a.md` → `/posts/a.md`
/// - Backslashes: `\posts\a.md` → `/posts/a.md`
///
/// # Examples
///
/// ```
/// use rhtmx_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/a.md"), Cow::Borrowed("/a.md")));
/// assert_eq!(normalize_path("a.md"), "/a.md");
/// assert_eq!(normalize_path("\\posts\\a.md"), "/posts/a.md");
/// assert_eq!(normalize_path("posts//drafts///b.md"), "/posts/drafts/b.md");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Last segment of a path, used as a file's display name
///
/// ```
/// use rhtmx_router::path::basename;
///
/// assert_eq!(basename("posts/a.md"), "a.md");
/// assert_eq!(basename("C:\\site\\index.html"), "index.html");
/// assert_eq!(basename("/"), "");
/// ```
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
