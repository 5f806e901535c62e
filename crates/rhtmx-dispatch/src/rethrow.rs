// File: src/rethrow.rs
// Purpose: Re-renders a file's template to turn reference errors into source-mapped ones

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ErrorKind, Result};
use crate::value::{lookup, Data};
use crate::Error;

/// Re-renders `content` against `data`
///
/// Returning `Err` replaces the original reference error with a more precise
/// one; returning `Ok` keeps the original.
pub trait Rethrow: Send + Sync {
    fn rethrow(&self, content: &str, data: &Data) -> Result<()>;
}

static VAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_\.]*)\}").expect("interpolation pattern is valid")
});

/// Strict `{name}` / `{a.b}` interpolation check
///
/// Fails on the first variable that does not resolve, reporting its line,
/// column and the offending source line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictRenderer;

impl StrictRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Interpolates every variable, failing on the first unresolved one
    pub fn render(&self, content: &str, data: &Data) -> Result<String> {
        self.rethrow(content, data)?;
        Ok(VAR_REGEX
            .replace_all(content, |caps: &regex::Captures| {
                lookup(data, &caps[1])
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            })
            .into_owned())
    }
}

impl Rethrow for StrictRenderer {
    fn rethrow(&self, content: &str, data: &Data) -> Result<()> {
        let missing = VAR_REGEX
            .captures_iter(content)
            .find(|caps| lookup(data, &caps[1]).is_none());

        match missing {
            None => Ok(()),
            Some(caps) => {
                let start = caps.get(0).map_or(0, |m| m.start());
                Err(template_error(content, &caps[1], start))
            }
        }
    }
}

/// `offset` is the byte offset of the opening brace
#[track_caller]
fn template_error(content: &str, name: &str, offset: usize) -> Error {
    let before = &content[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    // Column of the opening brace, 1-based
    let column = before[line_start..].chars().count() + 1;
    let source_line = content[line_start..].lines().next().unwrap_or("");

    let gutter = format!("{line} | ");
    let excerpt = format!(
        "{gutter}{source_line}\n{}^",
        " ".repeat(gutter.len() + column.saturating_sub(1))
    );

    Error::new(ErrorKind::Template {
        name: name.to_string(),
        line,
        column,
        excerpt,
    })
}
