// File: src/registry.rs
// Purpose: The set of verb names that may be dispatched and mixed onto a host

/// Lifecycle verbs every host starts with
pub const DEFAULT_METHODS: &[&str] = &[
    "onLoad",
    "preCompile",
    "preLayout",
    "onLayout",
    "postLayout",
    "onMerge",
    "onStream",
    "postCompile",
    "preRender",
    "postRender",
    "preWrite",
    "postWrite",
];

/// Pseudo-verb that registers handlers for every verb of a route
pub const ALL: &str = "all";

/// Ordered, duplicate-free set of verb names owned by one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRegistry {
    names: Vec<String>,
}

impl MethodRegistry {
    /// Registry holding only [`DEFAULT_METHODS`]
    pub fn new() -> Self {
        Self::from_names(DEFAULT_METHODS.iter().copied())
    }

    /// Registry holding exactly the given names, in order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self { names: Vec::new() };
        registry.extend(names);
        registry
    }

    /// Adds names not yet present; returns the ones actually added
    ///
    /// `all` is reserved and never becomes a verb of its own.
    pub fn extend<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for name in names {
            let name = name.into();
            if name.is_empty() || name == ALL || self.contains(&name) {
                continue;
            }
            self.names.push(name.clone());
            added.push(name);
        }
        added
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = MethodRegistry::new();
        assert_eq!(registry.len(), DEFAULT_METHODS.len());
        assert!(registry.contains("onLoad"));
        assert!(registry.contains("postWrite"));
        assert!(!registry.contains(ALL));
    }

    #[test]
    fn test_extend_reports_new_names() {
        let mut registry = MethodRegistry::new();
        let added = registry.extend(["custom", "onLoad", "custom", "all", ""]);

        assert_eq!(added, vec!["custom".to_string()]);
        assert_eq!(registry.names().last().map(String::as_str), Some("custom"));
    }
}
