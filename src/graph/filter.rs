//! Substring filter over dependency lists.

use crate::parser::Dependency;

/// Case-insensitive substring filter on `group:artifact:version`.
///
/// An absent or empty needle keeps everything.
///
/// # Example
///
/// ```
/// use depscope::graph::DependencyFilter;
/// use depscope::parser::Dependency;
///
/// let deps = vec![
///     Dependency::new("b", "lib", "1.0"),
///     Dependency::new("c", "test", "1.0"),
/// ];
///
/// let filtered = DependencyFilter::new(Some("TEST")).apply(deps);
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered[0].artifact, "test");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyFilter {
    needle: Option<String>,
}

impl DependencyFilter {
    /// Creates a filter; `None` and `Some("")` both mean "keep everything".
    pub fn new(substring: Option<&str>) -> Self {
        let needle = substring
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    /// Returns true if the filter keeps every record.
    pub fn is_identity(&self) -> bool {
        self.needle.is_none()
    }

    /// Checks a single record.
    pub fn matches(&self, dep: &Dependency) -> bool {
        match &self.needle {
            Some(needle) => dep.composite().to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }

    /// Keeps the matching records, preserving their order.
    pub fn apply(&self, deps: Vec<Dependency>) -> Vec<Dependency> {
        if self.is_identity() {
            return deps;
        }
        deps.into_iter().filter(|dep| self.matches(dep)).collect()
    }
}

/// Narrows `deps` to the records matching `substring`.
pub fn apply_filter(deps: Vec<Dependency>, substring: Option<&str>) -> Vec<Dependency> {
    DependencyFilter::new(substring).apply(deps)
}
