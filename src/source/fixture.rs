//! Static, in-memory dependency source.
//!
//! Used for offline runs, demos and tests. Data can be assembled in code,
//! loaded from a JSON file, or taken from the built-in demo set.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::Error as _;
use tracing::debug;

use super::{DependencySource, SourceError, SourceResult};
use crate::parser::{Dependency, PackageCoordinate};

/// Key in a fixture file that holds the fallback dependency list.
pub const FALLBACK_KEY: &str = "default";

/// Dependency source backed by a fixed map.
///
/// # Example
///
/// ```
/// use depscope::parser::{Dependency, PackageCoordinate};
/// use depscope::source::{DependencySource, FixtureSource};
///
/// let source = FixtureSource::new()
///     .with_package("a:a", vec![Dependency::new("b", "b", "1.0")]);
///
/// let deps = source.fetch(&PackageCoordinate::new("a", "a")).unwrap();
/// assert_eq!(deps.len(), 1);
/// assert!(source.fetch(&PackageCoordinate::new("z", "z")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    packages: HashMap<PackageCoordinate, Vec<Dependency>>,
    fallback: Option<Vec<Dependency>>,
}

impl FixtureSource {
    /// Creates an empty fixture with no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package and its dependency list.
    ///
    /// `coordinate` is taken verbatim so malformed keys can be modelled too.
    pub fn with_package(mut self, coordinate: &str, deps: Vec<Dependency>) -> Self {
        let key = PackageCoordinate::parse(coordinate).unwrap_or_else(|_| {
            let (group, artifact) = coordinate.split_once(':').unwrap_or((coordinate, ""));
            PackageCoordinate::new(group, artifact)
        });
        self.insert(key, deps);
        self
    }

    /// Sets the list returned for coordinates the fixture does not know.
    pub fn with_fallback(mut self, deps: Vec<Dependency>) -> Self {
        self.fallback = Some(deps);
        self
    }

    /// Inserts or replaces a package's dependency list.
    pub fn insert(&mut self, coordinate: PackageCoordinate, deps: Vec<Dependency>) {
        self.packages.insert(coordinate, deps);
    }

    /// Number of packages with explicit entries.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if there are no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Parses fixture JSON.
    ///
    /// The document is an object mapping `"group:artifact"` to an array of
    /// `{"group", "artifact", "version"}` records. The optional key
    /// `"default"` sets the fallback list.
    ///
    /// ```
    /// use depscope::source::FixtureSource;
    ///
    /// let json = r#"{
    ///     "a:a": [{"group": "b", "artifact": "b", "version": "1.0"}],
    ///     "default": []
    /// }"#;
    /// let source = FixtureSource::from_json_str(json).unwrap();
    /// assert_eq!(source.len(), 1);
    /// ```
    pub fn from_json_str(content: &str) -> SourceResult<Self> {
        let raw: HashMap<String, Vec<Dependency>> = serde_json::from_str(content)?;
        let mut source = Self::new();

        for (key, deps) in raw {
            if key == FALLBACK_KEY {
                source.fallback = Some(deps);
                continue;
            }
            let coordinate = PackageCoordinate::parse(&key)
                .map_err(|e| SourceError::Fixture(serde_json::Error::custom(e)))?;
            source.insert(coordinate, deps);
        }

        Ok(source)
    }

    /// Loads a fixture JSON file from disk.
    pub fn from_file(path: &Path) -> SourceResult<Self> {
        let content = fs::read_to_string(path)?;
        let source = Self::from_json_str(&content)?;
        debug!(path = %path.display(), packages = source.len(), "loaded fixture");
        Ok(source)
    }

    /// The built-in demo data set.
    ///
    /// Contains a handful of well-known Java packages, including a
    /// `junit` → `hamcrest` cycle, and falls back to
    /// `[junit:junit, org.slf4j:slf4j-api]` for anything else.
    pub fn demo() -> Self {
        Self::new()
            .with_package(
                "junit:junit",
                vec![Dependency::new("org.hamcrest", "hamcrest-core", "2.2")],
            )
            .with_package(
                "org.springframework:spring-core",
                vec![
                    Dependency::new("commons-logging", "commons-logging", "1.2"),
                    Dependency::new("org.springframework", "spring-jcl", "5.3.23"),
                ],
            )
            .with_package(
                "org.springframework:spring-jcl",
                vec![Dependency::new("org.slf4j", "slf4j-api", "1.7.36")],
            )
            .with_package(
                "org.hamcrest:hamcrest-core",
                vec![Dependency::new("org.hamcrest", "hamcrest-library", "2.2")],
            )
            .with_package(
                "org.hamcrest:hamcrest-library",
                vec![Dependency::new("junit", "junit", "4.13.2")],
            )
            .with_package(
                "com.example:my-app",
                vec![
                    Dependency::new("junit", "junit", "4.13.2"),
                    Dependency::new("org.springframework", "spring-core", "5.3.23"),
                    Dependency::new("com.google.guava", "guava", "31.1-jre"),
                ],
            )
            .with_package(
                "com.google.guava:guava",
                vec![
                    Dependency::new("com.google.guava", "failureaccess", "1.0.1"),
                    Dependency::new(
                        "com.google.guava",
                        "listenablefuture",
                        "9999.0-empty-to-avoid-conflict-with-guava",
                    ),
                ],
            )
            .with_fallback(vec![
                Dependency::new("junit", "junit", "4.13.2"),
                Dependency::new("org.slf4j", "slf4j-api", "1.7.36"),
            ])
    }
}

impl DependencySource for FixtureSource {
    fn fetch(&self, coordinate: &PackageCoordinate) -> SourceResult<Vec<Dependency>> {
        self.packages
            .get(coordinate)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(coordinate.clone()))
    }

    fn describe(&self) -> String {
        format!("fixture ({} packages)", self.packages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fetch_known_package_keeps_order() {
        let source = FixtureSource::demo();
        let deps = source
            .fetch(&PackageCoordinate::new("com.example", "my-app"))
            .unwrap();

        let names: Vec<String> = deps.iter().map(|d| d.coordinate().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "junit:junit",
                "org.springframework:spring-core",
                "com.google.guava:guava"
            ]
        );
    }

    #[test]
    fn test_demo_fallback() {
        let source = FixtureSource::demo();
        let deps = source
            .fetch(&PackageCoordinate::new("org.unknown", "thing"))
            .unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].artifact, "slf4j-api");
    }

    #[test]
    fn test_unknown_without_fallback() {
        let source = FixtureSource::new();
        let err = source
            .fetch(&PackageCoordinate::new("x", "y"))
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(c) if c.to_string() == "x:y"));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "x:x": [{"group": "y", "artifact": "y", "version": "1.0"}],
            "y:y": []
        }"#;
        let source = FixtureSource::from_json_str(json).unwrap();
        assert_eq!(source.len(), 2);
        assert!(source.fetch(&PackageCoordinate::new("z", "z")).is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_key() {
        let result = FixtureSource::from_json_str(r#"{"not-a-coordinate": []}"#);
        assert!(matches!(result, Err(SourceError::Fixture(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"a:a": [{{"group": "b", "artifact": "b", "version": "2.0"}}]}}"#
        )
        .unwrap();

        let source = FixtureSource::from_file(file.path()).unwrap();
        let deps = source.fetch(&PackageCoordinate::new("a", "a")).unwrap();
        assert_eq!(deps[0].version, "2.0");
    }

    #[test]
    fn test_from_missing_file() {
        let result = FixtureSource::from_file(Path::new("/nonexistent/fixture.json"));
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
