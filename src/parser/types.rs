//! Shared types for dependency exploration.
//!
//! This module defines the identity of a package (`group:artifact`) and the
//! dependency records returned by a dependency source.

use serde::Deserialize;
use std::fmt;

/// Errors raised when a string does not describe a `group:artifact` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    /// The input is not exactly two non-empty parts separated by `:`.
    #[error("Invalid package coordinate '{0}': expected groupId:artifactId")]
    InvalidCoordinate(String),
}

/// Identity of a package: a `group:artifact` pair.
///
/// The version is deliberately not part of the identity. Two edges pointing to
/// the same group and artifact at different versions reach the same node.
///
/// # Example
///
/// ```
/// use depscope::parser::PackageCoordinate;
///
/// let coord = PackageCoordinate::parse("org.slf4j:slf4j-api").unwrap();
/// assert_eq!(coord.group, "org.slf4j");
/// assert_eq!(coord.artifact, "slf4j-api");
/// assert_eq!(coord.to_string(), "org.slf4j:slf4j-api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageCoordinate {
    /// Group identifier (e.g., "org.springframework")
    pub group: String,
    /// Artifact identifier (e.g., "spring-core")
    pub artifact: String,
}

impl PackageCoordinate {
    /// Creates a coordinate without validating it.
    ///
    /// Coordinates built from dependency records go through here; use
    /// [`PackageCoordinate::validate`] to check them before fetching.
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Parses a `group:artifact` string.
    ///
    /// Both parts must be non-empty and there must be exactly one separator.
    ///
    /// ```
    /// use depscope::parser::PackageCoordinate;
    ///
    /// assert!(PackageCoordinate::parse("junit:junit").is_ok());
    /// assert!(PackageCoordinate::parse("junit").is_err());
    /// assert!(PackageCoordinate::parse("a:b:c").is_err());
    /// assert!(PackageCoordinate::parse(":b").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let invalid = || CoordinateError::InvalidCoordinate(input.to_string());

        let (group, artifact) = input.split_once(':').ok_or_else(invalid)?;
        let coord = Self::new(group.trim(), artifact.trim());
        coord.validate().map_err(|_| invalid())?;
        Ok(coord)
    }

    /// Checks that both parts are non-empty and free of the `:` separator.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        let well_formed = |part: &str| !part.trim().is_empty() && !part.contains(':');
        if well_formed(&self.group) && well_formed(&self.artifact) {
            Ok(())
        } else {
            Err(CoordinateError::InvalidCoordinate(self.to_string()))
        }
    }

    /// Returns true if [`PackageCoordinate::validate`] succeeds.
    pub fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }

    /// Stable file name stem for this coordinate, with `:` replaced by `_`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.group, self.artifact)
    }
}

impl fmt::Display for PackageCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

impl std::str::FromStr for PackageCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A direct dependency record as declared by a package descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dependency {
    /// Group identifier of the dependency.
    pub group: String,

    /// Artifact identifier of the dependency.
    pub artifact: String,

    /// Declared version; `"unknown"` when the descriptor omits it.
    pub version: String,
}

impl Dependency {
    /// Creates a new Dependency instance.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// The coordinate this record points to.
    pub fn coordinate(&self) -> PackageCoordinate {
        PackageCoordinate::new(self.group.clone(), self.artifact.clone())
    }

    /// The composite `group:artifact:version` string.
    pub fn composite(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}
