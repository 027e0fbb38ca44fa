//! Dependency sources.
//!
//! A [`DependencySource`] answers one question: what are the direct
//! dependencies of a coordinate? The graph builder only ever talks to this
//! trait, so the remote repository and the offline fixture are
//! interchangeable.

pub mod fixture;
pub mod remote;

use crate::parser::{Dependency, PackageCoordinate, ParseError};

pub use fixture::FixtureSource;
pub use remote::{RemoteSource, RemoteSourceConfig};

/// Errors a dependency source may report for a single coordinate.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The request could not be completed (connection, timeout, body read).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The repository answered with a non-success status.
    #[error("Repository returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The source has no record of the coordinate.
    #[error("Package not found: {0}")]
    NotFound(PackageCoordinate),

    /// The descriptor was fetched but could not be parsed.
    #[error("Failed to parse descriptor for {coordinate}: {source}")]
    Parse {
        coordinate: PackageCoordinate,
        #[source]
        source: ParseError,
    },

    /// A fixture file could not be read.
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// A fixture file is not valid JSON of the expected shape.
    #[error("Invalid fixture file: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Result type alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Capability to list the direct dependencies of a package.
///
/// Implementations return dependencies in declaration order; the graph keeps
/// that order for rendering.
pub trait DependencySource {
    /// Fetches the ordered direct dependencies of `coordinate`.
    fn fetch(&self, coordinate: &PackageCoordinate) -> SourceResult<Vec<Dependency>>;

    /// Short human-readable description, used in logs.
    fn describe(&self) -> String {
        String::from("dependency source")
    }
}

impl<S: DependencySource + ?Sized> DependencySource for &S {
    fn fetch(&self, coordinate: &PackageCoordinate) -> SourceResult<Vec<Dependency>> {
        (**self).fetch(coordinate)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: DependencySource + ?Sized> DependencySource for Box<S> {
    fn fetch(&self, coordinate: &PackageCoordinate) -> SourceResult<Vec<Dependency>> {
        (**self).fetch(coordinate)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
