//! Parser module for depscope.
//!
//! This module provides the package identity types shared across the crate
//! and the parser for repository descriptors.
//!
//! # Supported Formats
//!
//! - **pom.xml** (Maven) - direct dependencies only
//! - **maven-metadata.xml** - latest version resolution
//!
//! # Example
//!
//! ```
//! use depscope::parser::{parse_dependencies, PackageCoordinate};
//!
//! let pom = "<project><dependencies><dependency>\
//!     <groupId>org.slf4j</groupId><artifactId>slf4j-api</artifactId>\
//!     <version>1.7.36</version></dependency></dependencies></project>";
//!
//! let deps = parse_dependencies(pom).unwrap();
//! assert_eq!(deps[0].coordinate(), PackageCoordinate::new("org.slf4j", "slf4j-api"));
//! ```

pub mod pom;
pub mod types;

// Re-export commonly used types for convenience
pub use pom::{parse_dependencies, resolve_latest_version, ParseError, ParseResult, UNKNOWN_VERSION};

pub use types::{CoordinateError, Dependency, PackageCoordinate};
