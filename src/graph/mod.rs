//! Graph module for dependency exploration.
//!
//! This module provides the [`DependencyGraph`] produced by a traversal, the
//! [`GraphBuilder`] that performs the bounded breadth-first search, and the
//! [`DependencyFilter`] applied to every fetched dependency list.
//!
//! # Example
//!
//! ```rust
//! use depscope::graph::GraphBuilder;
//! use depscope::parser::{Dependency, PackageCoordinate};
//! use depscope::source::FixtureSource;
//!
//! let source = FixtureSource::new()
//!     .with_package("x:x", vec![Dependency::new("y", "y", "1.0")])
//!     .with_package("y:y", vec![Dependency::new("x", "x", "1.0")]);
//!
//! let graph = GraphBuilder::new(&source, 4).build("x:x").unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert!(graph.has_cycles());
//! ```

mod builder;
mod dependency_graph;
mod filter;

pub use builder::{build, BoundaryPolicy, GraphBuilder};
pub use dependency_graph::{CycleInfo, DependencyEdge, DependencyGraph, DependencyNode};
pub use filter::{apply_filter, DependencyFilter};
