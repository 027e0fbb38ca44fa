//! depscope - transitive dependency explorer for `group:artifact` packages
//!
//! This crate walks the declared direct dependencies of a package with a
//! bounded breadth-first search and renders the result as a flat list, a
//! cycle-safe ASCII tree, a D2 diagram or JSON.

pub mod config;
pub mod export;
pub mod graph;
pub mod parser;
pub mod source;
