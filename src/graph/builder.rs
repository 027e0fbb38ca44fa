//! Bounded breadth-first traversal that populates a [`DependencyGraph`].

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};

use super::dependency_graph::DependencyGraph;
use super::filter::DependencyFilter;
use crate::config::TraversalConfig;
use crate::parser::{CoordinateError, Dependency, PackageCoordinate};
use crate::source::DependencySource;

/// What happens to packages on the last level the traversal reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Fetch and record the package's direct list; only further expansion
    /// is suppressed.
    #[default]
    RecordEdges,
    /// Record packages at depth `max_depth - 1` as leaves without fetching
    /// them. The root is always fetched.
    LeafAtBoundary,
}

/// Builds dependency graphs from a [`DependencySource`].
///
/// Every coordinate is expanded at most once per run, so shared
/// dependencies are fetched once no matter how many parents declare them.
/// Failures below the root never abort the traversal: the offending package
/// is recorded as a leaf.
///
/// # Example
///
/// ```
/// use depscope::graph::GraphBuilder;
/// use depscope::parser::{Dependency, PackageCoordinate};
/// use depscope::source::FixtureSource;
///
/// let source = FixtureSource::new()
///     .with_package("a:a", vec![Dependency::new("b", "b", "1.0")])
///     .with_package("b:b", vec![]);
///
/// let graph = GraphBuilder::new(&source, 3).build("a:a").unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert!(graph.contains(&PackageCoordinate::new("b", "b")));
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<S> {
    source: S,
    max_depth: usize,
    filter: DependencyFilter,
    boundary: BoundaryPolicy,
}

impl<S: DependencySource> GraphBuilder<S> {
    /// Creates a builder with no filter and the default boundary policy.
    pub fn new(source: S, max_depth: usize) -> Self {
        Self {
            source,
            max_depth,
            filter: DependencyFilter::default(),
            boundary: BoundaryPolicy::default(),
        }
    }

    /// Creates a builder from validated traversal settings.
    pub fn from_config(source: S, config: &TraversalConfig) -> Self {
        Self::new(source, config.max_depth)
            .with_filter(config.filter.as_deref())
            .with_boundary_policy(config.boundary)
    }

    /// Sets the substring filter applied to every fetched list.
    pub fn with_filter(mut self, substring: Option<&str>) -> Self {
        self.filter = DependencyFilter::new(substring);
        self
    }

    /// Sets the boundary policy.
    pub fn with_boundary_policy(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Parses `root` and builds its graph.
    ///
    /// Fails only if `root` is not a `group:artifact` pair.
    pub fn build(&self, root: &str) -> Result<DependencyGraph, CoordinateError> {
        let root = PackageCoordinate::parse(root)?;
        Ok(self.build_from(&root))
    }

    /// Builds the graph rooted at an already parsed coordinate.
    pub fn build_from(&self, root: &PackageCoordinate) -> DependencyGraph {
        debug!(
            %root,
            max_depth = self.max_depth,
            source = %self.source.describe(),
            "building dependency graph"
        );

        let mut graph = DependencyGraph::new();
        let mut visited: HashSet<PackageCoordinate> = HashSet::new();
        let mut queue: VecDeque<(PackageCoordinate, usize)> = VecDeque::new();
        queue.push_back((root.clone(), 0));

        while let Some((coordinate, depth)) = queue.pop_front() {
            // A coordinate can be queued by several parents of the same level.
            if !visited.insert(coordinate.clone()) {
                continue;
            }

            let deps = self.expand(&coordinate, depth);

            if depth + 1 < self.max_depth {
                for dep in &deps {
                    let child = dep.coordinate();
                    if !visited.contains(&child) {
                        queue.push_back((child, depth + 1));
                    }
                }
            }

            graph.insert_dependencies(coordinate, &deps);
        }

        info!(
            %root,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "dependency graph built"
        );
        graph
    }

    /// Fetches and filters the direct dependencies of one package.
    fn expand(&self, coordinate: &PackageCoordinate, depth: usize) -> Vec<Dependency> {
        if let Err(err) = coordinate.validate() {
            warn!(%coordinate, error = %err, "skipping malformed coordinate");
            return Vec::new();
        }

        if self.boundary == BoundaryPolicy::LeafAtBoundary
            && depth > 0
            && depth + 1 >= self.max_depth
        {
            debug!(%coordinate, depth, "depth boundary reached, recording leaf");
            return Vec::new();
        }

        debug!(%coordinate, depth, "expanding package");
        match self.source.fetch(coordinate) {
            Ok(deps) => self.filter.apply(deps),
            Err(err) => {
                warn!(%coordinate, error = %err, "failed to fetch dependencies, treating as leaf");
                Vec::new()
            }
        }
    }
}

/// Builds the graph for `root` in one call.
///
/// ```
/// use depscope::graph::build;
/// use depscope::source::FixtureSource;
///
/// assert!(build("not-a-coordinate", &FixtureSource::demo(), 3, None).is_err());
/// ```
pub fn build<S: DependencySource>(
    root: &str,
    source: S,
    max_depth: usize,
    filter: Option<&str>,
) -> Result<DependencyGraph, CoordinateError> {
    GraphBuilder::new(source, max_depth)
        .with_filter(filter)
        .build(root)
}
