//! Dependency graph produced by a traversal.
//!
//! The graph is an insertion-ordered map from [`PackageCoordinate`] to the
//! package's direct (post-filter) dependency edges. Iteration order is the
//! order in which the traversal reached each package, which keeps every
//! renderer deterministic.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use crate::parser::{Dependency, PackageCoordinate};

/// A directed edge from a package to one of its direct dependencies.
///
/// The version belongs to the edge, not to the target node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// The dependent package
    pub from: PackageCoordinate,
    /// The dependency
    pub to: PackageCoordinate,
    /// Version declared by `from` for `to`
    pub version: String,
}

impl DependencyEdge {
    /// Creates an edge from a parent coordinate and a dependency record.
    pub fn from_dependency(from: &PackageCoordinate, dep: &Dependency) -> Self {
        Self {
            from: from.clone(),
            to: dep.coordinate(),
            version: dep.version.clone(),
        }
    }

    /// The `group:artifact:version` label of the target.
    pub fn target_label(&self) -> String {
        format!("{}:{}", self.to, self.version)
    }
}

/// A package reached by the traversal together with its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    /// Package identity
    pub coordinate: PackageCoordinate,
    /// Direct dependencies in source order
    pub edges: Vec<DependencyEdge>,
}

/// Graph of explored packages.
///
/// A coordinate absent from the graph was never reached. A coordinate
/// present with no edges was reached but has no (remaining) dependencies,
/// could not be fetched, or sits on the depth boundary.
///
/// # Example
///
/// ```rust
/// use depscope::graph::DependencyGraph;
/// use depscope::parser::{Dependency, PackageCoordinate};
///
/// let mut graph = DependencyGraph::new();
/// let app = PackageCoordinate::new("com.example", "app");
///
/// graph.insert_dependencies(app.clone(), &[Dependency::new("junit", "junit", "4.13.2")]);
/// graph.insert(PackageCoordinate::new("junit", "junit"), Vec::new());
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.dependencies(&app).unwrap()[0].version, "4.13.2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Reached packages in insertion order
    nodes: Vec<DependencyNode>,
    /// Maps coordinates to their position in `nodes` for O(1) lookup
    node_indices: HashMap<PackageCoordinate, usize>,
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the edges of a package.
    ///
    /// Each coordinate is recorded once: returns `false` and leaves the graph
    /// unchanged if it is already present.
    pub fn insert(&mut self, coordinate: PackageCoordinate, edges: Vec<DependencyEdge>) -> bool {
        if self.node_indices.contains_key(&coordinate) {
            return false;
        }

        self.node_indices.insert(coordinate.clone(), self.nodes.len());
        self.nodes.push(DependencyNode { coordinate, edges });
        true
    }

    /// Records a package from its dependency records.
    pub fn insert_dependencies(
        &mut self,
        coordinate: PackageCoordinate,
        deps: &[Dependency],
    ) -> bool {
        let edges = deps
            .iter()
            .map(|dep| DependencyEdge::from_dependency(&coordinate, dep))
            .collect();
        self.insert(coordinate, edges)
    }

    /// Gets the recorded edges of a package, or `None` if it was never reached.
    pub fn dependencies(&self, coordinate: &PackageCoordinate) -> Option<&[DependencyEdge]> {
        self.get_node(coordinate).map(|node| node.edges.as_slice())
    }

    /// Gets a reached package by coordinate.
    pub fn get_node(&self, coordinate: &PackageCoordinate) -> Option<&DependencyNode> {
        self.node_indices
            .get(coordinate)
            .and_then(|&idx| self.nodes.get(idx))
    }

    /// Iterates over reached packages in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.iter()
    }

    /// Iterates over every stored edge, grouped by node in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.nodes.iter().flat_map(|node| node.edges.iter())
    }

    /// Returns the number of reached packages.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of stored edges (duplicates included).
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.edges.len()).sum()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks if a package was reached.
    pub fn contains(&self, coordinate: &PackageCoordinate) -> bool {
        self.node_indices.contains_key(coordinate)
    }

    /// Builds a petgraph view over the stored edges.
    ///
    /// Edge targets that were never reached get nodes too, appended after
    /// the reached packages.
    fn to_digraph(&self) -> DiGraph<&PackageCoordinate, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edge_count());
        let mut indices: HashMap<&PackageCoordinate, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            indices.insert(&node.coordinate, graph.add_node(&node.coordinate));
        }
        for (position, node) in self.nodes.iter().enumerate() {
            let from = NodeIndex::new(position);
            for edge in &node.edges {
                let to = match indices.get(&edge.to) {
                    Some(&idx) => idx,
                    None => {
                        let idx = graph.add_node(&edge.to);
                        indices.insert(&edge.to, idx);
                        idx
                    }
                };
                graph.add_edge(from, to, ());
            }
        }

        graph
    }

    /// Detects circular dependencies among the stored edges.
    ///
    /// Each cycle lists its members starting from the one reached first.
    /// Cycles are ordered by the position of that first member.
    ///
    /// ```rust
    /// use depscope::graph::DependencyGraph;
    /// use depscope::parser::{Dependency, PackageCoordinate};
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.insert_dependencies(PackageCoordinate::new("x", "x"), &[Dependency::new("y", "y", "1.0")]);
    /// graph.insert_dependencies(PackageCoordinate::new("y", "y"), &[Dependency::new("x", "x", "1.0")]);
    ///
    /// let cycles = graph.detect_cycles();
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].cycle_path(), "x:x -> y:y -> x:x");
    /// ```
    pub fn detect_cycles(&self) -> Vec<CycleInfo> {
        let digraph = self.to_digraph();
        let mut cycles: Vec<(usize, CycleInfo)> = Vec::new();

        for scc in tarjan_scc(&digraph) {
            let is_cycle = match scc.as_slice() {
                [single] => digraph.contains_edge(*single, *single),
                members => members.len() > 1,
            };
            if !is_cycle {
                continue;
            }

            let mut members: Vec<NodeIndex> = scc;
            members.sort_by_key(|idx| idx.index());
            let nodes: Vec<PackageCoordinate> = members
                .iter()
                .filter_map(|&idx| digraph.node_weight(idx))
                .map(|coord| (*coord).clone())
                .collect();
            let first = members.first().map_or(usize::MAX, |idx| idx.index());
            cycles.push((first, CycleInfo { nodes }));
        }

        cycles.sort_by_key(|(first, _)| *first);
        cycles.into_iter().map(|(_, cycle)| cycle).collect()
    }

    /// Checks if the stored edges contain at least one cycle.
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.to_digraph())
    }

    /// Returns the set of coordinates taking part in any cycle.
    pub fn get_nodes_in_cycles(&self) -> HashSet<PackageCoordinate> {
        self.detect_cycles()
            .into_iter()
            .flat_map(|cycle| cycle.nodes)
            .collect()
    }
}

/// Information about a detected circular dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The packages in the cycle
    pub nodes: Vec<PackageCoordinate>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a:a -> b:b -> a:a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        let mut parts: Vec<String> = self.nodes.iter().map(ToString::to_string).collect();
        parts.push(first.to_string());
        parts.join(" -> ")
    }

    /// Returns the number of packages in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(name: &str) -> PackageCoordinate {
        PackageCoordinate::new(name, name)
    }

    fn dep(name: &str) -> Dependency {
        Dependency::new(name, name, "1.0")
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_insert_keeps_first_entry() {
        let mut graph = DependencyGraph::new();
        assert!(graph.insert_dependencies(coord("a"), &[dep("b")]));
        assert!(!graph.insert_dependencies(coord("a"), &[dep("c"), dep("d")]));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.dependencies(&coord("a")).unwrap()[0].to, coord("b"));
    }

    #[test]
    fn test_insertion_order() {
        let mut graph = DependencyGraph::new();
        for name in ["m", "c", "x", "a"] {
            graph.insert(coord(name), Vec::new());
        }

        let order: Vec<String> = graph.nodes().map(|n| n.coordinate.artifact.clone()).collect();
        assert_eq!(order, vec!["m", "c", "x", "a"]);
    }

    #[test]
    fn test_absent_versus_empty() {
        let mut graph = DependencyGraph::new();
        graph.insert(coord("leaf"), Vec::new());

        assert_eq!(graph.dependencies(&coord("leaf")), Some(&[][..]));
        assert_eq!(graph.dependencies(&coord("missing")), None);
        assert!(graph.contains(&coord("leaf")));
        assert!(!graph.contains(&coord("missing")));
    }

    #[test]
    fn test_edge_count_includes_duplicates() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[dep("b"), dep("c")]);
        graph.insert_dependencies(coord("b"), &[dep("d")]);
        graph.insert_dependencies(coord("c"), &[dep("d")]);

        assert_eq!(graph.edge_count(), 4);
        let targets: Vec<String> = graph.edges().map(|e| e.to.artifact.clone()).collect();
        assert_eq!(targets, vec!["b", "c", "d", "d"]);
    }

    #[test]
    fn test_edge_version_metadata() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[Dependency::new("b", "b", "2.1")]);

        let edge = &graph.dependencies(&coord("a")).unwrap()[0];
        assert_eq!(edge.from, coord("a"));
        assert_eq!(edge.version, "2.1");
        assert_eq!(edge.target_label(), "b:b:2.1");
    }

    #[test]
    fn test_diamond_has_no_cycles() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[dep("b"), dep("c")]);
        graph.insert_dependencies(coord("b"), &[dep("d")]);
        graph.insert_dependencies(coord("c"), &[dep("d")]);
        graph.insert(coord("d"), Vec::new());

        assert!(!graph.has_cycles());
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_detect_cycles() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[dep("b"), dep("z")]);
        graph.insert_dependencies(coord("b"), &[dep("c")]);
        graph.insert_dependencies(coord("c"), &[dep("a")]);

        assert!(graph.has_cycles());
        let cycles = graph.detect_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
        assert_eq!(cycles[0].cycle_path(), "a:a -> b:b -> c:c -> a:a");

        let members = graph.get_nodes_in_cycles();
        assert!(members.contains(&coord("a")));
        assert!(!members.contains(&coord("z")));
    }

    #[test]
    fn test_detect_cycles_self_loop() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[dep("a")]);

        let cycles = graph.detect_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec![coord("a")]);
    }

    #[test]
    fn test_cycle_info_empty() {
        let cycle = CycleInfo { nodes: Vec::new() };
        assert!(cycle.is_empty());
        assert_eq!(cycle.cycle_path(), "");
    }
}
