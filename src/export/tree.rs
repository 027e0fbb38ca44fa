//! ASCII tree rendering of a dependency graph.
//!
//! The tree is built depth-first from the root. Cycle detection is
//! path-local: each branch carries its own copy of the coordinates between
//! the root and the current node, so a package reached through two separate
//! paths (a diamond) is expanded under both parents, while a package that
//! repeats on its own path is cut off with a cyclic marker.

use std::collections::HashSet;
use std::io::{self, Write};

use super::{ExportData, Exporter};
use crate::graph::DependencyGraph;
use crate::parser::PackageCoordinate;

/// Suffix for a node that already appears on its own path.
pub const CYCLIC_MARKER: &str = "(cyclic dependency)";

/// Suffix for a node beyond the depth limit.
pub const DEPTH_LIMITED_MARKER: &str = "(depth limited)";

/// How a tree node was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNodeKind {
    /// Regular package, expanded from the graph
    Package,
    /// Already on the current path; not expanded
    Cyclic,
    /// One level past the depth limit; not expanded
    DepthLimited,
}

/// A node in the rendered dependency tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Package identity
    pub coordinate: PackageCoordinate,
    /// Version declared by the parent edge (`None` for the root)
    pub version: Option<String>,
    /// How the node was reached
    pub kind: TreeNodeKind,
    /// Child dependencies in stored edge order
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(coordinate: PackageCoordinate, version: Option<String>, kind: TreeNodeKind) -> Self {
        Self {
            coordinate,
            version,
            kind,
            children: Vec::new(),
        }
    }

    /// Text shown for this node, markers included.
    pub fn label(&self) -> String {
        let base = match &self.version {
            Some(version) => format!("{}:{}", self.coordinate, version),
            None => self.coordinate.to_string(),
        };
        match self.kind {
            TreeNodeKind::Package => base,
            TreeNodeKind::Cyclic => format!("{} {}", base, CYCLIC_MARKER),
            TreeNodeKind::DepthLimited => format!("{} {}", base, DEPTH_LIMITED_MARKER),
        }
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Total number of nodes in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Number of nodes of the given kind in this subtree.
    pub fn count_kind(&self, kind: TreeNodeKind) -> usize {
        let own = usize::from(self.kind == kind);
        own + self
            .children
            .iter()
            .map(|child| child.count_kind(kind))
            .sum::<usize>()
    }

    /// Render the tree as text, one node per line.
    ///
    /// The last child at each level uses `└── `, earlier siblings `├── `.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label());
        out.push('\n');
        self.render_children(&mut out, "");
        out
    }

    fn render_children(&self, out: &mut String, prefix: &str) {
        let child_count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let is_last = i + 1 == child_count;
            let (branch, continuation) = if is_last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };

            out.push_str(prefix);
            out.push_str(branch);
            out.push_str(&child.label());
            out.push('\n');

            child.render_children(out, &format!("{prefix}{continuation}"));
        }
    }
}

/// Builds cycle-safe trees from a completed graph.
///
/// # Example
///
/// ```
/// use depscope::export::TreeRenderer;
/// use depscope::graph::DependencyGraph;
/// use depscope::parser::{Dependency, PackageCoordinate};
///
/// let x = PackageCoordinate::new("x", "x");
/// let mut graph = DependencyGraph::new();
/// graph.insert_dependencies(x.clone(), &[Dependency::new("y", "y", "1.0")]);
/// graph.insert_dependencies(PackageCoordinate::new("y", "y"), &[Dependency::new("x", "x", "1.0")]);
///
/// let text = TreeRenderer::new(&graph, 4).render(&x);
/// assert_eq!(text, "x:x\n└── y:y:1.0\n    └── x:x:1.0 (cyclic dependency)\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer<'g> {
    graph: &'g DependencyGraph,
    max_depth: usize,
}

impl<'g> TreeRenderer<'g> {
    /// Creates a renderer bounded to `max_depth` levels.
    pub fn new(graph: &'g DependencyGraph, max_depth: usize) -> Self {
        Self { graph, max_depth }
    }

    /// Builds the tree rooted at `root`.
    pub fn build_tree(&self, root: &PackageCoordinate) -> TreeNode {
        self.build_node(root, None, 0, &HashSet::new())
    }

    /// Builds and renders the tree rooted at `root`.
    pub fn render(&self, root: &PackageCoordinate) -> String {
        self.build_tree(root).render()
    }

    fn build_node(
        &self,
        coordinate: &PackageCoordinate,
        version: Option<&str>,
        level: usize,
        path: &HashSet<PackageCoordinate>,
    ) -> TreeNode {
        let version = version.map(str::to_string);
        if path.contains(coordinate) {
            return TreeNode::leaf(coordinate.clone(), version, TreeNodeKind::Cyclic);
        }

        // Each branch gets its own copy so siblings never see each other.
        let mut path = path.clone();
        path.insert(coordinate.clone());

        let edges = self.graph.dependencies(coordinate).unwrap_or_default();
        let children = edges
            .iter()
            .map(|edge| {
                if level + 1 < self.max_depth {
                    self.build_node(&edge.to, Some(&edge.version), level + 1, &path)
                } else {
                    TreeNode::leaf(
                        edge.to.clone(),
                        Some(edge.version.clone()),
                        TreeNodeKind::DepthLimited,
                    )
                }
            })
            .collect();

        TreeNode {
            coordinate: coordinate.clone(),
            version,
            kind: TreeNodeKind::Package,
            children,
        }
    }
}

/// Renders the tree for `root` in one call.
pub fn render_tree(graph: &DependencyGraph, root: &PackageCoordinate, max_depth: usize) -> String {
    TreeRenderer::new(graph, max_depth).render(root)
}

/// Tree exporter implementation.
pub struct TreeExporter;

impl Exporter for TreeExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let text = render_tree(data.graph, data.root, data.max_depth);
        writer.write_all(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Dependency;

    fn coord(name: &str) -> PackageCoordinate {
        PackageCoordinate::new(name, name)
    }

    fn dep(name: &str) -> Dependency {
        Dependency::new(name, name, "1.0")
    }

    fn create_diamond() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[dep("b"), dep("c")]);
        graph.insert_dependencies(coord("b"), &[dep("d")]);
        graph.insert_dependencies(coord("c"), &[dep("d")]);
        graph.insert(coord("d"), Vec::new());
        graph
    }

    #[test]
    fn test_render_diamond() {
        let graph = create_diamond();
        let text = render_tree(&graph, &coord("a"), 3);

        assert_eq!(
            text,
            "a:a\n\
             ├── b:b:1.0\n\
             │   └── d:d:1.0\n\
             └── c:c:1.0\n    \
             └── d:d:1.0\n"
        );
        assert!(!text.contains(CYCLIC_MARKER));
    }

    #[test]
    fn test_diamond_expanded_twice() {
        let graph = create_diamond();
        let tree = TreeRenderer::new(&graph, 3).build_tree(&coord("a"));

        assert_eq!(tree.count(), 5);
        assert_eq!(tree.children[0].children[0].coordinate, coord("d"));
        assert_eq!(tree.children[1].children[0].coordinate, coord("d"));
        assert_eq!(tree.count_kind(TreeNodeKind::Cyclic), 0);
    }

    #[test]
    fn test_cycle_marked_not_expanded() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("x"), &[dep("y")]);
        graph.insert_dependencies(coord("y"), &[dep("x")]);

        let tree = TreeRenderer::new(&graph, 10).build_tree(&coord("x"));
        let repeated = &tree.children[0].children[0];

        assert_eq!(repeated.coordinate, coord("x"));
        assert_eq!(repeated.kind, TreeNodeKind::Cyclic);
        assert!(!repeated.has_children());
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("a"), &[dep("a")]);

        let text = render_tree(&graph, &coord("a"), 5);
        assert_eq!(text, format!("a:a\n└── a:a:1.0 {}\n", CYCLIC_MARKER));
    }

    #[test]
    fn test_depth_limited_children() {
        let graph = create_diamond();
        let tree = TreeRenderer::new(&graph, 2).build_tree(&coord("a"));

        // b and c are expanded, but their children sit past the limit
        let b = &tree.children[0];
        assert_eq!(b.kind, TreeNodeKind::Package);
        assert_eq!(b.children[0].kind, TreeNodeKind::DepthLimited);
        assert!(!b.children[0].has_children());
        assert!(tree.render().contains(&format!("d:d:1.0 {}", DEPTH_LIMITED_MARKER)));
    }

    #[test]
    fn test_depth_limit_wins_over_graph_entries() {
        let graph = create_diamond();
        let tree = TreeRenderer::new(&graph, 1).build_tree(&coord("a"));

        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.count_kind(TreeNodeKind::DepthLimited), 2);
        assert_eq!(tree.count(), 3);
    }

    #[test]
    fn test_unknown_root() {
        let graph = DependencyGraph::new();
        assert_eq!(render_tree(&graph, &coord("z"), 3), "z:z\n");
    }

    #[test]
    fn test_dense_cycles_terminate() {
        // Every node depends on every node.
        let names = ["a", "b", "c", "d"];
        let mut graph = DependencyGraph::new();
        for name in names {
            let deps: Vec<Dependency> = names.iter().map(|n| dep(n)).collect();
            graph.insert_dependencies(coord(name), &deps);
        }

        let tree = TreeRenderer::new(&graph, 100).build_tree(&coord("a"));
        assert!(tree.count_kind(TreeNodeKind::Cyclic) > 0);
        assert_eq!(tree.count_kind(TreeNodeKind::DepthLimited), 0);
    }

    #[test]
    fn test_sibling_glyphs() {
        let mut graph = DependencyGraph::new();
        graph.insert_dependencies(coord("r"), &[dep("a"), dep("b"), dep("c")]);

        let lines: Vec<String> = render_tree(&graph, &coord("r"), 2)
            .lines()
            .map(str::to_string)
            .collect();
        assert!(lines[1].starts_with("├── a:a"));
        assert!(lines[2].starts_with("├── b:b"));
        assert!(lines[3].starts_with("└── c:c"));
    }
}
