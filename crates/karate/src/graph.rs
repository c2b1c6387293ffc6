use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;

/// Directed "field of A targets B" graph for one traversal.
///
/// The graph stays acyclic after every mutation: an edge is only committed
/// once it is known not to close a cycle.
#[derive(Debug, Default)]
pub struct ReferenceGraph<'a> {
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> ReferenceGraph<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, name: &'a str) {
        self.graph.add_node(name);
    }

    /// Add `from -> to` unless `to` already reaches `from`.
    ///
    /// Returns `false` when the edge would close a cycle, self-loops included.
    pub fn try_add_edge(&mut self, from: &'a str, to: &'a str) -> bool {
        if from == to {
            return false;
        }
        self.add_vertex(from);
        self.add_vertex(to);
        if self.graph.contains_edge(from, to) {
            return true;
        }
        if has_path_connecting(&self.graph, to, from, None) {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
