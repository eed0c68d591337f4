use petgraph::graph::{DiGraph, NodeIndex};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::error::{InfectionError, Result};

/// Directed graph whose node weights are the node labels
pub type InfectionGraph = DiGraph<u32, ()>;

/// Erdős–Rényi `G(n, p)` generator for directed graphs.
///
/// Every ordered pair `(u, v)` with `u != v` gets the edge `u -> v` with probability `p`.
#[derive(Clone, Debug)]
pub struct GraphGenerator {
    node_count: usize,
    edge_probability: f64,
    seed: Option<u64>,
}

impl GraphGenerator {
    /// Get a Instance of `GraphGenerator` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes the graph will contain
    pub fn node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    /// Chance of an edge between any ordered pair of distinct nodes.
    /// Value must be between 0.0 and 1.0.
    pub fn edge_probability(mut self, edge_probability: f64) -> Self {
        self.edge_probability = edge_probability;
        self
    }

    /// Fix the random seed so generation is reproducible.
    /// Without a seed every call produces a different topology.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds a new random graph
    pub fn generate(&self) -> Result<InfectionGraph> {
        match self.seed {
            Some(seed) => self.generate_with(&mut StdRng::seed_from_u64(seed)),
            None => self.generate_with(&mut rand::thread_rng()),
        }
    }

    /// Builds a new random graph drawing from `rng`
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Result<InfectionGraph> {
        let p = self.edge_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(InfectionError::InvalidProbability(p));
        }

        let n = self.node_count;
        let mut graph = InfectionGraph::with_capacity(n, (n * n) / 20);
        for label in 0..n {
            graph.add_node(label as u32);
        }

        for u in 0..n {
            for v in 0..n {
                if u != v && rng.gen_bool(p) {
                    graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "generated random graph"
        );
        Ok(graph)
    }
}

/// Builds a graph with `node_count` labelled nodes and the given edges.
pub fn labelled_graph(node_count: usize, edges: &[(u32, u32)]) -> Result<InfectionGraph> {
    let mut graph = InfectionGraph::with_capacity(node_count, edges.len());
    for label in 0..node_count {
        graph.add_node(label as u32);
    }
    for &(source, target) in edges {
        for node in [source, target] {
            if node as usize >= node_count {
                return Err(InfectionError::NodeOutOfBounds(node as usize));
            }
        }
        graph.add_edge(NodeIndex::new(source as usize), NodeIndex::new(target as usize), ());
    }
    Ok(graph)
}

impl Default for GraphGenerator {
    /// 75 nodes with a 5% edge probability
    fn default() -> Self {
        Self {
            node_count: 75,
            edge_probability: 0.05,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_graph_has_75_labelled_nodes() {
        let graph = GraphGenerator::new().generate().unwrap();
        assert_eq!(graph.node_count(), 75);
        for idx in graph.node_indices() {
            assert_eq!(graph[idx] as usize, idx.index());
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let generator = GraphGenerator::new().seed(7);
        let a = generator.generate().unwrap();
        let b = generator.generate().unwrap();

        let edges_a: Vec<_> = a.raw_edges().iter().map(|e| (e.source(), e.target())).collect();
        let edges_b: Vec<_> = b.raw_edges().iter().map(|e| (e.source(), e.target())).collect();
        assert_eq!(edges_a, edges_b);
    }

    #[test]
    fn probability_bounds() {
        let empty = GraphGenerator::new()
            .node_count(10)
            .edge_probability(0.0)
            .generate()
            .unwrap();
        assert_eq!(empty.edge_count(), 0);

        let complete = GraphGenerator::new()
            .node_count(10)
            .edge_probability(1.0)
            .generate()
            .unwrap();
        assert_eq!(complete.edge_count(), 10 * 9);
        assert!(complete.raw_edges().iter().all(|e| e.source() != e.target()));
    }

    #[test]
    fn labelled_graph_checks_bounds() {
        let graph = labelled_graph(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let err = labelled_graph(2, &[(0, 5)]).unwrap_err();
        assert!(matches!(err, InfectionError::NodeOutOfBounds(5)));
    }

    #[test]
    fn rejects_invalid_probability() {
        let err = GraphGenerator::new()
            .edge_probability(1.5)
            .generate()
            .unwrap_err();
        assert!(matches!(err, InfectionError::InvalidProbability(p) if p == 1.5));

        let err = GraphGenerator::new()
            .edge_probability(f64::NAN)
            .generate()
            .unwrap_err();
        assert!(matches!(err, InfectionError::InvalidProbability(_)));
    }
}
