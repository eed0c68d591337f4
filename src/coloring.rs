use image::Rgb;

use crate::{generator::InfectionGraph, infection::InfectedSet};

/// Marker a node is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeColor {
    Infected,
    Healthy,
}

impl NodeColor {
    pub fn of(infected: bool) -> Self {
        if infected {
            Self::Infected
        } else {
            Self::Healthy
        }
    }

    /// Red for infected nodes, green otherwise
    pub fn rgb(&self) -> Rgb<u8> {
        match self {
            Self::Infected => Rgb([220, 30, 30]),
            Self::Healthy => Rgb([40, 170, 60]),
        }
    }
}

/// Color of every node in index order.
///
/// Always derived from the infected set, never stored on the graph.
pub fn colors(graph: &InfectionGraph, infected: &InfectedSet) -> Vec<NodeColor> {
    graph
        .node_indices()
        .map(|n| NodeColor::of(infected.contains(n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use petgraph::graph::NodeIndex;

    use super::*;
    use crate::generator::labelled_graph;

    #[test]
    fn colors_follow_infection() {
        let graph = labelled_graph(4, &[(0, 1), (0, 2), (2, 3)]).unwrap();
        let infected: InfectedSet = [NodeIndex::new(0), NodeIndex::new(2)].into_iter().collect();

        assert_eq!(
            colors(&graph, &infected),
            vec![
                NodeColor::Infected,
                NodeColor::Healthy,
                NodeColor::Infected,
                NodeColor::Healthy
            ]
        );
    }

    #[test]
    fn infected_is_red() {
        let Rgb([r, g, _]) = NodeColor::Infected.rgb();
        assert!(r > g);
        let Rgb([r, g, _]) = NodeColor::Healthy.rgb();
        assert!(g > r);
    }
}
