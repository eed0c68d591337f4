use glam::Vec2;
use petgraph::visit::EdgeRef;

use crate::generator::InfectionGraph;

/// Point mass standing in for a node during the layout simulation
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub frozen: bool,
}

impl Particle {
    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            frozen: false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Edge acting as a spring between two particles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spring {
    pub source: usize,
    pub target: usize,
}

/// One particle per node, placed at `positions`, and one spring per edge.
///
/// A node weighs one plus its degree so hubs move less.
pub fn particles_and_springs(
    graph: &InfectionGraph,
    positions: &[Vec2],
) -> (Vec<Particle>, Vec<Spring>) {
    let mut particles: Vec<Particle> = positions
        .iter()
        .map(|&position| Particle::new(position, 1.0))
        .collect();
    let mut springs = Vec::with_capacity(graph.edge_count());

    for edge in graph.edge_references() {
        let (source, target) = (edge.source().index(), edge.target().index());
        if let Some(p) = particles.get_mut(source) {
            p.mass += 1.0;
        }
        if let Some(p) = particles.get_mut(target) {
            p.mass += 1.0;
        }
        springs.push(Spring { source, target });
    }

    (particles, springs)
}
