use std::f32::consts::TAU;

use glam::Vec2;
use tracing::debug;

use crate::{
    generator::InfectionGraph,
    properties::{particles_and_springs, Particle, Spring},
    quadtree::QuadTree,
};

/// Position of every node, indexed like the graph
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    positions: Vec<Vec2>,
}

impl Layout {
    /// Places the nodes evenly on a circle.
    /// The radius is picked so neighbours on the circle are `spacing` apart.
    pub fn circular(graph: &InfectionGraph, spacing: f32) -> Self {
        let n = graph.node_count();
        let radius = spacing * n as f32 / TAU;

        let positions = (0..n)
            .map(|i| {
                let angle = TAU * i as f32 / n as f32;
                Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();

        Self { positions }
    }

    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Scales and translates the layout into a `width` x `height` canvas,
    /// keeping `margin` pixels free on every side. Y grows downwards.
    pub fn fit(&self, width: u32, height: u32, margin: f32) -> Vec<Vec2> {
        let canvas = Vec2::new(width as f32, height as f32);
        let usable = (canvas - Vec2::splat(2.0 * margin)).max(Vec2::ZERO);

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(-f32::INFINITY);
        for p in self.positions.iter() {
            min = min.min(*p);
            max = max.max(*p);
        }

        let extent = max - min;
        let scale = match (extent.x > f32::EPSILON, extent.y > f32::EPSILON) {
            (true, true) => (usable.x / extent.x).min(usable.y / extent.y),
            (true, false) => usable.x / extent.x,
            (false, true) => usable.y / extent.y,
            (false, false) => 0.0,
        };
        let center = 0.5 * (min + max);

        self.positions
            .iter()
            .map(|p| {
                let mut fitted = (*p - center) * scale;
                fitted.y = -fitted.y;
                fitted + 0.5 * canvas
            })
            .collect()
    }
}

/// Force directed refinement of a layout.
///
/// Nodes repel each other, edges pull like springs and everything is pulled
/// towards the origin.
#[derive(Clone, Debug)]
pub struct ForceLayout {
    repel: bool,
    spring: bool,
    gravity: bool,
    spring_stiffness: f32,
    spring_neutral_length: f32,
    delta_time: f32,
    gravity_force: f32,
    repel_force_const: f32,
    damping: f32,
    quadtree_theta: f32,
    freeze_thresh: f32,
    iterations: usize,
}

impl ForceLayout {
    pub fn builder() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    /// Circular layout of `graph` refined by the simulation
    pub fn layout(&self, graph: &InfectionGraph) -> Layout {
        let initial = Layout::circular(graph, self.spring_neutral_length);
        self.refine(graph, &initial)
    }

    /// Runs the simulation starting from `initial`
    pub fn refine(&self, graph: &InfectionGraph, initial: &Layout) -> Layout {
        let (mut particles, springs) = particles_and_springs(graph, initial.positions());

        let mut steps = 0;
        while steps < self.iterations && particles.iter().any(|p| !p.frozen) {
            self.simulation_step(&mut particles, &springs);
            steps += 1;
        }
        debug!(steps, nodes = particles.len(), "layout simulation finished");

        Layout::from_positions(particles.into_iter().map(|p| p.position).collect())
    }

    pub fn simulation_step(&self, particles: &mut [Particle], springs: &[Spring]) {
        let forces = self.calculate_forces(particles, springs);
        self.apply_forces(particles, &forces);
        self.update_positions(particles);
    }

    fn calculate_forces(&self, particles: &[Particle], springs: &[Spring]) -> Vec<Vec2> {
        let mut forces = vec![Vec2::ZERO; particles.len()];

        if self.repel || self.gravity {
            let quadtree = QuadTree::enclosing(particles.iter().map(|p| (p.position, p.mass)));

            for (force, particle) in forces.iter_mut().zip(particles.iter()) {
                if particle.frozen {
                    continue;
                }
                if self.repel {
                    let approximations =
                        quadtree.approximations(&particle.position, self.quadtree_theta);
                    for approximation in approximations {
                        let other = Particle::new(approximation.position(), approximation.mass());
                        *force += Self::repel_force(self.repel_force_const, particle, &other);
                    }
                }
                if self.gravity {
                    *force += Self::center_gravity(self.gravity_force, particle);
                }
            }
        }

        if self.spring {
            for spring in springs {
                let (Some(source), Some(target)) =
                    (particles.get(spring.source), particles.get(spring.target))
                else {
                    continue;
                };
                let spring_force = self.spring_force(source, target);
                forces[spring.source] -= spring_force;
                forces[spring.target] += spring_force;
            }
        }

        forces
    }

    fn apply_forces(&self, particles: &mut [Particle], forces: &[Vec2]) {
        for (particle, force) in particles.iter_mut().zip(forces) {
            particle.velocity += *force / particle.mass * self.delta_time;
        }
    }

    fn update_positions(&self, particles: &mut [Particle]) {
        for particle in particles.iter_mut() {
            if particle.frozen {
                particle.velocity = Vec2::ZERO;
                continue;
            }

            particle.velocity *= self.damping;
            particle.position += particle.velocity * self.delta_time;

            if self.freeze_thresh > particle.speed() {
                particle.frozen = true;
            }
        }
    }

    fn spring_force(&self, n1: &Particle, n2: &Particle) -> Vec2 {
        let direction_vec: Vec2 = n2.position - n1.position;
        let force_magnitude =
            self.spring_stiffness * (direction_vec.length() - self.spring_neutral_length);

        direction_vec.normalize_or(Vec2::ZERO) * -force_magnitude
    }

    fn repel_force(repel_force_const: f32, n1: &Particle, n2: &Particle) -> Vec2 {
        let dir_vec: Vec2 = n2.position - n1.position;
        if dir_vec.length_squared() == 0.0 {
            return Vec2::ZERO;
        }

        let f = -repel_force_const * (n1.mass * n2.mass).abs() / dir_vec.length_squared();

        (dir_vec.normalize_or(Vec2::ZERO) * f).clamp(
            Vec2::new(-100000.0, -100000.0),
            Vec2::new(100000.0, 100000.0),
        )
    }

    fn center_gravity(gravity_force: f32, particle: &Particle) -> Vec2 {
        -particle.position * particle.mass * gravity_force
    }
}

/// Builder for `ForceLayout`
pub struct LayoutBuilder {
    repel: bool,
    spring: bool,
    gravity: bool,
    spring_stiffness: f32,
    spring_neutral_length: f32,
    delta_time: f32,
    gravity_force: f32,
    repel_force_const: f32,
    damping: f32,
    quadtree_theta: f32,
    freeze_thresh: f32,
    iterations: usize,
}

impl LayoutBuilder {
    /// Get a Instance of `LayoutBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// If nodes should repel from each other
    pub fn repel(mut self, repel: bool) -> Self {
        self.repel = repel;
        self
    }

    /// If edges should act as springs and pull the nodes together
    pub fn spring(mut self, spring: bool) -> Self {
        self.spring = spring;
        self
    }

    /// If nodes should be globally pulled to the center of the canvas
    pub fn gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    /// How strong the spring force should be
    pub fn spring_stiffness(mut self, spring_stiffness: f32) -> Self {
        self.spring_stiffness = spring_stiffness;
        self
    }

    /// Length of a edge in neutral position.
    /// If edge is shorter it pushers apart.
    /// If edge is longer it pulls together.
    /// Also used as the spacing of the initial circle.
    pub fn spring_neutral_length(mut self, neutral_length: f32) -> Self {
        self.spring_neutral_length = neutral_length;
        self
    }

    /// How strong the pull to the center should be.
    pub fn gravity_force(mut self, gravity_force: f32) -> Self {
        self.gravity_force = gravity_force;
        self
    }

    /// How strong nodes should push others away.
    pub fn repel_force(mut self, repel_force_const: f32) -> Self {
        self.repel_force_const = repel_force_const;
        self
    }

    /// Amount of damping that should be applied to the nodes movement
    /// `1.0` -> No Damping
    /// `0.0` -> No Movement
    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Barnes-Hut approximation threshold, between 0.0 and 1.0.
    /// `0.0` -> No approximation -> n^2 brute force
    pub fn quadtree_accuracy(mut self, theta: f32) -> Self {
        self.quadtree_theta = theta;
        self
    }

    /// Freeze nodes when their velocity falls below `freeze_thresh`.
    /// Set to `-1` to disable
    pub fn freeze_threshold(mut self, freeze_thresh: f32) -> Self {
        self.freeze_thresh = freeze_thresh;
        self
    }

    /// How much time a simulation step should simulate. (euler method)
    pub fn delta_time(mut self, delta_time: f32) -> Self {
        self.delta_time = delta_time;
        self
    }

    /// Upper bound of simulation steps. `0` keeps the circular layout.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Constructs a instance of `ForceLayout`
    pub fn build(self) -> ForceLayout {
        ForceLayout {
            repel: self.repel,
            spring: self.spring,
            gravity: self.gravity,
            repel_force_const: self.repel_force_const,
            spring_stiffness: self.spring_stiffness,
            spring_neutral_length: self.spring_neutral_length,
            gravity_force: self.gravity_force,
            delta_time: self.delta_time,
            damping: self.damping,
            quadtree_theta: self.quadtree_theta,
            freeze_thresh: self.freeze_thresh,
            iterations: self.iterations,
        }
    }
}

impl Default for LayoutBuilder {
    /// Get a Instance of `LayoutBuilder` with default values
    fn default() -> Self {
        Self {
            repel: true,
            spring: true,
            gravity: true,
            repel_force_const: 100.0,
            spring_stiffness: 100.0,
            spring_neutral_length: 2.0,
            gravity_force: 1.0,
            delta_time: 0.005,
            damping: 0.9,
            quadtree_theta: 0.75,
            freeze_thresh: 1e-4,
            iterations: 400,
        }
    }
}
