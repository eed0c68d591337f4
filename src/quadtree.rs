use glam::Vec2;

const EPSILON: f32 = 1e-3;
const MAX_DEPTH: u32 = 32;

/// Implementation of a quadtree for the barnes-hut algorithm.
/// An area gets split up into 4 sections and each can contain a leaf or another quadtree
/// This can be used to approximate far away nodes to reduce calculations.
#[derive(Debug)]
pub struct QuadTree {
    pub children: Vec<Option<Self>>,
    pub boundary: BoundingBox2D,
    mass: f32,
    weighted_position: Vec2,
    depth: u32,
}

impl QuadTree {
    /// Creates a empty `QuadTree` with it's initial `BoundingBox2D`
    pub fn new(boundary: BoundingBox2D) -> Self {
        Self::at_depth(boundary, 0)
    }

    /// Creates a `QuadTree` whose boundary encloses all `points`
    pub fn enclosing(points: impl IntoIterator<Item = (Vec2, f32)>) -> Self {
        let points: Vec<(Vec2, f32)> = points.into_iter().collect();

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(-f32::INFINITY);
        for (position, _) in points.iter() {
            min = min.min(*position);
            max = max.max(*position);
        }
        if points.is_empty() {
            min = Vec2::ZERO;
            max = Vec2::ZERO;
        }

        let size = max - min;
        let mut quadtree = Self::new(BoundingBox2D::new(min + 0.5 * size, size.x, size.y));
        for (position, mass) in points {
            quadtree.insert(position, mass);
        }
        quadtree
    }

    fn at_depth(boundary: BoundingBox2D, depth: u32) -> Self {
        Self {
            children: vec![None, None, None, None],
            boundary,
            mass: 0.0,
            weighted_position: Vec2::ZERO,
            depth,
        }
    }

    /// Returns the position of the node.
    /// If its an approximation its the average based on `mass`
    pub fn position(&self) -> Vec2 {
        if self.mass == 0.0 {
            return self.boundary.center;
        }
        self.weighted_position / self.mass
    }

    /// Returns the mass of the node
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inserts a point mass and places it according to its relative position in the boundary.
    /// Points without mass are ignored.
    pub fn insert(&mut self, position: Vec2, mass: f32) {
        if mass <= 0.0 {
            return;
        }

        if self.mass == 0.0 {
            self.add_mass(position, mass);
            return;
        }

        if self.is_leaf() {
            let leaf_position = self.position();

            // Points that are too close get merged into one
            if leaf_position.distance(position) < EPSILON || self.depth >= MAX_DEPTH {
                self.add_mass(position, mass);
                return;
            }

            let leaf_mass = self.mass;
            self.push_down(leaf_position, leaf_mass);
        }

        self.add_mass(position, mass);
        self.push_down(position, mass);
    }

    /// Returns the nodes used to approximate the forces acting on `position`.
    /// Far away nodes get summarized into their parent.
    /// Higher `theta` values result in more approximations.
    /// If `theta` is 0, all nodes are returned without summarizing.
    pub fn approximations(&self, position: &Vec2, theta: f32) -> Vec<&Self> {
        let mut nodes: Vec<&QuadTree> = vec![];
        let mut stack = vec![self];

        while let Some(parent) = stack.pop() {
            if parent.mass == 0.0 {
                continue;
            }
            let s = parent.boundary.width.max(parent.boundary.height);
            let dist = parent.position().distance(*position);

            if parent.is_leaf() {
                // Skip the point itself
                if dist > EPSILON {
                    nodes.push(parent);
                }
            } else if s / dist < theta && !parent.boundary.contains(position) {
                nodes.push(parent);
            } else {
                stack.extend(parent.children.iter().flatten());
            }
        }
        nodes
    }

    fn push_down(&mut self, position: Vec2, mass: f32) {
        let quadrant = self.boundary.section(&position);
        let boundary = self.boundary.sub_quadrant(quadrant);
        let depth = self.depth + 1;

        self.children[quadrant as usize]
            .get_or_insert_with(|| Self::at_depth(boundary, depth))
            .insert(position, mass);
    }

    fn add_mass(&mut self, position: Vec2, mass: f32) {
        self.weighted_position += position * mass;
        self.mass += mass;
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

#[derive(Clone, Debug)]
pub struct BoundingBox2D {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox2D {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Whether `loc` lies inside the box, edges included
    pub fn contains(&self, loc: &Vec2) -> bool {
        (loc[0] - self.center[0]).abs() <= 0.5 * self.width
            && (loc[1] - self.center[1]).abs() <= 0.5 * self.height
    }

    fn section(&self, loc: &Vec2) -> u8 {
        let mut section = 0x00;

        if loc[1] > self.center[1] {
            section |= 0b10;
        }

        if loc[0] > self.center[0] {
            section |= 0b01;
        }

        section
    }

    pub fn sub_quadrant(&self, section: u8) -> Self {
        let mut shift = self.center;
        if section & 0b01 > 0 {
            shift[0] += 0.25 * self.width;
        } else {
            shift[0] -= 0.25 * self.width;
        }

        if section & 0b10 > 0 {
            shift[1] += 0.25 * self.height;
        } else {
            shift[1] -= 0.25 * self.height;
        }
        Self {
            center: shift,
            width: self.width * 0.5,
            height: self.height * 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_and_center_accumulate() {
        let mut qt = QuadTree::new(BoundingBox2D::new(Vec2::ZERO, 10.0, 10.0));
        qt.insert(Vec2::new(-2.0, 0.0), 1.0);
        qt.insert(Vec2::new(2.0, 0.0), 3.0);

        assert_eq!(qt.mass(), 4.0);
        assert_eq!(qt.position(), Vec2::new(1.0, 0.0));
        assert!(!qt.is_leaf());
    }

    #[test]
    fn close_points_are_merged() {
        let mut qt = QuadTree::new(BoundingBox2D::new(Vec2::ZERO, 10.0, 10.0));
        qt.insert(Vec2::new(1.0, 1.0), 1.0);
        qt.insert(Vec2::new(1.0, 1.0), 1.0);

        assert!(qt.is_leaf());
        assert_eq!(qt.mass(), 2.0);
    }

    #[test]
    fn zero_theta_returns_every_other_point() {
        let points = [
            (Vec2::new(-4.0, -4.0), 1.0),
            (Vec2::new(4.0, -4.0), 1.0),
            (Vec2::new(-4.0, 4.0), 1.0),
            (Vec2::new(4.0, 4.0), 1.0),
        ];
        let qt = QuadTree::enclosing(points);

        let nodes = qt.approximations(&Vec2::new(-4.0, -4.0), 0.0);
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|n| n.mass() == 1.0));
    }

    #[test]
    fn far_clusters_are_summarized() {
        let mut points = vec![(Vec2::new(-100.0, 0.0), 1.0)];
        for i in 0..8 {
            points.push((Vec2::new(100.0 + i as f32 * 0.5, 0.5 * i as f32), 1.0));
        }
        let qt = QuadTree::enclosing(points);

        let nodes = qt.approximations(&Vec2::new(-100.0, 0.0), 0.9);
        assert!(nodes.len() < 8);
        let total: f32 = nodes.iter().map(|n| n.mass()).sum();
        assert_eq!(total, 8.0);
    }

    #[test]
    fn enclosing_node_is_never_summarized() {
        // The heavy pair pulls the center of mass into the opposite corner,
        // far enough for the root to pass the theta test on its own.
        let mut qt = QuadTree::new(BoundingBox2D::new(Vec2::ZERO, 10.0, 10.0));
        let query = Vec2::new(-5.0, -5.0);
        qt.insert(query, 1.0);
        qt.insert(Vec2::new(4.9, 4.9), 100.0);
        qt.insert(Vec2::new(4.8, 4.9), 100.0);

        let nodes = qt.approximations(&query, 0.75);
        let total: f32 = nodes.iter().map(|n| n.mass()).sum();
        assert_eq!(total, 200.0);
    }

    #[test]
    fn bounding_box_contains_its_edges() {
        let bb = BoundingBox2D::new(Vec2::ZERO, 4.0, 2.0);
        assert!(bb.contains(&Vec2::new(2.0, -1.0)));
        assert!(!bb.contains(&Vec2::new(2.1, 0.0)));
        assert!(!bb.contains(&Vec2::new(0.0, 1.5)));
    }

    #[test]
    fn sub_quadrant_halves_the_box() {
        let bb = BoundingBox2D::new(Vec2::ZERO, 4.0, 4.0);
        let q = bb.sub_quadrant(0b11);
        assert_eq!(q.center, Vec2::new(1.0, 1.0));
        assert_eq!(q.width, 2.0);
        assert_eq!(q.section(&Vec2::new(-1.0, 2.0)), 0b10);
    }
}
