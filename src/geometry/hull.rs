use crate::error::HullError;
use crate::math::{Mat4, Vec3};

/// Returns the point of `points` furthest along `direction`.
///
/// Linear scan with a strictly-greater comparison: when several points tie for the
/// maximum, the first one in slice order wins. `points` must not be empty.
#[inline]
pub fn support(points: &[Vec3], direction: Vec3) -> Vec3 {
    points[support_index(points, direction)]
}

/// Index form of [`support`]
pub fn support_index(points: &[Vec3], direction: Vec3) -> usize {
    let mut best = 0;
    let mut best_dot = points[0].dot(direction);
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = p.dot(direction);
        if d > best_dot {
            best = i;
            best_dot = d;
        }
    }
    best
}

/// Arithmetic mean of a point set (not the volume centroid)
pub fn centroid(points: &[Vec3]) -> Vec3 {
    let sum = points.iter().fold(Vec3::ZERO, |acc, &p| acc + p);
    sum / points.len() as f32
}

/// A convex shape described by its vertices in local space.
///
/// The points are expected to be the vertices of a convex polytope; convexity is not
/// checked. Support queries over a non-convex set answer for its convex hull.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    points: Vec<Vec3>,
}

impl ConvexHull {
    /// Builds a hull from local-space vertices
    pub fn new(points: Vec<Vec3>) -> Result<Self, HullError> {
        if points.is_empty() {
            return Err(HullError::Empty);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(HullError::NonFinitePoint { index });
        }
        Ok(Self { points })
    }

    /// Axis-aligned box centered on the origin with the given half-extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let mut points = Vec::with_capacity(8);
        for z in [-h.z, h.z] {
            for y in [-h.y, h.y] {
                for x in [-h.x, h.x] {
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
        Self { points }
    }

    /// The unit cube: corners at ±0.5 on every axis
    pub fn unit_cube() -> Self {
        Self::cuboid(Vec3::splat(0.5))
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a successfully built hull
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of the local vertices
    pub fn centroid(&self) -> Vec3 {
        centroid(&self.points)
    }

    /// Local-space support point
    #[inline]
    pub fn support(&self, direction: Vec3) -> Vec3 {
        support(&self.points, direction)
    }

    /// Support point of the hull placed in the world by `transform`
    pub fn support_world(&self, transform: &Mat4, direction: Vec3) -> Vec3 {
        let mut best = transform.transform_point(self.points[0]);
        let mut best_dot = best.dot(direction);
        for &p in &self.points[1..] {
            let world = transform.transform_point(p);
            let d = world.dot(direction);
            if d > best_dot {
                best = world;
                best_dot = d;
            }
        }
        best
    }

    /// Writes every vertex, transformed into world space, into `out` (cleared first)
    pub fn transform_into(&self, transform: &Mat4, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(self.points.iter().map(|&p| transform.transform_point(p)));
    }
}

impl Default for ConvexHull {
    fn default() -> Self {
        Self::unit_cube()
    }
}
