//! Minkowski Portal Refinement (the XenoCollide formulation).
//!
//! Works on the Minkowski difference `A - B` of two convex point sets. An interior
//! point `v0` (difference of centroids) and the origin define a ray; the algorithm
//! first finds a triangle of support points (the portal) that the ray passes through,
//! then pushes the portal outward until it either bounds the origin or proves that the
//! origin lies outside the difference.

use crate::geometry::{centroid, support};
use crate::math::consts::EPSILON;
use crate::math::{Mat4, Vec3};

use crate::collision::contact::{Contact, MprResult};

/// Default cap on portal discovery and on portal refinement iterations, each
pub const MPR_MAX_ITERATIONS: usize = 64;

/// Portal thickness at which refinement stops
pub const K_COLLIDE_EPSILON: f32 = 1e-3;

/// Offset applied along X when both centroids coincide
const CENTROID_NUDGE: f32 = 1e-5;

/// A vertex of the Minkowski difference together with the points that produced it
#[derive(Debug, Clone, Copy)]
struct SupportPoint {
    /// `a - b`
    v: Vec3,
    /// Point on shape A
    a: Vec3,
    /// Point on shape B
    b: Vec3,
}

#[inline]
fn minkowski_support(shape_a: &[Vec3], shape_b: &[Vec3], direction: Vec3) -> SupportPoint {
    let a = support(shape_a, direction);
    let b = support(shape_b, -direction);
    SupportPoint { v: a - b, a, b }
}

/// Reusable buffers for transforming local hulls into world space before a query
#[derive(Debug, Default, Clone)]
pub struct MprScratch {
    world_a: Vec<Vec3>,
    world_b: Vec<Vec3>,
}

impl MprScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transforms both local point sets and runs [`mpr_with_limit`] on the result
    pub fn check(
        &mut self,
        points_a: &[Vec3],
        transform_a: &Mat4,
        points_b: &[Vec3],
        transform_b: &Mat4,
        max_iterations: usize,
    ) -> MprResult {
        self.world_a.clear();
        self.world_a
            .extend(points_a.iter().map(|&p| transform_a.transform_point(p)));
        self.world_b.clear();
        self.world_b
            .extend(points_b.iter().map(|&p| transform_b.transform_point(p)));
        mpr_with_limit(&self.world_a, &self.world_b, max_iterations)
    }
}

/// Tests two convex point sets, each given in local space with its world transform.
///
/// On a hit the normal points from A toward B and each contact point lies on (or
/// near) the surface of its own body.
pub fn check_collision(
    points_a: &[Vec3],
    transform_a: &Mat4,
    points_b: &[Vec3],
    transform_b: &Mat4,
) -> MprResult {
    MprScratch::new().check(points_a, transform_a, points_b, transform_b, MPR_MAX_ITERATIONS)
}

/// [`mpr_with_limit`] with the default iteration cap
pub fn mpr(shape_a: &[Vec3], shape_b: &[Vec3]) -> MprResult {
    mpr_with_limit(shape_a, shape_b, MPR_MAX_ITERATIONS)
}

/// Runs MPR on two world-space point sets. Both sets must be non-empty.
pub fn mpr_with_limit(shape_a: &[Vec3], shape_b: &[Vec3], max_iterations: usize) -> MprResult {
    debug_assert!(!shape_a.is_empty() && !shape_b.is_empty());

    let center_a = centroid(shape_a);
    let center_b = centroid(shape_b);
    let mut v0 = center_a - center_b;
    if v0.is_zero() {
        v0 = Vec3::new(CENTROID_NUDGE, 0.0, 0.0);
    }
    let sup = |n: Vec3| minkowski_support(shape_a, shape_b, n);

    // First portal vertex: support toward the origin, seen from v0.
    let mut n = -v0;
    let mut v1 = sup(n);
    if v1.v.dot(n) <= 0.0 {
        return separated(n);
    }

    n = v1.v.cross(v0);
    if n.is_near_zero(EPSILON) {
        // v0, v1 and the origin are collinear: the origin lies between them.
        return MprResult::Intersecting(Contact {
            normal: (v1.v - v0).normalize(),
            point_a: v1.a,
            point_b: v1.b,
        });
    }

    let mut v2 = sup(n);
    if v2.v.dot(n) <= 0.0 {
        return separated(n);
    }

    // Orient the candidate portal so its normal faces away from v0.
    n = (v1.v - v0).cross(v2.v - v0);
    if n.dot(v0) > 0.0 {
        std::mem::swap(&mut v1, &mut v2);
        n = -n;
    }

    // Phase one: find a portal the origin ray passes through.
    let mut v3 = None;
    for _ in 0..max_iterations {
        let candidate = sup(n);
        if candidate.v.dot(n) <= 0.0 {
            return separated(n);
        }

        // Origin outside the plane (v1, v0, candidate): drop v2.
        if v0.triple(v1.v, candidate.v) < 0.0 {
            v2 = candidate;
            n = (v1.v - v0).cross(candidate.v - v0);
            continue;
        }

        // Origin outside the plane (candidate, v0, v2): drop v1.
        if v0.triple(candidate.v, v2.v) < 0.0 {
            v1 = candidate;
            n = (candidate.v - v0).cross(v2.v - v0);
            continue;
        }

        v3 = Some(candidate);
        break;
    }
    let Some(mut v3) = v3 else {
        return MprResult::Inconclusive {
            direction: n.normalize(),
        };
    };

    // Phase two: refine the portal until it is thin or the origin is shown to be outside.
    let mut hit = false;
    for _ in 0..max_iterations {
        let Some(normal) = (v2.v - v1.v).cross(v3.v - v1.v).try_normalize() else {
            // Collapsed portal; the origin lies on it.
            return MprResult::Intersecting(Contact {
                normal: (v1.v - v0).normalize(),
                point_a: v1.a,
                point_b: v1.b,
            });
        };
        n = normal;

        // Origin behind the portal means it is inside the difference.
        if n.dot(v1.v) >= 0.0 {
            hit = true;
        }

        let v4 = sup(n);
        let delta = (v4.v - v3.v).dot(n);
        let separation = -v4.v.dot(n);

        if delta <= K_COLLIDE_EPSILON || separation >= 0.0 {
            if !hit {
                return separated(n);
            }
            let (point_a, point_b) = contact_points(v0, center_a, center_b, [v1, v2, v3], n);
            return MprResult::Intersecting(Contact {
                normal: n,
                point_a,
                point_b,
            });
        }

        // Split the portal with the plane through v4, v0 and the origin and keep the
        // half the ray passes through.
        let split = v4.v.cross(v0);
        if split.dot(v1.v) >= 0.0 {
            if split.dot(v2.v) >= 0.0 {
                v1 = v4;
            } else {
                v3 = v4;
            }
        } else if split.dot(v3.v) >= 0.0 {
            v2 = v4;
        } else {
            v1 = v4;
        }
    }

    MprResult::Inconclusive { direction: n }
}

#[inline]
fn separated(direction: Vec3) -> MprResult {
    MprResult::Separated {
        direction: direction.normalize(),
    }
}

/// Blends each body's own support points with barycentric weights of the origin
/// relative to the tetrahedron (v0, v1, v2, v3).
fn contact_points(
    v0: Vec3,
    center_a: Vec3,
    center_b: Vec3,
    [v1, v2, v3]: [SupportPoint; 3],
    n: Vec3,
) -> (Vec3, Vec3) {
    let mut b0 = v3.v.triple(v1.v, v2.v);
    let mut b1 = v0.triple(v3.v, v2.v);
    let mut b2 = v3.v.triple(v0, v1.v);
    let mut b3 = v0.triple(v2.v, v1.v);
    let mut sum = b0 + b1 + b2 + b3;

    // The origin sits on or outside the v0 side; weight the portal alone.
    if sum <= 0.0 {
        b0 = 0.0;
        b1 = n.triple(v2.v, v3.v);
        b2 = n.triple(v3.v, v1.v);
        b3 = n.triple(v1.v, v2.v);
        sum = b1 + b2 + b3;
    }

    let inv = 1.0 / sum;
    let point_a = (center_a * b0 + v1.a * b1 + v2.a * b2 + v3.a * b3) * inv;
    let point_b = (center_b * b0 + v1.b * b1 + v2.b * b2 + v3.b * b3) * inv;
    (point_a, point_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ConvexHull;
    use crate::math::{Quat, Transform};
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_4;

    fn cube_at(position: Vec3) -> Vec<Vec3> {
        let mut out = Vec::new();
        ConvexHull::unit_cube()
            .transform_into(&Transform::from_translation(position).compute_matrix(), &mut out);
        out
    }

    fn posed_cube(position: Vec3, rotation: Quat) -> Vec<Vec3> {
        let mut out = Vec::new();
        ConvexHull::unit_cube().transform_into(
            &Transform::from_translation(position)
                .with_rotation(rotation)
                .compute_matrix(),
            &mut out,
        );
        out
    }

    #[test]
    fn test_overlapping_cubes() {
        let result = mpr(&cube_at(Vec3::ZERO), &cube_at(Vec3::new(0.5, 0.0, 0.0)));
        let contact = result.contact().expect("cubes overlap");

        assert_abs_diff_eq!(contact.normal.x, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(contact.normal.length(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_disjoint_cubes() {
        let a = cube_at(Vec3::ZERO);
        for offset in [
            Vec3::new(1.2, 0.0, 0.0),
            Vec3::new(0.0, -1.01, 0.0),
            Vec3::new(3.0, 2.0, 1.0),
            Vec3::new(0.6, 0.6, 1.5),
        ] {
            let result = mpr(&a, &cube_at(offset));
            assert!(
                matches!(result, MprResult::Separated { .. }),
                "offset {offset:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_coincident_centroids() {
        let a = cube_at(Vec3::ZERO);
        let result = mpr(&a, &a);
        assert!(result.is_intersecting());
        assert!(result.direction().is_finite());
    }

    #[test]
    fn test_contact_points_lie_between_bodies() {
        let result = mpr(&cube_at(Vec3::ZERO), &cube_at(Vec3::new(0.9, 0.3, 0.2)));
        let contact = result.contact().expect("cubes overlap");

        assert_abs_diff_eq!(contact.normal.x, 1.0, epsilon = 1e-3);
        // The overlap region spans x in [0.4, 0.5].
        for p in [contact.point_a, contact.point_b] {
            assert!(p.x > 0.35 && p.x < 0.55, "contact point {p:?}");
        }
    }

    #[test]
    fn test_rotated_cube_resting_on_top() {
        let rotated = Quat::from_axis_angle(Vec3::Z, 0.4);
        let result = mpr(&cube_at(Vec3::ZERO), &posed_cube(Vec3::new(0.3, 0.8, 0.0), rotated));
        let contact = result.contact().expect("tilted cube dips into the lower one");
        assert_abs_diff_eq!(contact.normal.y, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_diamond_clear_of_box() {
        // A cube balanced on its edge just above another cube.
        let diamond = posed_cube(Vec3::new(0.0, 1.25, 0.0), Quat::from_axis_angle(Vec3::Z, FRAC_PI_4));
        let result = mpr(&cube_at(Vec3::ZERO), &diamond);
        assert!(!result.is_intersecting());
    }

    #[test]
    fn test_single_point_shapes() {
        let point = [Vec3::new(0.2, 0.1, 0.0)];
        assert!(mpr(&cube_at(Vec3::ZERO), &point).is_intersecting());
        assert!(!mpr(&cube_at(Vec3::new(5.0, 0.0, 0.0)), &point).is_intersecting());
    }

    #[test]
    fn test_check_collision_uses_transforms() {
        let hull = ConvexHull::unit_cube();
        let near = Transform::from_translation(Vec3::new(0.0, 0.9, 0.0)).compute_matrix();
        let far = Transform::from_translation(Vec3::new(0.0, 0.9, 0.0))
            .with_scale(Vec3::splat(0.5))
            .compute_matrix();

        assert!(check_collision(hull.points(), &Mat4::IDENTITY, hull.points(), &near)
            .is_intersecting());
        // Halving the second cube leaves a 0.15 gap.
        assert!(!check_collision(hull.points(), &Mat4::IDENTITY, hull.points(), &far)
            .is_intersecting());
    }

    #[test]
    fn test_iteration_cap_reports_inconclusive() {
        let a = cube_at(Vec3::ZERO);
        let b = posed_cube(
            Vec3::new(0.7, 0.45, 0.1),
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.3), 0.9),
        );
        // With no refinement budget at all nothing can be decided past the first portal.
        match mpr_with_limit(&a, &b, 0) {
            MprResult::Inconclusive { direction } => assert!(direction.is_finite()),
            other => panic!("expected inconclusive, got {other:?}"),
        }
        assert!(mpr(&a, &b).is_intersecting());
    }
}
