//! Closed-form queries between simple primitives.
//!
//! These are independent of the MPR engine and of the stepping loop.

use crate::math::{Quat, Vec3};

/// The plane `normal · p = offset`. The normal does not have to be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    #[inline]
    pub fn new(normal: Vec3, offset: f32) -> Self {
        debug_assert!(!normal.is_zero(), "plane normal must be nonzero");
        Self { normal, offset }
    }

    /// Plane through `point` with the given normal
    #[inline]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self::new(normal, normal.dot(point))
    }

    /// `(n · p - offset) / |n|²`: how many normals `point` lies above the plane.
    ///
    /// Equals the signed distance when the normal is unit length.
    #[inline]
    pub fn normal_parameter(&self, point: Vec3) -> f32 {
        (self.normal.dot(point) - self.offset) / self.normal.length_squared()
    }

    /// Signed Euclidean distance, positive on the side the normal points to
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal_parameter(point) * self.normal.length()
    }

    /// Orthogonal projection of `point` onto the plane
    #[inline]
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.normal_parameter(point)
    }
}

/// Closest point to `point` on the segment `a`-`b`.
///
/// A zero-length segment returns `a`.
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// An oriented bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub center: Vec3,
    /// Unit local axes expressed in world space
    pub axes: [Vec3; 3],
    pub half_extents: Vec3,
}

impl Obb {
    pub fn new(center: Vec3, axes: [Vec3; 3], half_extents: Vec3) -> Self {
        Self {
            center,
            axes,
            half_extents,
        }
    }

    /// Box of the given half-extents, rotated then moved to `center`
    pub fn from_transform(center: Vec3, rotation: Quat, half_extents: Vec3) -> Self {
        Self::new(
            center,
            [
                rotation.rotate_vec(Vec3::X),
                rotation.rotate_vec(Vec3::Y),
                rotation.rotate_vec(Vec3::Z),
            ],
            half_extents,
        )
    }

    /// Closest point inside or on the box to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let d = point - self.center;
        let extents = [self.half_extents.x, self.half_extents.y, self.half_extents.z];
        self.axes
            .iter()
            .zip(extents)
            .fold(self.center, |acc, (&axis, h)| acc + axis * d.dot(axis).clamp(-h, h))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// A segment swept by a sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    #[inline]
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }
}

/// True if the sphere touches or overlaps the box
pub fn sphere_obb_intersects(sphere: &Sphere, obb: &Obb) -> bool {
    let closest = obb.closest_point(sphere.center);
    (closest - sphere.center).length_squared() <= sphere.radius * sphere.radius
}

/// Capsule against box, reduced to a sphere test.
///
/// The sphere sits at the point of the capsule's segment closest to the box center, so
/// a long capsule grazing a box corner far from that point can be missed.
pub fn capsule_obb_intersects(capsule: &Capsule, obb: &Obb) -> bool {
    let center = closest_point_on_segment(obb.center, capsule.start, capsule.end);
    sphere_obb_intersects(&Sphere::new(center, capsule.radius), obb)
}
