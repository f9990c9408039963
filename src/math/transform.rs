use super::mat4::Mat4;
use super::quat::Quat;
use super::vec3::Vec3;

/// Translation, rotation and non-uniform scale of a body.
///
/// Composes to a matrix that scales first, then rotates, then translates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// `translation * rotation * scale`
    #[inline]
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Maps a local point into world space without building the matrix
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.rotate_vec(point.component_mul(self.scale)) + self.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_matrix_agrees_with_direct_transform() {
        let t = Transform::from_translation(Vec3::new(1.0, -2.0, 0.5))
            .with_rotation(Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.6))
            .with_scale(Vec3::new(3.0, 1.0, 0.5));
        let m = t.compute_matrix();

        for p in [Vec3::X, Vec3::new(0.5, -0.5, 0.5), Vec3::new(-2.0, 4.0, 1.0)] {
            assert!(m.transform_point(p).distance(t.transform_point(p)) < 1e-5);
        }
    }

    #[test]
    fn test_scale_is_applied_in_local_frame() {
        // Stretch along local X, then turn local X onto world Y.
        let t = Transform::IDENTITY
            .with_rotation(Quat::from_axis_angle(Vec3::Z, FRAC_PI_2))
            .with_scale(Vec3::new(4.0, 1.0, 1.0));
        let p = t.compute_matrix().transform_point(Vec3::X);
        assert!(p.distance(Vec3::new(0.0, 4.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::default().compute_matrix(), Mat4::IDENTITY);
        assert_eq!(Transform::IDENTITY.transform_point(p), p);
    }
}
