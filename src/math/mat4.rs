use std::ops::Mul;

use super::quat::Quat;
use super::vec3::Vec3;

/// A 4x4 affine/projective matrix, column-major, acting on column vectors.
///
/// `a * b` applied to a point applies `b` first. A world transform built as
/// `translation * rotation * scale` therefore scales, then rotates, then translates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    /// `cols[c][r]` is the element in column `c`, row `r`
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = scale.x;
        m.cols[1][1] = scale.y;
        m.cols[2][2] = scale.z;
        m
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [translation.x, translation.y, translation.z, 1.0];
        m
    }

    /// Rotation matrix of a unit quaternion
    pub fn from_quat(q: Quat) -> Self {
        let (x2, y2, z2) = (q.x + q.x, q.y + q.y, q.z + q.z);
        let (xx, yy, zz) = (q.x * x2, q.y * y2, q.z * z2);
        let (xy, xz, yz) = (q.x * y2, q.x * z2, q.y * z2);
        let (wx, wy, wz) = (q.w * x2, q.w * y2, q.w * z2);

        Self::from_cols([
            [1.0 - (yy + zz), xy + wz, xz - wy, 0.0],
            [xy - wz, 1.0 - (xx + zz), yz + wx, 0.0],
            [xz + wy, yz - wx, 1.0 - (xx + yy), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `translation * rotation * scale`
    #[inline]
    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self::from_translation(translation) * Self::from_quat(rotation) * Self::from_scale(scale)
    }

    /// Translation part (last column)
    #[inline]
    pub fn translation(&self) -> Vec3 {
        let c = self.cols[3];
        Vec3::new(c[0], c[1], c[2])
    }

    /// Transforms a point (w = 1), so translation applies
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Transforms a direction (w = 0), so translation is ignored
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * v.x + c[1][0] * v.y + c[2][0] * v.z,
            c[0][1] * v.x + c[1][1] * v.y + c[2][1] * v.z,
            c[0][2] * v.x + c[1][2] * v.y + c[2][2] * v.z,
        )
    }

    #[inline]
    fn flat(&self) -> [f32; 16] {
        let c = &self.cols;
        [
            c[0][0], c[0][1], c[0][2], c[0][3], c[1][0], c[1][1], c[1][2], c[1][3], c[2][0],
            c[2][1], c[2][2], c[2][3], c[3][0], c[3][1], c[3][2], c[3][3],
        ]
    }

    /// The twelve 2x2 minors shared by the determinant and the inverse
    #[inline]
    fn minors(a: &[f32; 16]) -> [f32; 12] {
        [
            a[0] * a[5] - a[1] * a[4],
            a[0] * a[6] - a[2] * a[4],
            a[0] * a[7] - a[3] * a[4],
            a[1] * a[6] - a[2] * a[5],
            a[1] * a[7] - a[3] * a[5],
            a[2] * a[7] - a[3] * a[6],
            a[8] * a[13] - a[9] * a[12],
            a[8] * a[14] - a[10] * a[12],
            a[8] * a[15] - a[11] * a[12],
            a[9] * a[14] - a[10] * a[13],
            a[9] * a[15] - a[11] * a[13],
            a[10] * a[15] - a[11] * a[14],
        ]
    }

    #[inline]
    fn det_from_minors(b: &[f32; 12]) -> f32 {
        b[0] * b[11] - b[1] * b[10] + b[2] * b[9] + b[3] * b[8] - b[4] * b[7] + b[5] * b[6]
    }

    pub fn determinant(&self) -> f32 {
        Self::det_from_minors(&Self::minors(&self.flat()))
    }

    /// Inverse matrix, or `None` for a singular matrix (zero determinant).
    pub fn try_inverse(&self) -> Option<Self> {
        let a = self.flat();
        let b = Self::minors(&a);
        let det = Self::det_from_minors(&b);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        let o = [
            (a[5] * b[11] - a[6] * b[10] + a[7] * b[9]) * inv,
            (a[2] * b[10] - a[1] * b[11] - a[3] * b[9]) * inv,
            (a[13] * b[5] - a[14] * b[4] + a[15] * b[3]) * inv,
            (a[10] * b[4] - a[9] * b[5] - a[11] * b[3]) * inv,
            (a[6] * b[8] - a[4] * b[11] - a[7] * b[7]) * inv,
            (a[0] * b[11] - a[2] * b[8] + a[3] * b[7]) * inv,
            (a[14] * b[2] - a[12] * b[5] - a[15] * b[1]) * inv,
            (a[8] * b[5] - a[10] * b[2] + a[11] * b[1]) * inv,
            (a[4] * b[10] - a[5] * b[8] + a[7] * b[6]) * inv,
            (a[1] * b[8] - a[0] * b[10] - a[3] * b[6]) * inv,
            (a[12] * b[4] - a[13] * b[2] + a[15] * b[0]) * inv,
            (a[9] * b[2] - a[8] * b[4] - a[11] * b[0]) * inv,
            (a[5] * b[7] - a[4] * b[9] - a[6] * b[6]) * inv,
            (a[0] * b[9] - a[1] * b[7] + a[2] * b[6]) * inv,
            (a[13] * b[1] - a[12] * b[3] - a[14] * b[0]) * inv,
            (a[8] * b[3] - a[9] * b[1] + a[10] * b[0]) * inv,
        ];

        Some(Self::from_cols([
            [o[0], o[1], o[2], o[3]],
            [o[4], o[5], o[6], o[7]],
            [o[8], o[9], o[10], o[11]],
            [o[12], o[13], o[14], o[15]],
        ]))
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, value) in col.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Self::from_cols(out)
    }
}
