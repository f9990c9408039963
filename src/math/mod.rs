mod mat4;
mod quat;
mod transform;
mod vec3;

pub use mat4::Mat4;
pub use quat::Quat;
pub use transform::Transform;
pub use vec3::Vec3;

/// Common math constants
pub mod consts {
    /// Length below which a direction vector is treated as degenerate
    pub const EPSILON: f32 = 1e-6;
}
