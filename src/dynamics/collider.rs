use crate::geometry::ConvexHull;
use crate::math::{Mat4, Quat, Vec3};

/// A convex body: its hull in local space plus pose, motion and material state
#[derive(Debug, Clone)]
pub struct Collider {
    /// Local-space vertices
    pub hull: ConvexHull,

    // Pose
    /// Position in world space
    pub position: Vec3,
    /// Orientation, kept unit length
    pub rotation: Quat,
    /// Per-axis scale applied before rotation
    pub scale: Vec3,

    // Motion
    /// Linear velocity
    pub velocity: Vec3,
    /// Angular velocity (radians per second, axis times rate)
    pub angular_velocity: Vec3,

    // Accumulators, consumed by the next integration
    pub pending_force: Vec3,
    pub pending_torque: Vec3,

    // Mass properties
    pub mass: f32,
    /// Scalar moment of inertia, used for every axis
    pub moment_of_inertia: f32,

    // Material
    /// Stored but unused by the resolver
    pub friction: f32,
    /// Scales the corrective impulse on contact
    pub restitution: f32,

    /// Movable bodies are integrated and pushed by contacts. Immovable ones
    /// still collide but never move; their accumulators are dropped each step.
    pub is_movable: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            hull: ConvexHull::unit_cube(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            pending_torque: Vec3::ZERO,
            mass: 5.0,
            moment_of_inertia: 2.5,
            friction: 0.5,
            restitution: 0.5,
            is_movable: true,
        }
    }
}

/// A movable unit cube with the default material
pub fn make_box_collider() -> Collider {
    Collider::default()
}

impl Collider {
    /// A default collider with a custom hull
    pub fn from_hull(hull: ConvexHull) -> Self {
        Self {
            hull,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Sets the mass. Must be positive for a movable body.
    pub fn with_mass(mut self, mass: f32) -> Self {
        debug_assert!(mass > 0.0, "mass must be positive");
        self.mass = mass;
        self
    }

    pub fn with_moment_of_inertia(mut self, moment_of_inertia: f32) -> Self {
        debug_assert!(moment_of_inertia > 0.0, "moment of inertia must be positive");
        self.moment_of_inertia = moment_of_inertia;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_movable(mut self, is_movable: bool) -> Self {
        self.is_movable = is_movable;
        self
    }

    /// Shorthand for `with_movable(false)`
    pub fn immovable(self) -> Self {
        self.with_movable(false)
    }

    /// Local-to-world matrix: scale, then rotate, then translate
    #[inline]
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Writes the hull vertices in world space into `out`
    pub fn world_points(&self, out: &mut Vec<Vec3>) {
        self.hull.transform_into(&self.world_transform(), out);
    }

    /// Accumulates a force through the center of mass
    #[inline]
    pub fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    #[inline]
    pub fn add_torque(&mut self, torque: Vec3) {
        self.pending_torque += torque;
    }

    /// Accumulates the torque `force × (point - position)` without any linear force
    #[inline]
    pub fn add_torque_at_location(&mut self, force: Vec3, point: Vec3) {
        self.pending_torque += force.cross(point - self.position);
    }

    /// Accumulates a force applied at a world-space point, along with its torque
    pub fn add_force_at_location(&mut self, force: Vec3, point: Vec3) {
        self.add_force(force);
        self.add_torque_at_location(force, point);
    }

    /// Drops any accumulated force and torque
    pub fn clear_pending(&mut self) {
        self.pending_force = Vec3::ZERO;
        self.pending_torque = Vec3::ZERO;
    }

    /// Kinetic energy with the scalar inertia model
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
            + 0.5 * self.moment_of_inertia * self.angular_velocity.length_squared()
    }
}
