//! # portalphys
//!
//! Convex collision detection and a small rigid-body stepping loop.
//!
//! ## Features
//!
//! - **Collision Detection**: Minkowski Portal Refinement over arbitrary convex point sets,
//!   reporting a contact normal and a contact point on each body
//! - **Colliders**: convex hulls with position, rotation, per-axis scale, and mass properties
//! - **Integration**: semi-implicit Euler with scalar moment of inertia
//! - **Contact Response**: iterative push-out with restitution-scaled corrective forces
//! - **Primitives**: plane, segment, oriented box, sphere and capsule queries
//!
//! ## Quick Start
//!
//! ```rust
//! use portalphys::prelude::*;
//!
//! let mut world = World::default();
//!
//! // A wide static slab whose top face sits at y = 0
//! world.insert(
//!     make_box_collider()
//!         .with_scale(Vec3::new(20.0, 1.0, 20.0))
//!         .with_position(Vec3::new(0.0, -0.5, 0.0))
//!         .immovable(),
//! );
//!
//! let cube = world.insert(make_box_collider().with_position(Vec3::new(0.0, 3.0, 0.0)));
//!
//! let dt = 1.0 / 60.0;
//! for _ in 0..120 {
//!     let mass = world.collider(cube).map_or(0.0, |c| c.mass);
//!     world.add_force(cube, Vec3::new(0.0, -10.0 * mass, 0.0));
//!     world.step(dt)?;
//! }
//!
//! let pos = world.collider(cube).map(|c| c.position);
//! println!("Cube position: {:?}", pos);
//! # Ok::<(), portalphys::SimulationError>(())
//! ```

pub mod collision;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
mod world;

pub use collision::{check_collision, mpr, Contact, MprResult};
pub use dynamics::{make_box_collider, Collider};
pub use error::{ConfigError, HullError, SimulationError};
pub use world::{
    run_simulation, run_simulation_with, ColliderHandle, StepReport, World, WorldConfig,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{check_collision, Contact, ContactEvent, MprResult};
    pub use crate::dynamics::{make_box_collider, Collider};
    pub use crate::geometry::{Capsule, ConvexHull, Obb, Plane, Sphere};
    pub use crate::input::{InputState, Key, SimulationGate};
    pub use crate::math::{Mat4, Quat, Transform, Vec3};
    pub use crate::world::{run_simulation, ColliderHandle, StepReport, World, WorldConfig};
}
