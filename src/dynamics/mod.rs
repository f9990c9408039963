mod collider;
mod integrator;

pub use collider::{make_box_collider, Collider};
pub use integrator::{integrate, resolve_collision};
