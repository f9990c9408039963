pub mod contact;
pub mod narrow_phase;

pub use contact::{CollisionPair, Contact, ContactEvent, MprResult};
pub use narrow_phase::{
    check_collision, mpr, mpr_with_limit, MprScratch, K_COLLIDE_EPSILON, MPR_MAX_ITERATIONS,
};
