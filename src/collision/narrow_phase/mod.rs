pub mod mpr;

pub use mpr::{
    check_collision, mpr, mpr_with_limit, MprScratch, K_COLLIDE_EPSILON, MPR_MAX_ITERATIONS,
};
