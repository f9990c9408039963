mod hull;
pub mod primitives;

pub use hull::{centroid, support, support_index, ConvexHull};
pub use primitives::{
    capsule_obb_intersects, closest_point_on_segment, sphere_obb_intersects, Capsule, Obb, Plane,
    Sphere,
};
