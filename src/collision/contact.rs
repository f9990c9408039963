use crate::math::Vec3;

/// Contact reported by the narrow phase for an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit contact normal, pointing from body A toward body B
    pub normal: Vec3,
    /// Contact point on body A in world space
    pub point_a: Vec3,
    /// Contact point on body B in world space
    pub point_b: Vec3,
}

impl Contact {
    /// The same contact seen from body B: normal negated, points exchanged
    pub fn swapped(self) -> Self {
        Self {
            normal: -self.normal,
            point_a: self.point_b,
            point_b: self.point_a,
        }
    }

    /// Midpoint between the two contact points
    pub fn midpoint(&self) -> Vec3 {
        (self.point_a + self.point_b) * 0.5
    }
}

/// Result of an MPR query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MprResult {
    /// The shapes overlap
    Intersecting(Contact),
    /// The shapes are disjoint. `direction` is the last search direction, which
    /// proves separation but is not necessarily the minimal separating axis.
    Separated { direction: Vec3 },
    /// The refinement did not settle within the iteration cap
    Inconclusive { direction: Vec3 },
}

impl MprResult {
    #[inline]
    pub fn is_intersecting(&self) -> bool {
        matches!(self, MprResult::Intersecting(_))
    }

    #[inline]
    pub fn contact(&self) -> Option<Contact> {
        match self {
            MprResult::Intersecting(contact) => Some(*contact),
            _ => None,
        }
    }

    /// Contact normal on a hit, otherwise the last search direction
    #[inline]
    pub fn direction(&self) -> Vec3 {
        match self {
            MprResult::Intersecting(contact) => contact.normal,
            MprResult::Separated { direction } | MprResult::Inconclusive { direction } => {
                *direction
            }
        }
    }
}

/// An unordered pair of collider indices, stored with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub a: usize,
    pub b: usize,
}

impl CollisionPair {
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a collider cannot collide with itself");
        if a < b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Every unordered pair `i < j` of `count` colliders, in row-major order
    pub fn all(count: usize) -> impl Iterator<Item = CollisionPair> {
        (0..count).flat_map(move |a| (a + 1..count).map(move |b| CollisionPair { a, b }))
    }
}

/// A hit recorded during a simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub pair: CollisionPair,
    /// Which resolution pass found the contact (0-based)
    pub iteration: usize,
    pub contact: Contact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_ordered() {
        assert_eq!(CollisionPair::new(4, 1), CollisionPair::new(1, 4));
        assert_eq!(CollisionPair::new(4, 1).a, 1);
    }

    #[test]
    fn test_all_pairs() {
        let pairs: Vec<_> = CollisionPair::all(4).map(|p| (p.a, p.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(CollisionPair::all(1).count(), 0);
        assert_eq!(CollisionPair::all(0).count(), 0);
    }

    #[test]
    fn test_swapped_contact() {
        let c = Contact {
            normal: Vec3::X,
            point_a: Vec3::new(0.5, 0.0, 0.0),
            point_b: Vec3::ZERO,
        };
        let s = c.swapped();
        assert_eq!(s.normal, -Vec3::X);
        assert_eq!(s.point_a, c.point_b);
        assert_eq!(s.swapped(), c);
        assert_eq!(c.midpoint(), Vec3::new(0.25, 0.0, 0.0));
    }

    #[test]
    fn test_result_accessors() {
        let sep = MprResult::Separated { direction: Vec3::Y };
        assert!(!sep.is_intersecting());
        assert!(sep.contact().is_none());
        assert_eq!(sep.direction(), Vec3::Y);
    }
}
