use super::collider::Collider;
use crate::math::{Quat, Vec3};

/// Advances one movable body by `dt` with semi-implicit Euler.
///
/// Pending force and torque are turned into velocity first and then cleared, and the
/// new velocities move the pose. Immovable bodies keep their pose and velocity, but
/// their accumulators are still cleared.
pub fn integrate(collider: &mut Collider, dt: f32) {
    if !collider.is_movable {
        collider.clear_pending();
        return;
    }

    // Linear
    collider.velocity += collider.pending_force * (dt / collider.mass);
    collider.pending_force = Vec3::ZERO;
    collider.position += collider.velocity * dt;

    // Angular
    collider.angular_velocity += collider.pending_torque * (dt / collider.moment_of_inertia);
    collider.pending_torque = Vec3::ZERO;

    let angle = collider.angular_velocity.length() * dt;
    if angle != 0.0 {
        let delta = Quat::from_axis_angle(collider.angular_velocity, angle);
        collider.rotation = (delta * collider.rotation).normalize();
    }
}

/// Corrects a movable body found overlapping another one.
///
/// `hit_dir` points away from the other body. The body is pushed out by `push_out`
/// along it and receives a force and a torque (at `contact_point`) scaled by its
/// current speed and restitution, split evenly over the `iterations` passes of a step.
/// The force and torque take effect at the next integration.
pub fn resolve_collision(
    collider: &mut Collider,
    contact_point: Vec3,
    hit_dir: Vec3,
    dt: f32,
    iterations: usize,
    push_out: f32,
) {
    if !collider.is_movable {
        return;
    }

    let dir = hit_dir.normalize();
    collider.position += dir * push_out;

    let impulse = collider.velocity.length() * collider.restitution / iterations as f32 / dt;
    collider.add_force(dir * (impulse * collider.mass));
    collider.add_torque_at_location(dir * impulse, contact_point);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::make_box_collider;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_zero_state_is_unchanged() {
        let mut body = make_box_collider().with_position(Vec3::new(1.0, 2.0, 3.0));
        let before = body.clone();

        for _ in 0..10 {
            integrate(&mut body, DT);
        }

        assert_eq!(body.position, before.position);
        assert_eq!(body.rotation, before.rotation);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_force_is_consumed() {
        let mut body = make_box_collider();
        body.add_force(Vec3::new(0.0, -50.0, 0.0));

        integrate(&mut body, 0.1);

        // a = F / m = -10, v = -1, x = v * dt
        assert_abs_diff_eq!(body.velocity.y, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(body.position.y, -0.1, epsilon = 1e-6);
        assert_eq!(body.pending_force, Vec3::ZERO);

        integrate(&mut body, 0.1);
        assert_abs_diff_eq!(body.velocity.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_immovable_body_keeps_pose_and_drops_accumulators() {
        let mut body = make_box_collider()
            .immovable()
            .with_velocity(Vec3::X)
            .with_angular_velocity(Vec3::Y);

        for _ in 0..1000 {
            body.add_force(Vec3::new(0.0, -50.0, 0.0));
            body.add_torque(Vec3::Z);
            integrate(&mut body, DT);
        }

        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.rotation, Quat::IDENTITY);
        assert_eq!(body.velocity, Vec3::X);
        assert_eq!(body.pending_force, Vec3::ZERO);
        assert_eq!(body.pending_torque, Vec3::ZERO);
    }

    #[test]
    fn test_spin_half_turn() {
        let mut body = make_box_collider().with_angular_velocity(Vec3::new(0.0, 0.0, PI));

        integrate(&mut body, 1.0);

        let local_x = body.rotation.rotate_vec(Vec3::X);
        assert_abs_diff_eq!(local_x.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_stays_normalized() {
        let mut body = make_box_collider().with_angular_velocity(Vec3::new(3.0, -7.0, 11.0));
        for _ in 0..10_000 {
            integrate(&mut body, DT);
        }
        assert_abs_diff_eq!(body.rotation.length(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_resolve_pushes_and_accumulates() {
        let mut body = make_box_collider().with_velocity(Vec3::new(0.0, -4.0, 0.0));
        let contact = Vec3::new(0.5, -0.5, 0.0);

        resolve_collision(&mut body, contact, Vec3::new(0.0, 2.0, 0.0), 0.1, 4, 0.05);

        assert_abs_diff_eq!(body.position.y, 0.05, epsilon = 1e-6);
        // |v| * r / iters / dt = 4 * 0.5 / 4 / 0.1 = 5, times mass 5
        assert_abs_diff_eq!(body.pending_force.y, 25.0, epsilon = 1e-4);
        let expected_torque = Vec3::new(0.0, 5.0, 0.0).cross(contact);
        assert_abs_diff_eq!(body.pending_torque.z, expected_torque.z, epsilon = 1e-4);
        // Velocity changes only at the next integration.
        assert_eq!(body.velocity.y, -4.0);
    }

    #[test]
    fn test_resolve_ignores_immovable() {
        let mut body = make_box_collider().immovable().with_velocity(Vec3::X);
        resolve_collision(&mut body, Vec3::ZERO, Vec3::Y, DT, 4, 0.05);
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.pending_force, Vec3::ZERO);
    }
}
