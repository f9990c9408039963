use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::collision::{CollisionPair, ContactEvent, MprResult, MprScratch, MPR_MAX_ITERATIONS};
use crate::dynamics::{integrate, resolve_collision, Collider};
use crate::error::{ConfigError, SimulationError};
use crate::input::{InputState, SimulationGate};
use crate::math::Vec3;

/// Configuration for the physics world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Acceleration applied to every movable body before each step. Zero by default:
    /// callers usually accumulate their own forces.
    pub gravity: Vec3,
    /// Collision passes per step
    pub iterations: usize,
    /// Distance a body is moved out of an overlap on each hit
    pub push_out: f32,
    /// Cap on each MPR phase
    pub mpr_max_iterations: usize,
    /// When [`World::frame`] is allowed to step
    pub gate: SimulationGate,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            iterations: 4,
            push_out: 0.05,
            mpr_max_iterations: MPR_MAX_ITERATIONS,
            gate: SimulationGate::Always,
        }
    }
}

impl WorldConfig {
    /// Parses a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.mpr_max_iterations == 0 {
            return Err(ConfigError::ZeroMprIterations);
        }
        if !self.push_out.is_finite() || self.push_out < 0.0 {
            return Err(ConfigError::InvalidPushOut(self.push_out));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity);
        }
        Ok(())
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_gate(mut self, gate: SimulationGate) -> Self {
        self.gate = gate;
        self
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// MPR queries run, summed over all passes
    pub pairs_tested: usize,
    /// Every hit, in detection order
    pub contacts: Vec<ContactEvent>,
    /// Queries that ran out of iterations and were treated as separated
    pub inconclusive: usize,
}

/// Advances `colliders` by `dt`: integrates every collider once, then runs
/// `config.iterations` collision passes over all pairs.
pub fn run_simulation(colliders: &mut [Collider], dt: f32, config: &WorldConfig) -> StepReport {
    run_simulation_with(colliders, dt, config, &mut MprScratch::new())
}

/// [`run_simulation`] reusing caller-owned MPR buffers
pub fn run_simulation_with(
    colliders: &mut [Collider],
    dt: f32,
    config: &WorldConfig,
    scratch: &mut MprScratch,
) -> StepReport {
    debug_assert!(dt > 0.0, "timestep must be positive");

    for collider in colliders.iter_mut() {
        integrate(collider, dt);
    }

    let mut report = StepReport::default();
    for iteration in 0..config.iterations {
        for pair in CollisionPair::all(colliders.len()) {
            let (a, b) = pair_mut(colliders, pair);
            if !a.is_movable && !b.is_movable {
                continue;
            }

            report.pairs_tested += 1;
            let result = scratch.check(
                a.hull.points(),
                &a.world_transform(),
                b.hull.points(),
                &b.world_transform(),
                config.mpr_max_iterations,
            );

            match result {
                MprResult::Intersecting(contact) => {
                    trace!(a = pair.a, b = pair.b, normal = ?contact.normal, "contact");
                    // The normal points from A to B, so A is pushed back along it.
                    resolve_collision(
                        a,
                        contact.point_a,
                        -contact.normal,
                        dt,
                        config.iterations,
                        config.push_out,
                    );
                    resolve_collision(
                        b,
                        contact.point_b,
                        contact.normal,
                        dt,
                        config.iterations,
                        config.push_out,
                    );
                    report.contacts.push(ContactEvent {
                        pair,
                        iteration,
                        contact,
                    });
                }
                MprResult::Inconclusive { .. } => {
                    debug!(a = pair.a, b = pair.b, "MPR did not converge");
                    report.inconclusive += 1;
                }
                MprResult::Separated { .. } => {}
            }
        }
    }

    report
}

fn pair_mut(colliders: &mut [Collider], pair: CollisionPair) -> (&mut Collider, &mut Collider) {
    let (head, tail) = colliders.split_at_mut(pair.b);
    (&mut head[pair.a], &mut tail[0])
}

/// Handle to a collider stored in a [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(u32);

impl ColliderHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns a set of colliders and steps them together
#[derive(Debug, Default)]
pub struct World {
    config: WorldConfig,
    colliders: Vec<Collider>,
    scratch: MprScratch,
    /// Simulated time in seconds
    time: f32,
    steps: u64,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Adds a collider. Colliders live until the world is dropped.
    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        let handle = ColliderHandle(self.colliders.len() as u32);
        self.colliders.push(collider);
        handle
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle.index())
    }

    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle.index())
    }

    /// All colliders in insertion order
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Accumulates a force on a collider; unknown handles are ignored
    pub fn add_force(&mut self, handle: ColliderHandle, force: Vec3) {
        if let Some(collider) = self.collider_mut(handle) {
            collider.add_force(force);
        }
    }

    pub fn add_torque(&mut self, handle: ColliderHandle, torque: Vec3) {
        if let Some(collider) = self.collider_mut(handle) {
            collider.add_torque(torque);
        }
    }

    pub fn add_force_at_location(&mut self, handle: ColliderHandle, force: Vec3, point: Vec3) {
        if let Some(collider) = self.collider_mut(handle) {
            collider.add_force_at_location(force, point);
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    pub fn set_gate(&mut self, gate: SimulationGate) {
        self.config.gate = gate;
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Steps the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) -> Result<StepReport, SimulationError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidTimestep(dt));
        }

        let _span = debug_span!("step", step = self.steps, dt).entered();

        let gravity = self.config.gravity;
        if !gravity.is_zero() {
            for collider in self.colliders.iter_mut().filter(|c| c.is_movable) {
                collider.add_force(gravity * collider.mass);
            }
        }

        let report = run_simulation_with(&mut self.colliders, dt, &self.config, &mut self.scratch);

        if report.inconclusive > 0 {
            warn!(
                count = report.inconclusive,
                "collision queries hit the iteration cap, treated as separated"
            );
        }
        debug!(
            pairs_tested = report.pairs_tested,
            contacts = report.contacts.len(),
            "step finished"
        );

        self.time += dt;
        self.steps += 1;
        Ok(report)
    }

    /// Steps once if the configured gate is open for this frame's input
    pub fn frame(
        &mut self,
        input: &InputState,
        dt: f32,
    ) -> Result<Option<StepReport>, SimulationError> {
        if !self.config.gate.is_open(input) {
            trace!("simulation gate closed");
            return Ok(None);
        }
        self.step(dt).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::make_box_collider;
    use crate::input::Key;
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_world_creation() {
        let world = World::default();
        assert!(world.is_empty());
        assert_eq!(world.time(), 0.0);
        assert_eq!(world.config().iterations, 4);
        assert_eq!(world.gravity(), Vec3::ZERO);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut world = World::default();
        let a = world.insert(make_box_collider());
        let b = world.insert(make_box_collider().with_position(Vec3::new(5.0, 0.0, 0.0)));

        assert_eq!(world.len(), 2);
        assert_eq!(a.index(), 0);
        assert_eq!(world.collider(b).map(|c| c.position.x), Some(5.0));
        assert!(world.collider(ColliderHandle(7)).is_none());
    }

    #[test]
    fn test_invalid_timestep() {
        let mut world = World::default();
        world.insert(make_box_collider());

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                world.step(dt),
                Err(SimulationError::InvalidTimestep(_))
            ));
        }
        assert_eq!(world.steps(), 0);
    }

    #[test]
    fn test_forces_through_world() {
        let mut world = World::default();
        let h = world.insert(make_box_collider());
        world.add_force(h, Vec3::new(50.0, 0.0, 0.0));

        world.step(0.1).unwrap();

        let c = world.collider(h).unwrap();
        assert_abs_diff_eq!(c.velocity.x, 1.0, epsilon = 1e-6);
        assert_eq!(c.pending_force, Vec3::ZERO);
        assert_abs_diff_eq!(world.time(), 0.1);
    }

    #[test]
    fn test_gravity_scales_with_mass() {
        let mut world = World::new(WorldConfig::default().with_gravity(Vec3::new(0.0, -10.0, 0.0)));
        let light = world.insert(make_box_collider().with_mass(1.0));
        let heavy = world.insert(
            make_box_collider()
                .with_mass(50.0)
                .with_position(Vec3::new(10.0, 0.0, 0.0)),
        );
        let fixed = world.insert(make_box_collider().immovable().with_position(Vec3::new(-10.0, 0.0, 0.0)));

        world.step(0.1).unwrap();

        assert_abs_diff_eq!(world.collider(light).unwrap().velocity.y, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(world.collider(heavy).unwrap().velocity.y, -1.0, epsilon = 1e-5);
        assert_eq!(world.collider(fixed).unwrap().pending_force, Vec3::ZERO);
    }

    #[test]
    fn test_overlapping_pair_is_pushed_apart() {
        let mut world = World::default();
        let a = world.insert(make_box_collider());
        let b = world.insert(make_box_collider().with_position(Vec3::new(0.5, 0.0, 0.0)));

        let report = world.step(DT).unwrap();

        // One hit per pass; each pass moves both bodies 0.05 apart.
        assert_eq!(report.contacts.len(), 4);
        assert_eq!(report.pairs_tested, 4);
        assert_abs_diff_eq!(world.collider(a).unwrap().position.x, -0.2, epsilon = 1e-4);
        assert_abs_diff_eq!(world.collider(b).unwrap().position.x, 0.7, epsilon = 1e-4);
        for event in &report.contacts {
            assert_eq!(event.pair, CollisionPair::new(0, 1));
            assert!(event.contact.normal.x > 0.99);
        }
    }

    #[test]
    fn test_immovable_body_is_not_pushed() {
        let mut world = World::default();
        let a = world.insert(make_box_collider());
        let wall = world.insert(
            make_box_collider()
                .immovable()
                .with_position(Vec3::new(0.5, 0.0, 0.0)),
        );

        world.step(DT).unwrap();

        assert_abs_diff_eq!(world.collider(a).unwrap().position.x, -0.2, epsilon = 1e-4);
        assert_eq!(world.collider(wall).unwrap().position, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_forces_on_immovable_body_do_not_pile_up() {
        let mut world = World::default();
        let wall = world.insert(make_box_collider().immovable());

        for _ in 0..1000 {
            world.add_force(wall, Vec3::new(0.0, -50.0, 0.0));
            world.add_torque(wall, Vec3::X);
            world.step(DT).unwrap();
        }

        let c = world.collider(wall).unwrap();
        assert_eq!(c.pending_force, Vec3::ZERO);
        assert_eq!(c.pending_torque, Vec3::ZERO);
        assert_eq!(c.position, Vec3::ZERO);
    }

    #[test]
    fn test_immovable_pairs_are_skipped() {
        let mut world = World::default();
        world.insert(make_box_collider().immovable());
        world.insert(make_box_collider().immovable());

        let report = world.step(DT).unwrap();
        assert_eq!(report.pairs_tested, 0);
        assert!(report.contacts.is_empty());
    }

    #[test]
    fn test_moving_body_gets_restitution_force() {
        let mut colliders = vec![
            make_box_collider().with_velocity(Vec3::new(0.0, -3.0, 0.0)),
            make_box_collider()
                .immovable()
                .with_position(Vec3::new(0.0, -0.9, 0.0)),
        ];

        let report = run_simulation(&mut colliders, DT, &WorldConfig::default());

        assert!(!report.contacts.is_empty());
        // Upward force waiting for the next integration
        assert!(colliders[0].pending_force.y > 0.0);
        assert!(colliders[0].position.y > -3.0 * DT);
    }

    #[test]
    fn test_frame_respects_gate() {
        let mut world =
            World::new(WorldConfig::default().with_gate(SimulationGate::WhileHeld(Key::Space)));
        world.insert(make_box_collider().with_velocity(Vec3::X));

        assert_eq!(world.frame(&InputState::new(), DT), Ok(None));
        assert_eq!(world.steps(), 0);

        let held = InputState::new().with_key(Key::Space);
        assert!(world.frame(&held, DT).unwrap().is_some());
        assert_eq!(world.steps(), 1);

        world.set_gate(SimulationGate::Always);
        assert!(world.frame(&InputState::new(), DT).unwrap().is_some());
    }

    #[test]
    fn test_config_from_json() {
        let config = WorldConfig::from_json_str(
            r#"{ "gravity": { "x": 0.0, "y": -9.81, "z": 0.0 }, "iterations": 8 }"#,
        )
        .unwrap();
        assert_eq!(config.iterations, 8);
        assert_eq!(config.gravity.y, -9.81);
        assert_eq!(config.push_out, 0.05);
        assert_eq!(config.gate, SimulationGate::Always);

        let gated = WorldConfig::from_json_str(r#"{ "gate": { "WhileHeld": "Space" } }"#).unwrap();
        assert_eq!(gated.gate, SimulationGate::WhileHeld(Key::Space));
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "iterations": 0 }"#),
            Err(ConfigError::ZeroIterations)
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "push_out": -1.0 }"#),
            Err(ConfigError::InvalidPushOut(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "mpr_max_iterations": 0 }"#),
            Err(ConfigError::ZeroMprIterations)
        ));
        assert!(matches!(
            WorldConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(WorldConfig::default().validate().is_ok());
    }
}
