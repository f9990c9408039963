//! Per-frame input snapshot.
//!
//! The host application samples its windowing layer once per frame and hands the
//! result to [`World::frame`](crate::World::frame). Nothing here talks to a real device.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys the simulation and demos care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    Enter,
    Escape,
    LeftShift,
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    Up,
    Down,
    Left,
    Right,
}

/// Mouse state in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseState {
    pub position: [f32; 2],
    /// Movement since the previous snapshot
    pub delta: [f32; 2],
    pub left: bool,
    pub right: bool,
}

/// Keys held down and mouse state for one frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub held: HashSet<Key>,
    pub mouse: MouseState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`InputState::press`]
    pub fn with_key(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Decides whether a frame advances the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationGate {
    /// Step every frame
    #[default]
    Always,
    /// Step only while the key is held
    WhileHeld(Key),
}

impl SimulationGate {
    pub fn is_open(&self, input: &InputState) -> bool {
        match *self {
            SimulationGate::Always => true,
            SimulationGate::WhileHeld(key) => input.is_held(key),
        }
    }
}
