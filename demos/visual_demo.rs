//! Visual demo of the collision engine using macroquad
//!
//! Run with: cargo run --example visual_demo
//!
//! Hold Space to advance the simulation (press G to let it run freely instead).

use macroquad::prelude::*;
use portalphys::input::{InputState, Key, MouseState, SimulationGate};
use portalphys::math::Quat as PhysQuat;
use portalphys::math::Vec3 as PhysVec3;
use portalphys::{make_box_collider, ColliderHandle, World, WorldConfig};

const WINDOW_WIDTH: f32 = 1000.0;
const WINDOW_HEIGHT: f32 = 700.0;

const GRID: usize = 3;
const SPACING: f32 = 2.05;

/// macroquad keys forwarded into the simulation's input snapshot
const KEY_MAP: [(KeyCode, Key); 8] = [
    (KeyCode::Space, Key::Space),
    (KeyCode::Enter, Key::Enter),
    (KeyCode::LeftShift, Key::LeftShift),
    (KeyCode::R, Key::R),
    (KeyCode::Left, Key::Left),
    (KeyCode::Right, Key::Right),
    (KeyCode::Up, Key::Up),
    (KeyCode::Down, Key::Down),
];

fn window_conf() -> Conf {
    Conf {
        window_title: "portalphys - Visual Demo".to_owned(),
        window_width: WINDOW_WIDTH as i32,
        window_height: WINDOW_HEIGHT as i32,
        ..Default::default()
    }
}

fn to_screen_space(v: PhysVec3) -> Vec3 {
    vec3(v.x, v.y, v.z)
}

fn sample_input() -> InputState {
    let mut input = InputState::new();
    for (code, key) in KEY_MAP {
        if is_key_down(code) {
            input.press(key);
        }
    }
    let (x, y) = mouse_position();
    let delta = mouse_delta_position();
    input.mouse = MouseState {
        position: [x, y],
        delta: [delta.x, delta.y],
        left: is_mouse_button_down(MouseButton::Left),
        right: is_mouse_button_down(MouseButton::Right),
    };
    input
}

fn build_scene(gate: SimulationGate) -> (World, Vec<ColliderHandle>) {
    let config = WorldConfig::default()
        .with_gravity(PhysVec3::new(0.0, -10.0, 0.0))
        .with_gate(gate);
    let mut world = World::new(config);

    world.insert(
        make_box_collider()
            .with_scale(PhysVec3::new(16.0, 1.0, 16.0))
            .with_position(PhysVec3::new(0.0, -0.5, 0.0))
            .immovable(),
    );

    let mut cubes = Vec::new();
    let offset = (GRID - 1) as f32 * SPACING * 0.5;
    for i in 0..GRID {
        for j in 0..GRID {
            for k in 0..GRID {
                let position = PhysVec3::new(
                    i as f32 * SPACING - offset,
                    1.0 + j as f32 * SPACING,
                    k as f32 * SPACING - offset,
                );
                cubes.push(world.insert(make_box_collider().with_position(position)));
            }
        }
    }

    // A tilted cube dropped onto the top of the stack
    cubes.push(
        world.insert(
            make_box_collider()
                .with_position(PhysVec3::new(0.3, 1.0 + GRID as f32 * SPACING + 1.0, 0.2))
                .with_rotation(PhysQuat::from_axis_angle(PhysVec3::new(1.0, 0.0, 1.0), 0.6))
                .with_scale(PhysVec3::new(1.5, 0.5, 1.0)),
        ),
    );

    (world, cubes)
}

/// Draws the twelve edges of a box hull given its eight world-space corners
fn draw_box_edges(corners: &[PhysVec3], color: Color) {
    if corners.len() != 8 {
        return;
    }
    // Corner `i` has its x, y and z signs in bits 0, 1 and 2.
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                draw_line_3d(
                    to_screen_space(corners[i]),
                    to_screen_space(corners[i | bit]),
                    color,
                );
            }
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut gate = SimulationGate::WhileHeld(Key::Space);
    let (mut world, mut cubes) = build_scene(gate);
    let mut corners = Vec::with_capacity(8);
    let mut contacts = Vec::new();

    let dt = 1.0 / 60.0;
    let mut yaw: f32 = 0.6;
    let mut pitch: f32 = 0.45;
    let distance = 22.0;

    loop {
        let input = sample_input();

        if is_key_pressed(KeyCode::G) {
            gate = match gate {
                SimulationGate::Always => SimulationGate::WhileHeld(Key::Space),
                SimulationGate::WhileHeld(_) => SimulationGate::Always,
            };
            world.set_gate(gate);
        }
        if is_key_pressed(KeyCode::R) {
            (world, cubes) = build_scene(gate);
            contacts.clear();
        }

        // Orbit with the arrow keys or by dragging with the right button
        if input.is_held(Key::Left) {
            yaw -= 1.5 * dt;
        }
        if input.is_held(Key::Right) {
            yaw += 1.5 * dt;
        }
        if input.is_held(Key::Up) {
            pitch = (pitch + dt).min(1.4);
        }
        if input.is_held(Key::Down) {
            pitch = (pitch - dt).max(0.05);
        }
        if input.mouse.right {
            yaw += input.mouse.delta[0] * 2.0;
            pitch = (pitch - input.mouse.delta[1] * 2.0).clamp(0.05, 1.4);
        }

        if let Ok(Some(report)) = world.frame(&input, dt) {
            contacts = report.contacts;
        }

        // === DRAWING ===
        clear_background(Color::from_rgba(25, 25, 35, 255));

        set_camera(&Camera3D {
            position: vec3(
                distance * pitch.cos() * yaw.cos(),
                distance * pitch.sin(),
                distance * pitch.cos() * yaw.sin(),
            ),
            up: vec3(0.0, 1.0, 0.0),
            target: vec3(0.0, 2.0, 0.0),
            ..Default::default()
        });

        draw_grid(32, 1.0, DARKGRAY, Color::from_rgba(45, 45, 55, 255));

        for (index, collider) in world.colliders().iter().enumerate() {
            collider.world_points(&mut corners);
            let color = if !collider.is_movable {
                GRAY
            } else if contacts.iter().any(|e| e.pair.a == index || e.pair.b == index) {
                ORANGE
            } else {
                SKYBLUE
            };
            draw_box_edges(&corners, color);
        }

        for event in &contacts {
            draw_sphere(to_screen_space(event.contact.point_a), 0.06, None, RED);
            draw_line_3d(
                to_screen_space(event.contact.point_a),
                to_screen_space(event.contact.point_a + event.contact.normal * 0.5),
                YELLOW,
            );
        }

        // === UI ===
        set_default_camera();
        draw_text("portalphys Visual Demo", 10.0, 25.0, 28.0, WHITE);
        draw_text(
            &format!("Cubes: {}  Steps: {}  t = {:.2}s", cubes.len(), world.steps(), world.time()),
            10.0,
            50.0,
            20.0,
            LIGHTGRAY,
        );
        draw_text(
            &format!("Contacts: {}", contacts.len()),
            10.0,
            70.0,
            20.0,
            LIGHTGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 90.0, 20.0, LIGHTGRAY);

        let gate_text = match gate {
            SimulationGate::Always => "Running [G] to gate on Space",
            SimulationGate::WhileHeld(_) => "Hold [Space] to step, [G] to run freely",
        };
        draw_text(gate_text, 10.0, 115.0, 20.0, GOLD);

        draw_text(
            "Controls: [Space] Step | [G] Gate | [R] Reset | [Arrows / Right-drag] Orbit",
            10.0,
            WINDOW_HEIGHT - 10.0,
            16.0,
            GRAY,
        );

        next_frame().await
    }
}
