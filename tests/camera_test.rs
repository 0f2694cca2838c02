use std::time::Duration;

use approx::assert_abs_diff_eq;
use cgmath::{Deg, Vector4};
use diorama::{
    camera::{self, Camera, CameraController, Projection, ProjectionKind},
    scene::uniforms::{self, UniformValue},
};
use winit::{event::ElementState, keyboard::KeyCode};

mod common;
use common::test_utils::Recorder;

fn looking_down_negative_z() -> Camera {
    Camera::new((0.0, 5.0, 10.0), Deg(-90.0), Deg(0.0))
}

#[test]
fn camera_looks_along_its_yaw() {
    let direction = looking_down_negative_z().direction();
    assert_abs_diff_eq!(direction.x, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(direction.y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(direction.z, -1.0, epsilon = 1e-6);
}

#[test]
fn view_matrix_moves_the_camera_to_the_origin() {
    let camera = looking_down_negative_z();
    let eye = camera.calc_matrix() * Vector4::new(0.0, 5.0, 10.0, 1.0);
    assert_abs_diff_eq!(eye.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(eye.y, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(eye.z, 0.0, epsilon = 1e-5);
}

#[test]
fn holding_w_moves_forward() {
    let mut camera = looking_down_negative_z();
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(10.0, 1.0);

    assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    controller.update(&mut camera, &mut projection, Duration::from_secs(1));

    assert_abs_diff_eq!(camera.position.z, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(camera.position.x, 0.0, epsilon = 1e-4);

    controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
    controller.update(&mut camera, &mut projection, Duration::from_secs(1));
    assert_abs_diff_eq!(camera.position.z, 0.0, epsilon = 1e-4);
}

#[test]
fn q_and_e_move_vertically() {
    let mut camera = looking_down_negative_z();
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(2.0, 1.0);

    controller.process_keyboard(KeyCode::KeyE, ElementState::Pressed);
    controller.update(&mut camera, &mut projection, Duration::from_millis(500));

    assert_abs_diff_eq!(camera.position.y, 6.0, epsilon = 1e-5);
}

#[test]
fn pitch_is_clamped_short_of_straight_up() {
    let mut camera = looking_down_negative_z();
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(1.0, 10.0);

    controller.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
    controller.update(&mut camera, &mut projection, Duration::from_secs(5));

    assert!(camera.pitch.0 < std::f32::consts::FRAC_PI_2);
    assert!(camera.pitch.0 > 1.5);
}

#[test]
fn p_and_o_switch_projection() {
    let mut camera = looking_down_negative_z();
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut controller = CameraController::new(1.0, 1.0);
    let perspective = projection.calc_matrix();

    controller.process_keyboard(KeyCode::KeyO, ElementState::Pressed);
    controller.update(&mut camera, &mut projection, Duration::ZERO);
    assert_eq!(projection.kind, ProjectionKind::Orthographic);
    assert_ne!(projection.calc_matrix(), perspective);

    controller.process_keyboard(KeyCode::KeyP, ElementState::Pressed);
    controller.update(&mut camera, &mut projection, Duration::ZERO);
    assert_eq!(projection.kind, ProjectionKind::Perspective);
    assert_eq!(projection.calc_matrix(), perspective);
}

#[test]
fn unrelated_keys_are_not_consumed() {
    let mut controller = CameraController::new(1.0, 1.0);
    assert!(!controller.process_keyboard(KeyCode::KeyZ, ElementState::Pressed));
}

#[test]
fn resize_updates_the_aspect_ratio() {
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    projection.resize(1000, 500);
    assert_abs_diff_eq!(projection.aspect(), 2.0);
}

#[test]
fn projection_maps_near_plane_to_zero_depth() {
    let projection = Projection::new(800, 800, Deg(90.0), 1.0, 100.0);
    let clip = projection.calc_matrix() * Vector4::new(0.0, 0.0, -1.0, 1.0);
    assert_abs_diff_eq!(clip.z / clip.w, 0.0, epsilon = 1e-5);
}

#[test]
fn apply_publishes_view_projection_and_position() {
    let camera = looking_down_negative_z();
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut shader = Recorder::new();

    camera::apply(&camera, &projection, &mut shader);

    assert_eq!(
        shader.uniform(uniforms::VIEW),
        Some(UniformValue::Mat4(camera.calc_matrix()))
    );
    assert_eq!(
        shader.uniform(uniforms::PROJECTION),
        Some(UniformValue::Mat4(projection.calc_matrix()))
    );
    assert_eq!(
        shader.uniform(uniforms::VIEW_POSITION),
        Some(UniformValue::Vec3((0.0, 5.0, 10.0).into()))
    );
}
