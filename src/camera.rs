//! Camera, projection and keyboard controller.
//!
//! The camera is a position with a yaw and pitch. It publishes the `view`,
//! `projection` and `viewPosition` uniforms through [`ShaderUniforms`] like
//! any other scene state.
//!
//! Controls: `W`/`S` forward and back, `A`/`D` sideways, `Q`/`E` down and up,
//! arrow keys turn the view, `P` switches to perspective and `O` to
//! orthographic projection.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::scene::uniforms::{self, ShaderUniforms};

/// cgmath builds OpenGL clip space (z in -1..1); wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn direction(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction(), Vector3::unit_y())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub kind: ProjectionKind,
    aspect: f32,
    fovy: Rad<f32>,
    /// Half the height of the orthographic view volume.
    ortho_half_height: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            kind: ProjectionKind::Perspective,
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            ortho_half_height: 10.0,
            znear,
            zfar,
        }
    }

    pub fn with_kind(mut self, kind: ProjectionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_ortho_half_height(mut self, half_height: f32) -> Self {
        self.ortho_half_height = half_height;
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let projection = match self.kind {
            ProjectionKind::Perspective => perspective(self.fovy, self.aspect, self.znear, self.zfar),
            ProjectionKind::Orthographic => {
                let h = self.ortho_half_height;
                let w = h * self.aspect;
                cgmath::ortho(-w, w, -h, h, self.znear, self.zfar)
            }
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

/// Publishes the camera's `view`, `projection` and `viewPosition` uniforms.
pub fn apply<U>(camera: &Camera, projection: &Projection, shader: &mut U)
where
    U: ShaderUniforms + ?Sized,
{
    shader.set_mat4(uniforms::VIEW, camera.calc_matrix());
    shader.set_mat4(uniforms::PROJECTION, projection.calc_matrix());
    let position = camera.position;
    shader.set_vec3(
        uniforms::VIEW_POSITION,
        Vector3::new(position.x, position.y, position.z),
    );
}

/// Keyboard camera controller.
#[derive(Debug, Default)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    turn_left: f32,
    turn_right: f32,
    turn_up: f32,
    turn_down: f32,
    requested_projection: Option<ProjectionKind>,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// `speed` is in units per second, `sensitivity` in radians per second.
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            ..Default::default()
        }
    }

    /// Returns whether the event was a key the controller consumes.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.process_keyboard(*key, *state),
            _ => false,
        }
    }

    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed {
            1.0
        } else {
            0.0
        };
        match key {
            KeyCode::KeyW => self.amount_forward = amount,
            KeyCode::KeyS => self.amount_backward = amount,
            KeyCode::KeyA => self.amount_left = amount,
            KeyCode::KeyD => self.amount_right = amount,
            KeyCode::KeyE => self.amount_up = amount,
            KeyCode::KeyQ => self.amount_down = amount,
            KeyCode::ArrowLeft => self.turn_left = amount,
            KeyCode::ArrowRight => self.turn_right = amount,
            KeyCode::ArrowUp => self.turn_up = amount,
            KeyCode::ArrowDown => self.turn_down = amount,
            KeyCode::KeyP if state == ElementState::Pressed => {
                self.requested_projection = Some(ProjectionKind::Perspective)
            }
            KeyCode::KeyO if state == ElementState::Pressed => {
                self.requested_projection = Some(ProjectionKind::Orthographic)
            }
            KeyCode::KeyP | KeyCode::KeyO => (),
            _ => return false,
        }
        true
    }

    pub fn update(&mut self, camera: &mut Camera, projection: &mut Projection, dt: Duration) {
        let dt = dt.as_secs_f32();

        if let Some(kind) = self.requested_projection.take() {
            if projection.kind != kind {
                log::info!("Switching to {kind:?} projection");
                projection.kind = kind;
            }
        }

        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        camera.position += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;
        camera.position.y += (self.amount_up - self.amount_down) * self.speed * dt;

        camera.yaw += Rad(self.turn_right - self.turn_left) * self.sensitivity * dt;
        camera.pitch += Rad(self.turn_up - self.turn_down) * self.sensitivity * dt;
        camera.pitch.0 = camera.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2);
    }
}
