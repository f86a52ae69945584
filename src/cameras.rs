/*
MIT License

Copyright (c) 2021, 2022, 2024, 2025, 2026 Vincent Hiribarren

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, PerspectiveFov, Rad, SquareMatrix, vec3};
use cgmath::{Point3, Vector3};
use log::warn;
use std::collections::BTreeSet;
use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::LazyLock;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::Dimensions;

static SWITCH_Z_AXIS: LazyLock<Matrix4<f32>> =
    LazyLock::new(|| Matrix4::from_nonuniform_scale(1., 1., -1.));
static TO_WEBGPU_NDCS: LazyLock<Matrix4<f32>> = LazyLock::new(|| {
    Matrix4::from_translation(vec3(0., 0., 0.5)) * Matrix4::from_nonuniform_scale(1., 1., 0.5)
});

pub struct CameraView {
    pub eye: Point3<f32>,
    pub center: Point3<f32>,
    pub up: Vector3<f32>,
}

impl CameraView {
    #[must_use]
    pub fn calc_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_lh(self.eye, self.center, self.up)
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            eye: Point3 {
                x: 0.0,
                y: 0.0,
                z: -10.0,
            },
            center: Point3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            up: Vector3 {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
        }
    }
}

pub trait CameraProjection {
    fn calc_projection(&self) -> Matrix4<f32>;
    fn resize_screen(&mut self, dimensions: Dimensions);
}

pub struct PerspectiveCameraConfig {
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCameraConfig {
    fn default() -> Self {
        Self {
            fovy: PI / 4.0,
            aspect: 16. / 9.,
            near: 0.1,
            far: 1_000.0,
        }
    }
}

impl CameraProjection for PerspectiveCameraConfig {
    fn calc_projection(&self) -> Matrix4<f32> {
        Matrix4::from(PerspectiveFov {
            fovy: Rad(self.fovy),
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        })
    }
    fn resize_screen(&mut self, dimensions: Dimensions) {
        if let Some(ratio) = dimensions.surface_ratio() {
            self.aspect = ratio;
        }
    }
}

pub struct Camera {
    projection: Box<dyn CameraProjection>,
    view: CameraView,
    projection_cache: Matrix4<f32>,
    view_cache: Matrix4<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            CameraView::default(),
            Box::new(PerspectiveCameraConfig::default()),
        )
    }
}

impl Camera {
    #[must_use]
    pub fn new(view: CameraView, projection: Box<dyn CameraProjection>) -> Self {
        let view_cache = view.calc_view_matrix();
        let projection_cache = projection.calc_projection();
        Self {
            projection,
            view,
            projection_cache,
            view_cache,
        }
    }
    fn update_view_cache(&mut self) {
        self.view_cache = self.view.calc_view_matrix();
    }
    fn update_projection_cache(&mut self) {
        self.projection_cache = self.projection.calc_projection();
    }
    pub fn set_view(&mut self, view: CameraView) {
        self.view = view;
        self.update_view_cache();
    }
    pub fn resize_screen(&mut self, dimensions: Dimensions) {
        self.projection.resize_screen(dimensions);
        self.update_projection_cache();
    }
    #[must_use]
    pub fn get_camera_matrix(&self) -> Matrix4<f32> {
        (*TO_WEBGPU_NDCS) * self.projection_cache * (*SWITCH_Z_AXIS) * self.view_cache
    }
    #[must_use]
    pub fn eye_position(&self) -> Point3<f32> {
        self.view.eye
    }
    /// Projects a world point into WebGPU NDCs, where x and y are in [-1, 1]
    /// and z in [0, 1]. Returns None for points behind the eye.
    #[must_use]
    pub fn world_to_ndc(&self, point: Point3<f32>) -> Option<Point3<f32>> {
        let clip = self.get_camera_matrix() * point.to_homogeneous();
        if clip.w <= 0.0 {
            return None;
        }
        Some(Point3::from_vec(clip.truncate() / clip.w))
    }
    /// Inverse of [`Self::world_to_ndc`], mapping a NDC point back to world
    /// space. NDC z selects the depth, 0 being the near plane and 1 the far
    /// plane.
    #[must_use]
    pub fn ndc_to_world(&self, ndc: Point3<f32>) -> Option<Point3<f32>> {
        let inverse = self.get_camera_matrix().invert()?;
        let unprojected = inverse * ndc.to_homogeneous();
        if unprojected.w == 0.0 {
            return None;
        }
        Some(Point3::from_vec(unprojected.truncate() / unprojected.w))
    }
}

/// Camera rig turning around a fixed target, in the manner of a turntable.
/// Dragging with the left mouse button orbits, the wheel dollies in and out,
/// arrow keys orbit and PageUp/PageDown dolly.
pub struct OrbitCamera {
    pub controled_camera: Camera,
    target: Point3<f32>,
    radius: f32,
    yaw: f32,
    pitch: f32,
    dragging: bool,
    enabled_keys: BTreeSet<KeyCode>,
    key_speed: f32,
    rotation_speed: f32,
}

impl OrbitCamera {
    const DEFAULT_KEY_SPEED: f32 = 0.03;
    const DEFAULT_ROTATION_SPEED: f32 = 1.0 / 500.0;
    const SPEED_MULTIPLICATOR: f32 = 10.0;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;
    const MIN_RADIUS: f32 = 1.0;
    const MAX_RADIUS: f32 = 30.0;
    const WHEEL_DOLLY_STEP: f32 = 0.5;
    const WHEEL_PIXELS_PER_LINE: f32 = 40.0;

    #[must_use]
    pub fn new(camera: Camera, target: Point3<f32>) -> Self {
        let offset = camera.eye_position() - target;
        let radius = offset.magnitude().max(Self::MIN_RADIUS);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let mut orbit = Self {
            controled_camera: camera,
            target,
            radius,
            yaw,
            pitch,
            dragging: false,
            enabled_keys: BTreeSet::new(),
            key_speed: Self::DEFAULT_KEY_SPEED,
            rotation_speed: Self::DEFAULT_ROTATION_SPEED,
        };
        orbit.apply_view();
        orbit
    }

    #[must_use]
    pub fn get_camera_matrix(&self) -> Matrix4<f32> {
        self.controled_camera.get_camera_matrix()
    }

    pub fn update_screen_size(&mut self, dimensions: Dimensions) {
        self.controled_camera.resize_screen(dimensions);
    }

    fn apply_view(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let eye =
            self.target + vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.radius;
        self.controled_camera.set_view(CameraView {
            eye,
            center: self.target,
            up: Vector3::unit_y(),
        });
    }

    fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.apply_view();
    }

    fn dolly(&mut self, delta: f32) {
        self.radius = (self.radius + delta).clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
        self.apply_view();
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn mouse_event_listener(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.dragging {
                self.orbit(
                    -delta.0 as f32 * self.rotation_speed,
                    delta.1 as f32 * self.rotation_speed,
                );
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn window_event_listener(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => {
                        position.y as f32 / Self::WHEEL_PIXELS_PER_LINE
                    }
                };
                self.dolly(-lines * Self::WHEEL_DOLLY_STEP);
            }
            _ => {}
        }
    }

    pub fn keyboard_event_listener(&mut self, input: &KeyEvent) {
        let PhysicalKey::Code(key_code) = input.physical_key else {
            warn!("Strange key pushed");
            return;
        };
        if input.state == ElementState::Pressed {
            self.enabled_keys.insert(key_code);
        } else {
            self.enabled_keys.remove(&key_code);
        }
    }

    pub fn update_control(&mut self) {
        if self.enabled_keys.is_empty() {
            return;
        }
        let mut key_speed = self.key_speed;
        if self.enabled_keys.contains(&KeyCode::ShiftLeft)
            || self.enabled_keys.contains(&KeyCode::ShiftRight)
        {
            key_speed *= Self::SPEED_MULTIPLICATOR;
        }
        let mut yaw_delta = 0.0;
        let mut pitch_delta = 0.0;
        let mut dolly_delta = 0.0;
        for key in &self.enabled_keys {
            match *key {
                KeyCode::ArrowLeft => yaw_delta += key_speed,
                KeyCode::ArrowRight => yaw_delta -= key_speed,
                KeyCode::ArrowUp => pitch_delta += key_speed,
                KeyCode::ArrowDown => pitch_delta -= key_speed,
                KeyCode::PageUp => dolly_delta -= key_speed,
                KeyCode::PageDown => dolly_delta += key_speed,
                _ => {}
            }
        }
        if yaw_delta != 0.0 || pitch_delta != 0.0 {
            self.orbit(yaw_delta, pitch_delta);
        }
        if dolly_delta != 0.0 {
            self.dolly(dolly_delta);
        }
    }
}

impl AsRef<Camera> for OrbitCamera {
    fn as_ref(&self) -> &Camera {
        &self.controled_camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn demo_camera() -> Camera {
        Camera::new(
            CameraView {
                eye: Point3::new(3.0, 2.0, 6.0),
                center: Point3::new(0.0, 0.5, 0.0),
                up: Vector3::unit_y(),
            },
            Box::new(PerspectiveCameraConfig {
                fovy: 60.0_f32.to_radians(),
                aspect: 16.0 / 9.0,
                near: 0.1,
                far: 1000.0,
            }),
        )
    }

    #[test]
    fn looked_at_point_projects_to_ndc_center() {
        let camera = demo_camera();
        let ndc = camera.world_to_ndc(Point3::new(0.0, 0.5, 0.0)).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn ndc_round_trips_to_world() {
        let camera = demo_camera();
        let point = Point3::new(0.4, 1.2, -0.3);
        let ndc = camera.world_to_ndc(point).unwrap();
        let back = camera.ndc_to_world(ndc).unwrap();
        assert_relative_eq!(back.x, point.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, point.y, epsilon = 1e-3);
        assert_relative_eq!(back.z, point.z, epsilon = 1e-3);
    }

    #[test]
    fn point_behind_eye_does_not_project() {
        let camera = demo_camera();
        let behind = Point3::new(6.0, 4.0, 12.0);
        assert!(camera.world_to_ndc(behind).is_none());
    }

    #[test]
    fn resize_screen_changes_aspect_only_horizontally() {
        let mut camera = demo_camera();
        let point = Point3::new(1.0, 0.5, 0.0);
        let before = camera.world_to_ndc(point).unwrap();
        camera.resize_screen(Dimensions {
            width: 3200,
            height: 900,
        });
        let after = camera.world_to_ndc(point).unwrap();
        assert_relative_eq!(after.x, before.x * 0.5, epsilon = 1e-4);
        assert_relative_eq!(after.y, before.y, epsilon = 1e-4);
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let target = Point3::new(0.0, 0.5, 0.0);
        let mut orbit = OrbitCamera::new(demo_camera(), target);
        let initial = (orbit.controled_camera.eye_position() - target).magnitude();
        orbit.orbit(1.3, 0.4);
        orbit.orbit(-2.1, -0.2);
        let moved = (orbit.controled_camera.eye_position() - target).magnitude();
        assert_relative_eq!(moved, initial, epsilon = 1e-4);
    }

    #[test]
    fn orbit_initial_view_matches_wrapped_camera() {
        let target = Point3::new(0.0, 0.5, 0.0);
        let orbit = OrbitCamera::new(demo_camera(), target);
        let eye = orbit.controled_camera.eye_position();
        assert_relative_eq!(eye.x, 3.0, epsilon = 1e-4);
        assert_relative_eq!(eye.y, 2.0, epsilon = 1e-4);
        assert_relative_eq!(eye.z, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let target = Point3::new(0.0, 0.5, 0.0);
        let mut orbit = OrbitCamera::new(demo_camera(), target);
        orbit.orbit(0.0, 100.0);
        let offset = orbit.controled_camera.eye_position() - target;
        let pitch = (offset.y / offset.magnitude()).asin();
        assert!(pitch < FRAC_PI_2);
        assert_relative_eq!(pitch, OrbitCamera::PITCH_LIMIT, epsilon = 1e-3);
    }

    #[test]
    fn dolly_respects_radius_bounds() {
        let target = Point3::new(0.0, 0.5, 0.0);
        let mut orbit = OrbitCamera::new(demo_camera(), target);
        orbit.dolly(-1000.0);
        let near = (orbit.controled_camera.eye_position() - target).magnitude();
        assert_relative_eq!(near, OrbitCamera::MIN_RADIUS, epsilon = 1e-4);
        orbit.dolly(1000.0);
        let far = (orbit.controled_camera.eye_position() - target).magnitude();
        assert_relative_eq!(far, OrbitCamera::MAX_RADIUS, epsilon = 1e-4);
    }
}
