/*
MIT License

Copyright (c) 2026 Vincent Hiribarren

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

//! Textured cube resting on a floor plane. Clicking the cube makes it jump
//! and bounce back to rest, the mouse orbits the camera around it, and a
//! small text label circles over the cube.

use std::cell::RefCell;
use std::rc::Rc;

use cgmath::{Matrix4, Point3, Rad, Vector3};
use hopbox::cameras::{Camera, CameraView, OrbitCamera, PerspectiveCameraConfig};
#[cfg(feature = "egui")]
use hopbox::egui;
use hopbox::jump::JumpController;
#[cfg(feature = "egui")]
use hopbox::orbiter::LabelOrbit;
use hopbox::picking::PointerRay;
#[cfg(feature = "egui")]
use hopbox::picking::world_to_screen;
use hopbox::plugins::PluginRegistry;
#[cfg(feature = "egui")]
use hopbox::plugins::egui::EguiPlugin;
use hopbox::plugins::scene_3d::{Scene3D, SceneElements};
use hopbox::primitives::{Object3D, Shareable, Transforms, cube, plane};
use hopbox::{EventState, LaunchContext, RenderContext, RenderLoopHandler};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::window::CursorIcon;

const LIT_TEXTURE_SHADER: &str = include_str!("./shaders/lit_texture.wgsl");
const LIT_COLOR_SHADER: &str = include_str!("./shaders/lit_color.wgsl");

const CAMERA_FOVY_DEGREES: f32 = 60.0;
// The camera looks at, and turns around, a point slightly over the floor so
// both the cube and its landing spot stay framed.
const ORBIT_TARGET_HEIGHT: f32 = 0.5;
const SPIN_RAD_PER_S: f32 = 0.3;
const FLOOR_EXTENT: f32 = 10.0;
const FLOOR_COLOR: [f32; 3] = [0.016, 0.016, 0.020];
#[cfg(feature = "egui")]
const LABEL_TEXT: &str = "hopbox";
#[cfg(feature = "egui")]
const LABEL_FONT_SIZE: f32 = 16.0;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.005,
    g: 0.005,
    b: 0.007,
    a: 1.0,
};

fn cube_transform(height: f32, spin: Rad<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, height, 0.0))
        * Matrix4::from_angle_x(spin)
        * Matrix4::from_angle_y(spin)
}

pub struct BounceScenario {
    cube: Rc<RefCell<Object3D>>,
    jump: JumpController,
    #[cfg(feature = "egui")]
    label_orbit: LabelOrbit,
    pointer_position: Option<(f32, f32)>,
    click_pending: bool,
    hovering: bool,
}

impl BounceScenario {
    pub fn new(
        LaunchContext {
            draw_context,
            plugin_registry,
        }: LaunchContext,
    ) -> Self {
        draw_context.set_clear_color(Some(CLEAR_COLOR));
        let texture_shader = draw_context.create_shader_module(LIT_TEXTURE_SHADER);
        let color_shader = draw_context.create_shader_module(LIT_COLOR_SHADER);
        let orbit_target = Point3::new(0.0, ORBIT_TARGET_HEIGHT, 0.0);
        let camera = Camera::new(
            CameraView {
                eye: Point3::new(3.0, 2.0, 6.0),
                center: orbit_target,
                up: Vector3::unit_y(),
            },
            Box::new(PerspectiveCameraConfig {
                fovy: CAMERA_FOVY_DEGREES.to_radians(),
                aspect: draw_context.surface_ratio(),
                ..Default::default()
            }),
        );
        let camera = OrbitCamera::new(camera, orbit_target);
        let mut scene = Scene3D::new(draw_context);
        let cube = cube::create_cube_with_texture(
            draw_context,
            &texture_shader,
            &texture_shader,
            scene.scene_uniforms(),
        )
        .into_shareable();
        let floor = plane::create_plane_with_color(
            draw_context,
            &color_shader,
            &color_shader,
            scene.scene_uniforms(),
            FLOOR_EXTENT,
            FLOOR_COLOR,
        )
        .into_shareable();
        scene.add(cube.clone());
        scene.add(floor);
        plugin_registry.register(SceneElements { camera, scene });
        #[cfg(feature = "egui")]
        plugin_registry.register(EguiPlugin::new(draw_context));

        let jump = JumpController::default();
        cube.borrow_mut()
            .set_transform(cube_transform(jump.height(), Rad(0.0)));
        Self {
            cube,
            jump,
            #[cfg(feature = "egui")]
            label_orbit: LabelOrbit::default(),
            pointer_position: None,
            click_pending: false,
            hovering: false,
        }
    }

    fn update_hover_cursor(&mut self, hovering: bool, render_context: &RenderContext) {
        if hovering == self.hovering {
            return;
        }
        self.hovering = hovering;
        if let Some(window) = &render_context.draw_context.window {
            let icon = if hovering {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            };
            window.set_cursor(icon);
        }
    }

    #[cfg(feature = "egui")]
    fn paint_label(egui_context: &egui::Context, position: (f32, f32), pixels_per_point: f32) {
        let painter = egui_context.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("cube_label"),
        ));
        let center = egui::pos2(position.0 / pixels_per_point, position.1 / pixels_per_point);
        let galley = painter.layout_no_wrap(
            LABEL_TEXT.to_owned(),
            egui::FontId::proportional(LABEL_FONT_SIZE),
            egui::Color32::WHITE,
        );
        let text_rect = egui::Rect::from_center_size(center, galley.size());
        painter.rect_filled(
            text_rect.expand(6.0),
            egui::CornerRadius::same(4),
            egui::Color32::from_black_alpha(160),
        );
        painter.galley(text_rect.min, galley, egui::Color32::WHITE);
    }
}

impl RenderLoopHandler for BounceScenario {
    #[allow(clippy::cast_possible_truncation)]
    fn on_window_event(&mut self, event: &WindowEvent) -> EventState {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_position = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_position = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.click_pending = true;
            }
            _ => {}
        }
        EventState::default()
    }

    fn on_update(&mut self, plugin_registry: &mut PluginRegistry, render_context: &RenderContext) {
        let total_seconds = render_context.time_info.init_start.elapsed().as_secs_f32();
        let delta_seconds = render_context.time_info.processing_delta.as_secs_f32();
        let spin = Rad(SPIN_RAD_PER_S * total_seconds);
        let dimensions = render_context.draw_context.surface_dimensions();

        #[cfg(feature = "egui")]
        let label_position;
        {
            let scene_elements = plugin_registry
                .get::<SceneElements>()
                .expect("SceneElements should be registered");
            let camera: &Camera = scene_elements.camera.as_ref();

            // Hit tests run against the transform shown on the previous
            // frame, which is what the pointer was aimed at.
            let displayed = cube_transform(self.jump.height(), spin);
            let hovering = self
                .pointer_position
                .and_then(|(x, y)| PointerRay::from_pointer(x, y, dimensions, camera))
                .and_then(|ray| ray.intersect_cube(displayed, cube::CUBE_HALF_EXTENT))
                .is_some();
            if self.click_pending {
                self.click_pending = false;
                if hovering {
                    self.jump.trigger_jump();
                }
            }
            self.update_hover_cursor(hovering, render_context);

            self.jump.tick(delta_seconds);
            self.cube
                .borrow_mut()
                .set_transform(cube_transform(self.jump.height(), spin));

            #[cfg(feature = "egui")]
            {
                let anchor = Point3::new(0.0, self.jump.height(), 0.0);
                let label_world = self.label_orbit.position(anchor, total_seconds);
                label_position = world_to_screen(label_world, dimensions, camera);
            }
        }

        #[cfg(feature = "egui")]
        if let Some(position) = label_position {
            let egui_plugin = plugin_registry
                .get_mut::<EguiPlugin>()
                .expect("EguiPlugin should be registered");
            let pixels_per_point = egui_plugin.get_pixels_per_point();
            egui_plugin.draw(|egui_context| {
                Self::paint_label(egui_context, position, pixels_per_point);
            });
        }
    }
}

fn main() {
    hopbox::launch_app(|launch_context| Box::new(BounceScenario::new(launch_context)));
}
