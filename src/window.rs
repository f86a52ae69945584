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

use std::sync::Arc;

use log::{error, info, warn};
use pollster::FutureExt;
use web_time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::draw_context::DrawContext;
use crate::plugins::PluginRegistry;
use crate::render_loop::{
    EventState, LaunchContext, RenderContext, RenderLoopBuilder, RenderLoopHandler, TimeInfo,
};

pub(crate) fn init_event_loop(builder: Box<RenderLoopBuilder>) {
    let event_loop = EventLoop::new().expect("Event loop should be buildable");
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut window_app = WindowApp::new(builder);
    if let Err(err) = event_loop.run_app(&mut window_app) {
        error!("Event loop stopped with an error: {err}");
    }
}

struct WindowApp {
    builder: Box<RenderLoopBuilder>,
    state: Option<AppState>,
}

impl WindowApp {
    fn new(builder: Box<RenderLoopBuilder>) -> Self {
        Self {
            builder,
            state: None,
        }
    }
}

struct AppState {
    window: Arc<Window>,
    draw_context: DrawContext,
    plugin_registry: PluginRegistry,
    render_handler: Box<dyn RenderLoopHandler>,
    time_info: TimeInfo,
    last_draw_instant: Instant,
}

impl AppState {
    /// Window events go to plugins first, most recently registered first, and
    /// only reach the scenario handler when no plugin marked them processed.
    fn dispatch_window_event(&mut self, event: &WindowEvent) -> EventState {
        for plugin in self.plugin_registry.iter_mut_rev() {
            let event_state = plugin.on_window_event(event);
            if event_state.processed {
                return event_state;
            }
        }
        self.render_handler.on_window_event(event)
    }

    fn render_frame(&mut self) {
        let now = Instant::now();
        self.time_info.processing_delta = now - self.last_draw_instant;
        self.last_draw_instant = now;
        let Self {
            draw_context,
            plugin_registry,
            render_handler,
            time_info,
            ..
        } = self;
        let render_context = RenderContext {
            time_info,
            draw_context,
            _private: (),
        };
        render_handler.on_update(plugin_registry, &render_context);
        let render_result = draw_context.render_scene(|render_pass| {
            let mut render_pass = render_pass.forget_lifetime();
            for plugin in plugin_registry.iter_mut() {
                plugin.on_render(&render_context, &mut render_pass);
            }
            render_handler.on_render(&render_context, &mut render_pass);
        });
        if let Err(err) = render_result {
            warn!("Frame dropped: {err}");
        }
    }
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        info!("Creating window and graphics context");
        let window_attributes = Window::default_attributes().with_title(env!("CARGO_PKG_NAME"));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("Window should be buildable"),
        );
        let mut draw_context = DrawContext::new(Some(Arc::clone(&window)), None)
            .block_on()
            .expect("Graphics context should be initializable");
        let mut plugin_registry = PluginRegistry::default();
        let render_handler = (self.builder)(LaunchContext {
            draw_context: &mut draw_context,
            plugin_registry: &mut plugin_registry,
        });
        self.state = Some(AppState {
            window,
            draw_context,
            plugin_registry,
            render_handler,
            time_info: TimeInfo::default(),
            last_draw_instant: Instant::now(),
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                info!("Closing app");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event: ref key_event,
                ..
            } => {
                if matches!(key_event.physical_key, PhysicalKey::Code(KeyCode::Escape))
                    && key_event.state == ElementState::Pressed
                {
                    info!("Closing app");
                    event_loop.exit();
                    return;
                }
                state.dispatch_window_event(&event);
                // Key state tracking must see every transition, even when a
                // plugin processed the event, or keys would remain stuck.
                for plugin in state.plugin_registry.iter_mut() {
                    plugin.on_keyboard_event(key_event);
                }
                state.render_handler.on_keyboard_event(key_event);
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    state.draw_context.resize(size.width, size.height);
                    for plugin in state.plugin_registry.iter_mut() {
                        plugin.on_resize(&state.draw_context);
                    }
                    state.render_handler.on_resize(&state.draw_context);
                }
            }
            WindowEvent::RedrawRequested => {
                state.render_frame();
                if state.render_handler.is_finished() {
                    event_loop.exit();
                }
            }
            event => {
                state.dispatch_window_event(&event);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        for plugin in state.plugin_registry.iter_mut() {
            plugin.on_mouse_event(&event);
        }
        state.render_handler.on_mouse_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }
}
