//! Application state and event loop handler.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use vitrine_core::{ndc_from_client, toggles, CoupledEffect, FrameClock, Stage};

use crate::config::ClientConfig;
use crate::panel::DebugPanel;
use crate::renderer::{camera::Camera, orbit::OrbitControls, Renderer};
use crate::scene_setup;

/// Main application state.
pub struct App {
    config: ClientConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: Option<Camera>,
    orbit: Option<OrbitControls>,
    panel: Option<DebugPanel>,
    stage: Stage,
    clock: Option<FrameClock>,
    cursor: PhysicalPosition<f64>,
    dragging: bool,
    panning: bool,
}

impl App {
    pub fn new(config: ClientConfig) -> Self {
        let stage = Stage::new(config.stage.clone());
        Self {
            config,
            window: None,
            renderer: None,
            camera: None,
            orbit: None,
            panel: None,
            stage,
            clock: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            dragging: false,
            panning: false,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("failed to create window"),
        );

        let mut renderer = pollster::block_on(Renderer::new(window.clone()))
            .expect("failed to create renderer");

        let size = window.inner_size();
        let camera = Camera::new(size.width.max(1) as f32 / size.height.max(1) as f32);
        let orbit = OrbitControls::new(self.config.orbit.clone(), &camera);
        let panel = DebugPanel::new(
            &window,
            renderer.device(),
            renderer.surface_format(),
            renderer.depth_format(),
        );

        scene_setup::populate(&mut self.stage, &mut renderer, &self.config);
        self.stage.start();

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.camera = Some(camera);
        self.orbit = Some(orbit);
        self.panel = Some(panel);
        self.clock = Some(FrameClock::new());

        tracing::info!("Window, renderer, and scene initialized");
    }

    /// Flip a toggle and route its coupled effect to the subsystem it
    /// steers.
    fn flip_toggle(&mut self, name: &str) {
        match self.stage.flip(name) {
            Ok(change) => match change.effect {
                Some(CoupledEffect::PanZoom(enabled)) => {
                    if let Some(orbit) = &mut self.orbit {
                        orbit.enable_pan = enabled;
                        orbit.enable_zoom = enabled;
                    }
                }
                Some(CoupledEffect::GlobalClipping(enabled)) => {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.set_global_clip_enabled(enabled);
                    }
                }
                None => {}
            },
            Err(err) => tracing::warn!("toggle flip failed: {err}"),
        }
    }

    fn handle_click(&mut self) {
        if self.panel.as_ref().is_some_and(DebugPanel::wants_pointer) {
            return;
        }
        let (Some(window), Some(camera)) = (&self.window, &self.camera) else {
            return;
        };
        let size = window.inner_size();
        let (ndc_x, ndc_y) = ndc_from_client(
            self.cursor.x as f32,
            self.cursor.y as f32,
            size.width.max(1) as f32,
            size.height.max(1) as f32,
        );
        if let Some(ray) = camera.pick_ray(ndc_x, ndc_y) {
            self.stage.click(&ray);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = match &mut self.clock {
            Some(clock) => clock.sample(),
            None => return,
        };

        self.stage.tick(dt);

        if self.stage.toggles.is_enabled(toggles::ORBIT_CONTROLS) {
            if let (Some(orbit), Some(camera)) = (&mut self.orbit, &mut self.camera) {
                orbit.update(dt, camera);
            }
        }

        let clicked: Vec<&'static str> = match (&mut self.panel, &self.window) {
            (Some(panel), Some(window)) => panel.run(window, &self.stage.toggles),
            _ => Vec::new(),
        };
        for name in clicked {
            self.flip_toggle(name);
        }

        let render_result = match (&mut self.renderer, &self.camera, &mut self.panel, &self.window)
        {
            (Some(renderer), Some(camera), Some(panel), Some(window)) => {
                renderer.render(&self.stage, camera, panel, window)
            }
            _ => Ok(()),
        };
        match render_result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    renderer.resize(window.inner_size());
                }
            }
            Err(e) => {
                tracing::error!("Render error: {e:?}, exiting");
                self.stage.stop();
                event_loop.exit();
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.init_window(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(panel), Some(window)) = (&mut self.panel, &self.window) {
            if panel.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                self.stage.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
                if let Some(camera) = &mut self.camera {
                    camera.set_aspect(
                        new_size.width.max(1) as f32 / new_size.height.max(1) as f32,
                    );
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
            }

            WindowEvent::MouseInput { state, button, .. } => match button {
                MouseButton::Left => match state {
                    ElementState::Pressed => {
                        self.dragging = true;
                        self.handle_click();
                    }
                    ElementState::Released => {
                        self.dragging = false;
                    }
                },
                MouseButton::Middle => {
                    self.panning = state == ElementState::Pressed;
                }
                _ => {}
            },

            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                if let Some(orbit) = &mut self.orbit {
                    orbit.zoom(steps);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if !event.state.is_pressed() {
                    return;
                }
                let slot = match event.physical_key {
                    PhysicalKey::Code(KeyCode::Digit1) => Some(0),
                    PhysicalKey::Code(KeyCode::Digit2) => Some(1),
                    PhysicalKey::Code(KeyCode::Digit3) => Some(2),
                    PhysicalKey::Code(KeyCode::Digit4) => Some(3),
                    PhysicalKey::Code(KeyCode::Digit5) => Some(4),
                    _ => None,
                };
                if let Some(slot) = slot {
                    let name = self.stage.toggles.names().nth(slot).map(str::to_string);
                    if let Some(name) = name {
                        self.flip_toggle(&name);
                    }
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            // The stage consumes the raw delta regardless of toggles.
            self.stage.pointer_moved(dx as f32, dy as f32);

            // Dragging spins the orbit camera unless the model is
            // following the pointer instead.
            let mouse_rotation = self.stage.toggles.is_enabled(toggles::MOUSE_ROTATION);
            if self.dragging && !mouse_rotation {
                if let Some(orbit) = &mut self.orbit {
                    orbit.rotate(dx as f32, dy as f32);
                }
            }
            if self.panning {
                if let (Some(orbit), Some(camera)) = (&mut self.orbit, &self.camera) {
                    orbit.pan(dx as f32, dy as f32, camera);
                }
            }
        }
    }
}
