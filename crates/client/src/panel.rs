//! Debug action panel, rendered with egui on top of the scene.
//!
//! One button per toggle, mirroring the demo's control panel. The panel
//! reports which toggles were clicked this frame; applying the flips and
//! their coupled effects is the app's job.

use egui::ViewportId;
use egui_wgpu::ScreenDescriptor;
use winit::{event::WindowEvent, window::Window};

use vitrine_core::{toggles, ToggleRegistry};

/// Button labels paired with the toggle each one flips.
const ACTIONS: [(&str, &str); 5] = [
    ("Cut cube", toggles::CUT_PLANE),
    ("Cube mouse rotation", toggles::MOUSE_ROTATION),
    ("Buttons animation", toggles::BUTTON_ANIMATION),
    ("Cube rotation", toggles::ROTATION),
    ("Orbit controls", toggles::ORBIT_CONTROLS),
];

pub struct DebugPanel {
    context: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
}

impl DebugPanel {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let context = egui::Context::default();
        let state = egui_winit::State::new(
            context.clone(),
            ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(device, surface_format, Some(depth_format), 1, false);

        Self {
            context,
            state,
            renderer,
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
        }
    }

    /// Feed a window event to egui. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Whether the pointer is currently over the panel. Scene picking
    /// ignores clicks the panel wants.
    pub fn wants_pointer(&self) -> bool {
        self.context.wants_pointer_input()
    }

    /// Build this frame's UI and return the toggles clicked.
    pub fn run(&mut self, window: &Window, toggles: &ToggleRegistry) -> Vec<&'static str> {
        let raw_input = self.state.take_egui_input(window);
        let mut clicked = Vec::new();

        let output = self.context.run(raw_input, |ctx| {
            egui::Window::new("Controls")
                .default_pos([10.0, 10.0])
                .resizable(false)
                .show(ctx, |ui| {
                    for (label, name) in ACTIONS {
                        let on = toggles.is_enabled(name);
                        let text = format!("{label} [{}]", if on { "on" } else { "off" });
                        if ui.button(text).clicked() {
                            clicked.push(name);
                        }
                    }
                });
        });

        self.state
            .handle_platform_output(window, output.platform_output);
        self.paint_jobs = self
            .context
            .tessellate(output.shapes, output.pixels_per_point);
        self.textures_delta = output.textures_delta;
        clicked
    }

    /// Upload this frame's egui textures and buffers.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        screen: &ScreenDescriptor,
    ) {
        let textures_delta = std::mem::take(&mut self.textures_delta);
        for (id, image_delta) in &textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &self.paint_jobs, screen);
        for id in &textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    /// Paint the panel into an already begun render pass.
    pub fn paint(&self, render_pass: &mut wgpu::RenderPass<'static>, screen: &ScreenDescriptor) {
        self.renderer.render(render_pass, &self.paint_jobs, screen);
    }
}
