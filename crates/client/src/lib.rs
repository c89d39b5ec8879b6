//! Vitrine Client
//!
//! Native windowed client for the showcase scene: winit event loop, wgpu
//! renderer, orbit camera, glTF/font asset loading, and an egui debug
//! panel with one button per toggle.

pub mod app;
pub mod assets;
pub mod config;
pub mod panel;
pub mod renderer;
pub mod scene_setup;

/// Run the demo.
pub fn run() -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use winit::event_loop::EventLoop;

    use app::App;
    use config::ClientConfig;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("vitrine=debug".parse()?))
        .init();

    tracing::info!("Starting Vitrine");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(ClientConfig::default());

    event_loop.run_app(&mut app)?;

    Ok(())
}
