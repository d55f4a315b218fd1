//! Tutor Desktop: small GPU tutorial programs on wgpu.
//!
//! Uses `winit` 0.30 for windowing, `tutor-render` for the pipelines and
//! `tutor-text` for glyph atlases. Pick a demo on the command line:
//!
//! ```text
//! tutor-desktop [triangle|intro|text] [FONT] [--shaders DIR]
//! ```

mod config;
mod demos;
mod state;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use config::{Config, Demo, Invocation, USAGE, WINDOW_HEIGHT, WINDOW_WIDTH};
use state::AppState;
use tutor_render::{GpuContext, RenderError};

/// Winit 0.30 application handler.
struct App {
    config: Config,
    window: Option<Arc<Window>>,
    state: Option<AppState>,
    frame_count: u64,
    failed: bool,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            state: None,
            frame_count: 0,
            failed: false,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(window_attributes(self.config.demo))
                .context("Failed to create window")?,
        );
        let size = window.inner_size();

        let gpu = pollster::block_on(GpuContext::new_with_surface(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
            self.config.vsync,
        ))
        .context("Failed to initialize GPU")?;

        info!(
            "Running {} demo: {}×{}, GPU: {}",
            self.config.demo,
            size.width,
            size.height,
            gpu.adapter_name()
        );

        let state = AppState::new(gpu, &self.config)?;

        window.request_redraw();
        self.state = Some(state);
        self.window = Some(window);
        Ok(())
    }
}

/// Window for `demo`. The size is in physical pixels, which is also the
/// unit the text demo lays out in.
fn window_attributes(demo: Demo) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(demo.title())
        .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failed {
            return; // Already initialized.
        }

        if let Err(err) = self.init(event_loop) {
            error!("{err:#}");
            self.failed = true;
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return;
        };

        match event {
            // ── Close / Escape ──────────────────────────────────
            WindowEvent::CloseRequested => {
                info!("Window closed after {} frames", self.frame_count);
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                info!("Escape pressed after {} frames", self.frame_count);
                event_loop.exit();
            }

            // ── Resize ──────────────────────────────────────────
            WindowEvent::Resized(new_size) => {
                state.resize(new_size.width, new_size.height);
                window.request_redraw();
            }

            // ── Redraw ──────────────────────────────────────────
            WindowEvent::RedrawRequested => {
                match state.render_frame() {
                    Ok(stats) => {
                        self.frame_count += 1;
                        if self.frame_count % 300 == 0 {
                            debug!(
                                "Frame {}: {} triangle(s), {} draw call(s)",
                                self.frame_count, stats.triangles, stats.draw_calls
                            );
                        }
                    }
                    Err(RenderError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => {
                        // Reconfigure and try again on the next frame.
                        state.reconfigure();
                        window.request_redraw();
                    }
                    Err(e) => {
                        error!("Render error: {e}");
                    }
                }
                if self.config.demo.is_animated() {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn run(config: Config) -> Result<bool> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(if config.demo.is_animated() {
        ControlFlow::Poll
    } else {
        ControlFlow::Wait
    });

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("Event loop error")?;
    Ok(!app.failed)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    info!("Starting Tutor Desktop...");

    match run(config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    #[test]
    fn test_window_is_640_by_480_physical_pixels() {
        let attrs = window_attributes(Demo::Text);
        assert_eq!(
            attrs.inner_size,
            Some(Size::Physical(PhysicalSize::new(640, 480)))
        );
        assert_eq!(attrs.title, "Texture atlas text");
    }
}
