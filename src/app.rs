use std::ffi::CString;
use std::num::NonZeroU32;
use std::panic::AssertUnwindSafe;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, GeometryBuilder, VertexAttribute};
use gl_wrapper::loader::{DriverInfo, LoaderError};
use gl_wrapper::program::{Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::shader::ShaderError;

use crate::config::AppConfig;
use crate::frame::{AppEvent, FrameLoop, Key};

pub struct App {
    config: AppConfig,
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
}

impl App {
    /// Opens the window, creates a 3.3 core context, makes it current and
    /// loads the GL bindings for it.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.window.width,
                config.window.height,
            )))
            .with_title(&config.window.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = build_display(|| {
            display_builder.build(&event_loop, template, |mut configs| {
                configs.next().expect(NO_CONFIG)
            })
        })?;

        let window =
            window.ok_or_else(|| AppError::Window(String::from("no window was created")))?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .map_err(AppError::Context)?
            .make_current(&gl_window.surface)
            .map_err(AppError::Context)?;

        gl_wrapper::loader::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        })?;

        let info = DriverInfo::query();
        log::info!(
            "OpenGL {} on {} ({})",
            info.version,
            info.renderer,
            info.vendor
        );

        Ok(Self {
            config,
            event_loop,
            gl_context,
            gl_window,
        })
    }

    /// Uploads the GL objects, runs the loop until it terminates and tears
    /// everything down again. Returns the process exit code.
    pub fn run(self) -> Result<i32, AppError> {
        let Self {
            config,
            mut event_loop,
            gl_context,
            gl_window,
        } = self;

        let program = build_program(&config)?;
        let geometry = GeometryBuilder::new(&config.vertices)
            .with_attribute(VertexAttribute::Vec3)
            .build()?;

        let mut gl_renderer = GlRenderer::new();
        if config.wireframe {
            gl_renderer.set_wireframe(true);
        }

        let mut frame_loop = FrameLoop::new(config.clear_color, geometry.vertices());

        let exit_code = event_loop.run_return(|event, _window_target, control_flow| {
            control_flow.set_poll();

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        if let (Some(width), Some(height)) =
                            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                        {
                            gl_window.surface.resize(&gl_context, width, height);
                        }
                        frame_loop.handle_event(AppEvent::Resized {
                            width: size.width,
                            height: size.height,
                        });
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        let key = match input.virtual_keycode {
                            Some(VirtualKeyCode::Escape) => Key::Escape,
                            _ => Key::Other,
                        };
                        frame_loop.handle_event(AppEvent::Key {
                            key,
                            pressed: input.state == ElementState::Pressed,
                        });
                    }
                    WindowEvent::CloseRequested => {
                        frame_loop.handle_event(AppEvent::CloseRequested);
                    }
                    _ => (),
                },
                Event::MainEventsCleared => match frame_loop.next_frame() {
                    Some(frame) => {
                        if let Some(viewport) = frame.viewport {
                            gl_renderer.set_viewport(
                                viewport.x,
                                viewport.y,
                                viewport.width,
                                viewport.height,
                            );
                        }

                        gl_renderer.clear_color(frame.clear_color);
                        gl_renderer.draw(&geometry, &program, frame.draw.count);

                        if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                            log::error!("Could not present frame: {e}");
                        }
                    }
                    None => control_flow.set_exit(),
                },
                _ => (),
            }
        });

        log::debug!(
            "loop {:?} after {} frames with {} draw calls",
            frame_loop.state(),
            frame_loop.frames(),
            gl_renderer.draw_calls()
        );

        // GL objects go while the context is still current
        drop(geometry);
        drop(program);
        drop(gl_context);
        drop(gl_window);

        log::info!("shut down");

        Ok(exit_code)
    }
}

const NO_CONFIG: &str = "no GL config matches the window";

/// Runs the glutin-winit display builder and turns every failure into
/// [`AppError::Window`].
///
/// The picker gets a lazily filtered iterator but has to return a `Config`, so
/// an empty list can only leave the picker as a panic. That panic is caught
/// here.
fn build_display<T, F>(build: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, Box<dyn std::error::Error>>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(build)) {
        Ok(Ok(built)) => Ok(built),
        Ok(Err(e)) => Err(AppError::Window(e.to_string())),
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| String::from("display creation panicked"));

            Err(AppError::Window(msg))
        }
    }
}

fn build_program(config: &AppConfig) -> Result<Program, AppError> {
    match ProgramBuilder::new(&config.shaders.vertex, &config.shaders.fragment).build() {
        Ok(program) => Ok(program),
        Err(e) if config.strict_shaders => Err(AppError::Shader(e)),
        Err(e) => {
            for failure in e.failures() {
                log::error!("{failure}");
            }
            log::warn!("drawing with an unlinked program");
            Ok(Program::empty())
        }
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();

        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(AppError::Window(format!(
                    "window has a zero sized surface ({width}x{height})"
                )))
            }
        };

        let attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window_handle, width, height);

        let surface = unsafe { config.display().create_window_surface(config, &attrs) }
            .map_err(AppError::Context)?;

        Ok(Self { surface, window })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to create window: {0}")]
    Window(String),
    #[error("Failed to create OpenGL context: {0}")]
    Context(glutin::error::Error),
    #[error("Failed to initialize OpenGL bindings: {0}")]
    Bindings(#[from] LoaderError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("Could not upload geometry: {0}")]
    Geometry(#[from] GBError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_build_errors_become_window_errors() {
        let res = build_display::<(), _>(|| Err("no X11 display".into()));

        assert!(matches!(res, Err(AppError::Window(msg)) if msg == "no X11 display"));
    }

    #[test]
    fn empty_config_list_is_a_window_error() {
        let res = build_display::<(), _>(|| {
            let mut configs = std::iter::empty::<()>();
            configs.next().expect(NO_CONFIG);
            Ok(())
        });

        assert!(matches!(res, Err(AppError::Window(msg)) if msg == NO_CONFIG));
    }

    #[test]
    fn built_display_is_passed_through() {
        assert_eq!(build_display(|| Ok(7)).unwrap(), 7);
    }
}
