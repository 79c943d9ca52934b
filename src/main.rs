use anyhow::Result;
use glow::HasContext;
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext,
        PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, sync::Arc};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use glsl_editor::{
    config::EditorConfig,
    editor::ShaderEditor,
    render::{Viewport, ViewportSize},
    utils::error::EditorError,
};

/// Context flavours tried in order. GLES accepts the `#version 100` sources
/// natively; desktop 4.1 core accepts them through ES2 compatibility. Both
/// guarantee vertex array objects, which the output quad is drawn through.
fn context_apis() -> [(ContextApi, &'static str); 2] {
    [
        (ContextApi::Gles(Some(Version::new(3, 0))), "OpenGL ES 3.0"),
        (ContextApi::OpenGl(Some(Version::new(4, 1))), "OpenGL 4.1 core"),
    ]
}

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    gl: Arc<glow::Context>,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    painter: Option<egui_glow::Painter>,
    editor: Option<ShaderEditor<glow::Context>>,
}

impl App {
    fn new(config: &EditorConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // glutin only calls the picker with at least one candidate.
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("no GL config offered to the picker")
            })
            .map_err(|e| EditorError::ContextUnavailable(e.to_string()))?;

        let window = window.ok_or_else(|| {
            EditorError::ContextUnavailable("display builder returned no window".to_string())
        })?;

        let not_current = create_context(&window, &gl_config)?;
        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &attrs)
                .map_err(|e| EditorError::ContextUnavailable(e.to_string()))?
        };
        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| EditorError::ContextUnavailable(e.to_string()))?;

        let gl_display = gl_config.display();
        let gl = Arc::new(unsafe {
            glow::Context::from_loader_function(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(&symbol),
                Err(_) => std::ptr::null(),
            })
        });
        unsafe {
            info!(
                "GL renderer: {} ({})",
                gl.get_parameter_string(glow::RENDERER),
                gl.get_parameter_string(glow::VERSION)
            );
        }

        let painter = egui_glow::Painter::new(gl.clone(), "", None)
            .map_err(|e| EditorError::ContextUnavailable(e.to_string()))?;

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &event_loop,
            Some(window.scale_factor() as f32),
            Some(painter.max_texture_side()),
        );

        let size = window.inner_size();
        let initial = ViewportSize::new(size.width.max(1), size.height.max(1))
            .map(Viewport::full)
            .ok_or_else(|| EditorError::ContextUnavailable("window has no area".to_string()))?;
        let editor = ShaderEditor::new(gl.clone(), config, initial)?;

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                gl,
                egui_ctx,
                egui_winit,
                painter: Some(painter),
                editor: Some(editor),
            },
            event_loop,
        ))
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if let WindowEvent::Resized(size) = event {
            if let (Some(width), Some(height)) =
                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
            {
                self.gl_surface.resize(&self.gl_context, width, height);
            }
        }

        let response = self.egui_winit.on_window_event(&self.window, event);
        response.repaint || matches!(event, WindowEvent::Resized(_))
    }

    /// Runs one UI frame, draws the shader output under it and presents.
    /// Returns true when another frame should follow right away.
    fn redraw(&mut self) -> bool {
        let (Some(editor), Some(painter)) = (self.editor.as_mut(), self.painter.as_mut()) else {
            return false;
        };

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        self.egui_ctx.begin_frame(raw_input);
        let actions = editor.ui(&self.egui_ctx);
        let full_output = self.egui_ctx.end_frame();

        let size = self.window.inner_size();
        unsafe {
            self.gl.viewport(0, 0, size.width as i32, size.height as i32);
            self.gl.clear_color(0.05, 0.05, 0.07, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        let pixels_per_point = full_output.pixels_per_point;
        let mut repaint = editor.apply(actions, pixels_per_point, size.height);

        let clipped_primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, pixels_per_point);
        painter.paint_and_update_textures(
            [size.width, size.height],
            pixels_per_point,
            &clipped_primitives,
            &full_output.textures_delta,
        );
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to present frame: {}", e);
        }

        repaint |= full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map_or(false, |viewport| viewport.repaint_delay.is_zero());
        repaint
    }

    fn cleanup(&mut self) {
        if let Err(e) = self.gl_context.make_current(&self.gl_surface) {
            warn!("Context lost before cleanup: {}", e);
        }
        // GL objects go before the painter and the context.
        self.editor = None;
        if let Some(mut painter) = self.painter.take() {
            painter.destroy();
        }
    }
}

fn create_context(window: &Window, gl_config: &Config) -> Result<NotCurrentContext, EditorError> {
    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    for (api, label) in context_apis() {
        let attributes = ContextAttributesBuilder::new()
            .with_context_api(api)
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        match unsafe { gl_display.create_context(gl_config, &attributes) } {
            Ok(context) => {
                info!("Created {} context", label);
                return Ok(context);
            }
            Err(e) => warn!("{} context unavailable: {}", label, e),
        }
    }

    Err(EditorError::ContextUnavailable(
        "no OpenGL ES 3.0 or OpenGL 4.1 context could be created".to_string(),
    ))
}

/// Text of the blocking notice shown when startup fails.
fn startup_notice(error: &anyhow::Error) -> String {
    match error.downcast_ref::<EditorError>() {
        Some(EditorError::ContextUnavailable(reason)) => format!(
            "Unable to create an OpenGL context. Your graphics driver or \
             hardware may not support OpenGL ES 3.0 or OpenGL 4.1.\n\n{}",
            reason
        ),
        _ => format!("The shader editor could not start.\n\n{}", error),
    }
}

fn show_startup_notice(error: &anyhow::Error) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("GLSL Shader Editor")
        .set_description(startup_notice(error))
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn load_config() -> (EditorConfig, Option<EditorError>) {
    match EditorConfig::default_path().and_then(|path| EditorConfig::load_or_create(&path)) {
        Ok(config) => (config, None),
        Err(e) => (EditorConfig::default(), Some(e)),
    }
}

fn main() -> Result<()> {
    let (config, config_error) = load_config();
    SimpleLogger::new().with_level(config.log_level()).init()?;
    if let Some(e) = config_error {
        warn!("Using default config: {}", e);
    }
    info!("Starting {}", config.window.title);

    let (mut app, event_loop) = match App::new(&config) {
        Ok(pair) => pair,
        Err(e) => {
            error!("{}", e);
            show_startup_notice(&e);
            return Err(e);
        }
    };

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                WindowEvent::RedrawRequested => {
                    if app.redraw() {
                        app.window.request_redraw();
                    }
                }
                other => {
                    if app.handle_window_event(&other) {
                        app.window.request_redraw();
                    }
                }
            },
            Event::LoopExiting => app.cleanup(),
            _ => (),
        }
    })?;

    Ok(())
}
