// pipeline.rs - Command interface tying builds, renders and the console together

use super::builder::{BuildFailure, LinkedProgram, ProgramBuilder};
use super::device::ShaderDevice;
use super::renderer::{DrawParams, FrameRenderer, RenderError, Viewport};
use super::shaders::{DEFAULT_FRAGMENT_SRC, VERTEX_SRC};
use crate::ui::console::ConsoleSink;
use crate::utils::error::GraphicsError;
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has linked yet; renders are skipped.
    Uninitialized,
    Ready,
}

/// The live shader pipeline for one editing session.
///
/// Runs entirely on the thread that owns the GL context. Builds only happen
/// through [`on_run`](Self::on_run) and [`bootstrap`](Self::bootstrap);
/// resizes only re-render.
pub struct ShaderPipeline<D: ShaderDevice, C: ConsoleSink> {
    builder: ProgramBuilder<D>,
    renderer: FrameRenderer<D>,
    console: C,
    viewport: Viewport,
    vertex_source: String,
}

impl<D: ShaderDevice, C: ConsoleSink> ShaderPipeline<D, C> {
    pub fn new(device: Arc<D>, console: C, viewport: Viewport) -> Result<Self, GraphicsError> {
        Ok(Self {
            builder: ProgramBuilder::new(device.clone()),
            renderer: FrameRenderer::new(device)?,
            console,
            viewport,
            vertex_source: VERTEX_SRC.to_string(),
        })
    }

    pub fn state(&self) -> PipelineState {
        match self.builder.active() {
            Some(_) => PipelineState::Ready,
            None => PipelineState::Uninitialized,
        }
    }

    pub fn active_program(&self) -> Option<&LinkedProgram<D>> {
        self.builder.active()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seeds the session with the built-in scene.
    pub fn bootstrap(&mut self) -> Result<D::Program, BuildFailure> {
        self.on_run(DEFAULT_FRAGMENT_SRC)
    }

    /// Rebuilds against `fragment` and renders whatever program is active
    /// afterwards, which is the previous one if the build failed.
    pub fn on_run(&mut self, fragment: &str) -> Result<D::Program, BuildFailure> {
        self.console.clear();
        let result = self
            .builder
            .build(&self.vertex_source, fragment, &mut self.console);
        self.render().ok();
        result
    }

    /// Tracks a new output area and redraws the current program.
    pub fn on_resize(&mut self, viewport: Viewport) -> Result<DrawParams, RenderError> {
        debug!(
            "Output resized to {}x{} at ({}, {})",
            viewport.size.width, viewport.size.height, viewport.x, viewport.y
        );
        self.viewport = viewport;
        self.render()
    }

    pub fn render(&self) -> Result<DrawParams, RenderError> {
        let result = self.renderer.render(self.builder.active(), self.viewport);
        if let Err(e) = &result {
            debug!("Render skipped: {}", e);
        }
        result
    }
}
