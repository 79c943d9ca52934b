// renderer.rs - Draws the active program over a full-screen quad

use super::builder::LinkedProgram;
use super::device::ShaderDevice;
use crate::utils::error::GraphicsError;
use log::debug;
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;

/// Two triangles covering clip space, 3 floats per vertex.
pub const QUAD_VERTICES: [f32; 18] = [
    -1.0, -1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, //
    1.0, -1.0, 0.0, //
    1.0, 1.0, 0.0,
];

pub const QUAD_COMPONENTS: i32 = 3;
pub const QUAD_VERTEX_COUNT: i32 = QUAD_VERTICES.len() as i32 / QUAD_COMPONENTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportSize {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl ViewportSize {
    /// `None` when either side is zero, e.g. a collapsed pane.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }
}

/// Output area inside the window framebuffer, origin bottom-left as in GL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub size: ViewportSize,
}

impl Viewport {
    pub fn new(x: i32, y: i32, size: ViewportSize) -> Self {
        Self { x, y, size }
    }

    /// Viewport covering a whole surface of the given size.
    pub fn full(size: ViewportSize) -> Self {
        Self::new(0, 0, size)
    }
}

/// Everything a single draw was issued with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub viewport: Viewport,
    pub vertex_count: i32,
    pub resolution: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no program has been linked yet")]
    NoActiveProgram,
}

/// The static quad, uploaded once and shared by every draw.
pub struct GeometryBuffer<D: ShaderDevice> {
    vertex_array: D::VertexArray,
    buffer: D::Buffer,
}

pub struct FrameRenderer<D: ShaderDevice> {
    device: Arc<D>,
    quad: GeometryBuffer<D>,
}

impl<D: ShaderDevice> FrameRenderer<D> {
    pub fn new(device: Arc<D>) -> Result<Self, GraphicsError> {
        let (vertex_array, buffer) = device.create_vertex_buffer(&QUAD_VERTICES)?;
        Ok(Self {
            device,
            quad: GeometryBuffer {
                vertex_array,
                buffer,
            },
        })
    }

    pub fn render(
        &self,
        active: Option<&LinkedProgram<D>>,
        viewport: Viewport,
    ) -> Result<DrawParams, RenderError> {
        let program = active.ok_or(RenderError::NoActiveProgram)?;

        let width = viewport.size.width.get();
        let height = viewport.size.height.get();
        self.device
            .set_viewport(viewport.x, viewport.y, width as i32, height as i32);

        // Re-select the program: the UI painter binds its own between frames.
        self.device.use_program(Some(program.program));

        match program.position {
            Some(location) => self.device.bind_vertex_attribute(
                self.quad.vertex_array,
                self.quad.buffer,
                location,
                QUAD_COMPONENTS,
            ),
            None => debug!("Position attribute inactive, drawing without vertex data"),
        }

        let resolution = program.resolution.as_ref().map(|location| {
            let value = [width as f32, height as f32];
            self.device.set_uniform_vec2(location, value[0], value[1]);
            value
        });

        self.device
            .draw_triangles(self.quad.vertex_array, 0, QUAD_VERTEX_COUNT);

        Ok(DrawParams {
            viewport,
            vertex_count: QUAD_VERTEX_COUNT,
            resolution,
        })
    }
}

impl<D: ShaderDevice> Drop for FrameRenderer<D> {
    fn drop(&mut self) {
        self.device
            .delete_vertex_buffer(self.quad.vertex_array, self.quad.buffer);
    }
}
