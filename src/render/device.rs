// device.rs - The slice of the GL API the shader pipeline drives

use crate::utils::error::GraphicsError;
use glow::HasContext;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Graphics operations needed to build programs and draw the output quad.
///
/// Every call must happen on the thread that owns the current context.
/// Object handles are plain copyable ids, as in GL itself.
pub trait ShaderDevice {
    type Shader: Copy + Debug;
    type Program: Copy + PartialEq + Debug;
    type Buffer: Copy + Debug;
    type VertexArray: Copy + Debug;
    type UniformLocation: Clone + Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, GraphicsError>;
    fn compile_shader(&self, shader: Self::Shader, source: &str);
    fn shader_compiled(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, GraphicsError>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_linked(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn set_uniform_vec2(&self, location: &Self::UniformLocation, x: f32, y: f32);

    /// Uploads static vertex data into a fresh buffer owned by a fresh VAO.
    fn create_vertex_buffer(
        &self,
        vertices: &[f32],
    ) -> Result<(Self::VertexArray, Self::Buffer), GraphicsError>;
    /// Points `location` at tightly packed `components`-float vertices in `buffer`.
    fn bind_vertex_attribute(
        &self,
        vertex_array: Self::VertexArray,
        buffer: Self::Buffer,
        location: u32,
        components: i32,
    );
    fn delete_vertex_buffer(&self, vertex_array: Self::VertexArray, buffer: Self::Buffer);

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn draw_triangles(&self, vertex_array: Self::VertexArray, first: i32, count: i32);
}

impl ShaderDevice for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, GraphicsError> {
        unsafe { HasContext::create_shader(self, stage.gl_enum()) }.map_err(GraphicsError::Shader)
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
        }
    }

    fn shader_compiled(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, GraphicsError> {
        unsafe { HasContext::create_program(self) }.map_err(GraphicsError::Program)
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_linked(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn set_uniform_vec2(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { self.uniform_2_f32(Some(location), x, y) }
    }

    fn create_vertex_buffer(
        &self,
        vertices: &[f32],
    ) -> Result<(Self::VertexArray, Self::Buffer), GraphicsError> {
        unsafe {
            let vertex_array = self.create_vertex_array().map_err(GraphicsError::Buffer)?;
            let buffer = match self.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    self.delete_vertex_array(vertex_array);
                    return Err(GraphicsError::Buffer(e));
                }
            };

            self.bind_vertex_array(Some(vertex_array));
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            self.bind_vertex_array(None);

            Ok((vertex_array, buffer))
        }
    }

    fn bind_vertex_attribute(
        &self,
        vertex_array: Self::VertexArray,
        buffer: Self::Buffer,
        location: u32,
        components: i32,
    ) {
        unsafe {
            self.bind_vertex_array(Some(vertex_array));
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
            self.enable_vertex_attrib_array(location);
        }
    }

    fn delete_vertex_buffer(&self, vertex_array: Self::VertexArray, buffer: Self::Buffer) {
        unsafe {
            self.delete_buffer(buffer);
            self.delete_vertex_array(vertex_array);
        }
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.viewport(x, y, width, height) }
    }

    fn draw_triangles(&self, vertex_array: Self::VertexArray, first: i32, count: i32) {
        unsafe {
            self.bind_vertex_array(Some(vertex_array));
            self.draw_arrays(glow::TRIANGLES, first, count);
            self.bind_vertex_array(None);
        }
    }
}
