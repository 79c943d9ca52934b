//! Recording stand-in for a GL context, used by the render tests.

use super::device::{ShaderDevice, ShaderStage};
use crate::utils::error::GraphicsError;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    Attach(u32, u32),
    Detach(u32, u32),
    Link(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    BindAttribute { location: u32, components: i32 },
    Uniform2f { location: u32, x: f32, y: f32 },
    Viewport(i32, i32, i32, i32),
    Draw { first: i32, count: i32 },
}

#[derive(Default)]
struct State {
    next_id: u32,
    calls: Vec<Call>,
    sources: HashMap<u32, (ShaderStage, String)>,
    live_programs: Vec<u32>,
    attached: HashMap<u32, Vec<u32>>,
    vertices: Vec<f32>,
}

/// Scripted driver: compile logs are produced by substring rules over the
/// submitted source so tests can write ordinary-looking shaders.
#[derive(Default)]
pub struct FakeDevice {
    state: RefCell<State>,
    /// (needle, log) pairs checked against every compiled source.
    pub compile_logs: Vec<(String, String)>,
    /// Log returned by every link when set.
    pub link_log: Option<String>,
    /// When true, `v_position` is reported as optimised away.
    pub hide_position: bool,
    /// When true, program creation fails.
    pub refuse_programs: bool,
    /// Sources containing this needle fail to compile with an empty log.
    pub silent_compile_failure: Option<String>,
    /// Links whose attached sources contain this needle fail with an
    /// empty log.
    pub silent_link_failure: Option<String>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compile_log(mut self, needle: &str, log: &str) -> Self {
        self.compile_logs.push((needle.to_string(), log.to_string()));
        self
    }

    pub fn with_link_log(mut self, log: &str) -> Self {
        self.link_log = Some(log.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn compile_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CompileShader(_)))
            .count()
    }

    pub fn live_programs(&self) -> Vec<u32> {
        self.state.borrow().live_programs.clone()
    }

    pub fn uploaded_vertices(&self) -> Vec<f32> {
        self.state.borrow().vertices.clone()
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn source_of(&self, shader: u32) -> String {
        self.state
            .borrow()
            .sources
            .get(&shader)
            .map(|(_, s)| s.clone())
            .unwrap_or_default()
    }
}

impl ShaderDevice for FakeDevice {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, GraphicsError> {
        let id = self.next_id();
        self.state
            .borrow_mut()
            .sources
            .insert(id, (stage, String::new()));
        self.record(Call::CreateShader(stage, id));
        Ok(id)
    }

    fn compile_shader(&self, shader: u32, source: &str) {
        if let Some(entry) = self.state.borrow_mut().sources.get_mut(&shader) {
            entry.1 = source.to_string();
        }
        self.record(Call::CompileShader(shader));
    }

    fn shader_compiled(&self, shader: u32) -> bool {
        if let Some(needle) = &self.silent_compile_failure {
            if self.source_of(shader).contains(needle.as_str()) {
                return false;
            }
        }
        let log = self.shader_info_log(shader);
        !log.to_lowercase().contains("error")
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let source = self.source_of(shader);
        self.compile_logs
            .iter()
            .find(|(needle, _)| source.contains(needle.as_str()))
            .map(|(_, log)| log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, GraphicsError> {
        if self.refuse_programs {
            return Err(GraphicsError::Program("out of program names".to_string()));
        }
        let id = self.next_id();
        self.state.borrow_mut().live_programs.push(id);
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.state
            .borrow_mut()
            .attached
            .entry(program)
            .or_default()
            .push(shader);
        self.record(Call::Attach(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::Detach(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::Link(program));
    }

    fn program_linked(&self, program: u32) -> bool {
        if let Some(needle) = &self.silent_link_failure {
            let shaders = self
                .state
                .borrow()
                .attached
                .get(&program)
                .cloned()
                .unwrap_or_default();
            if shaders
                .iter()
                .any(|&shader| self.source_of(shader).contains(needle.as_str()))
            {
                return false;
            }
        }
        self.link_log
            .as_deref()
            .map_or(true, |log| !log.to_lowercase().contains("error"))
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.link_log.clone().unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.state
            .borrow_mut()
            .live_programs
            .retain(|&p| p != program);
        self.record(Call::DeleteProgram(program));
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        (name == "v_position" && !self.hide_position).then_some(0)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        (name == "f_resolution").then_some(7)
    }

    fn set_uniform_vec2(&self, location: &u32, x: f32, y: f32) {
        self.record(Call::Uniform2f {
            location: *location,
            x,
            y,
        });
    }

    fn create_vertex_buffer(&self, vertices: &[f32]) -> Result<(u32, u32), GraphicsError> {
        self.state.borrow_mut().vertices = vertices.to_vec();
        Ok((self.next_id(), self.next_id()))
    }

    fn bind_vertex_attribute(&self, _vao: u32, _buffer: u32, location: u32, components: i32) {
        self.record(Call::BindAttribute {
            location,
            components,
        });
    }

    fn delete_vertex_buffer(&self, _vao: u32, _buffer: u32) {}

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn draw_triangles(&self, _vao: u32, first: i32, count: i32) {
        self.record(Call::Draw { first, count });
    }
}
