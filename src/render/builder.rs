// builder.rs - Compiles and links vertex/fragment pairs into the active program

use super::device::{ShaderDevice, ShaderStage};
use super::diagnostic::{normalize_log, DiagnosticEntry};
use super::shaders::{declares_resolution_uniform, POSITION_ATTRIBUTE, RESOLUTION_UNIFORM};
use crate::ui::console::ConsoleSink;
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const SUCCESS_MESSAGE: &str = "Compiled successfully.";

/// Step of a build attempt that produced the blocking diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    Vertex,
    Fragment,
    Link,
}

impl From<ShaderStage> for BuildStep {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => BuildStep::Vertex,
            ShaderStage::Fragment => BuildStep::Fragment,
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildStep::Vertex => "vertex stage",
            BuildStep::Fragment => "fragment stage",
            BuildStep::Link => "program link",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} failed: {}", .diagnostic.text)]
pub struct BuildFailure {
    pub step: BuildStep,
    pub diagnostic: DiagnosticEntry,
}

impl BuildFailure {
    fn new(step: BuildStep, text: &str) -> Self {
        Self {
            step,
            diagnostic: DiagnosticEntry::classified(text),
        }
    }

    /// Used when the driver reports failure but leaves the info log empty.
    fn silent(step: BuildStep) -> Self {
        Self::new(
            step,
            &format!("error: {} failed without driver diagnostics", step),
        )
    }
}

/// A linked program together with what the renderer needs to drive it.
pub struct LinkedProgram<D: ShaderDevice> {
    pub program: D::Program,
    pub position: Option<u32>,
    /// Set only when the fragment source declares the uniform and the
    /// driver kept it.
    pub resolution: Option<D::UniformLocation>,
    pub declares_resolution: bool,
}

impl<D: ShaderDevice> fmt::Debug for LinkedProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedProgram")
            .field("program", &self.program)
            .field("position", &self.position)
            .field("resolution", &self.resolution)
            .field("declares_resolution", &self.declares_resolution)
            .finish()
    }
}

/// Owns the single active program slot.
pub struct ProgramBuilder<D: ShaderDevice> {
    device: Arc<D>,
    active: Option<LinkedProgram<D>>,
}

impl<D: ShaderDevice> ProgramBuilder<D> {
    pub fn new(device: Arc<D>) -> Self {
        Self {
            device,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&LinkedProgram<D>> {
        self.active.as_ref()
    }

    /// Compiles both stages, links them and on success makes the result the
    /// active program.
    ///
    /// The first step with a non-empty diagnostic aborts the attempt. On any
    /// failure the previously active program stays untouched and bound.
    /// Reports exactly one entry to `console` either way.
    pub fn build<C: ConsoleSink + ?Sized>(
        &mut self,
        vertex: &str,
        fragment: &str,
        console: &mut C,
    ) -> Result<D::Program, BuildFailure> {
        debug!(
            "Building program ({} byte vertex, {} byte fragment)",
            vertex.len(),
            fragment.len()
        );

        match self.link(vertex, fragment) {
            Ok(linked) => {
                let program = linked.program;
                self.device.use_program(Some(program));
                if let Some(previous) = self.active.replace(linked) {
                    self.device.delete_program(previous.program);
                }
                info!("Program {:?} is now active", program);
                console.log_info(SUCCESS_MESSAGE);
                Ok(program)
            }
            Err(failure) => {
                warn!("Build aborted at {}", failure.step);
                console.emit(&failure.diagnostic);
                Err(failure)
            }
        }
    }

    fn link(&self, vertex: &str, fragment: &str) -> Result<LinkedProgram<D>, BuildFailure> {
        let vertex_shader = self.compile(ShaderStage::Vertex, vertex)?;
        let fragment_shader = match self.compile(ShaderStage::Fragment, fragment) {
            Ok(shader) => shader,
            Err(failure) => {
                self.device.delete_shader(vertex_shader);
                return Err(failure);
            }
        };

        let result = self.link_stages(vertex_shader, fragment_shader, fragment);

        // Stages never outlive the attempt.
        self.device.delete_shader(vertex_shader);
        self.device.delete_shader(fragment_shader);

        result
    }

    fn compile(&self, stage: ShaderStage, source: &str) -> Result<D::Shader, BuildFailure> {
        let shader = self
            .device
            .create_shader(stage)
            .map_err(|e| BuildFailure::new(stage.into(), &format!("error: {}", e)))?;

        self.device.compile_shader(shader, source);
        let log = self.device.shader_info_log(shader);

        let failure = match normalize_log(&log) {
            Some(text) => Some(BuildFailure::new(stage.into(), text)),
            None if !self.device.shader_compiled(shader) => {
                Some(BuildFailure::silent(stage.into()))
            }
            None => None,
        };

        match failure {
            Some(failure) => {
                self.device.delete_shader(shader);
                Err(failure)
            }
            None => Ok(shader),
        }
    }

    fn link_stages(
        &self,
        vertex_shader: D::Shader,
        fragment_shader: D::Shader,
        fragment: &str,
    ) -> Result<LinkedProgram<D>, BuildFailure> {
        let program = self
            .device
            .create_program()
            .map_err(|e| BuildFailure::new(BuildStep::Link, &format!("error: {}", e)))?;

        self.device.attach_shader(program, vertex_shader);
        self.device.attach_shader(program, fragment_shader);
        self.device.link_program(program);

        let log = self.device.program_info_log(program);
        let failure = match normalize_log(&log) {
            Some(text) => Some(BuildFailure::new(BuildStep::Link, text)),
            None if !self.device.program_linked(program) => {
                Some(BuildFailure::silent(BuildStep::Link))
            }
            None => None,
        };

        if let Some(failure) = failure {
            self.device.delete_program(program);
            return Err(failure);
        }

        self.device.detach_shader(program, vertex_shader);
        self.device.detach_shader(program, fragment_shader);

        let declares_resolution = declares_resolution_uniform(fragment);
        let resolution = if declares_resolution {
            self.device.uniform_location(program, RESOLUTION_UNIFORM)
        } else {
            None
        };

        Ok(LinkedProgram {
            program,
            position: self.device.attrib_location(program, POSITION_ATTRIBUTE),
            resolution,
            declares_resolution,
        })
    }
}

impl<D: ShaderDevice> Drop for ProgramBuilder<D> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            self.device.delete_program(active.program);
        }
    }
}
