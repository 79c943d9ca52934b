pub mod builder;
pub mod device;
pub mod diagnostic;
pub mod pipeline;
pub mod renderer;
pub mod shaders;

#[cfg(test)]
pub(crate) mod fake;

pub use builder::{BuildFailure, BuildStep, LinkedProgram, ProgramBuilder};
pub use device::{ShaderDevice, ShaderStage};
pub use diagnostic::{classify, DiagnosticEntry, Severity};
pub use pipeline::{PipelineState, ShaderPipeline};
pub use renderer::{DrawParams, FrameRenderer, RenderError, Viewport, ViewportSize};
