pub mod config;
pub mod editor;
pub mod render;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::ShaderEditor;
pub use render::pipeline::{PipelineState, ShaderPipeline};
pub use render::{DiagnosticEntry, Severity, ShaderDevice};
pub use ui::console::{ConsoleLog, ConsoleSink};
pub use utils::error::EditorError;
