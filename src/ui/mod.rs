//! User interface
pub mod console;
pub mod panels;

pub use console::{ConsoleLog, ConsoleSink};
pub use panels::{EditorPanels, PanelActions};
