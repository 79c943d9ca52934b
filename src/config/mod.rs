pub mod editor;

pub use editor::{EditorConfig, LayoutConfig, WindowConfig};
