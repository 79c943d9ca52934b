pub mod error;
pub mod save;

pub use error::{EditorError, GraphicsError};
pub use save::{choose_save_path, save_shader};
