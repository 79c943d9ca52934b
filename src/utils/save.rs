use crate::utils::error::Result;
use log::info;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

pub const SHADER_FILE_NAME: &str = "shader.frag";
pub const SHADER_MIME_TYPE: &str = "text/plain";

/// Asks the user where to save, starting in `dir` with `shader.frag`
/// suggested. `None` when the dialog was cancelled.
pub fn choose_save_path(dir: &Path) -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save shader")
        .set_directory(dir)
        .set_file_name(SHADER_FILE_NAME)
        .add_filter("GLSL fragment shader", &["frag", "glsl"])
        .add_filter(SHADER_MIME_TYPE, &["txt"])
        .save_file()
}

/// Writes the editor text to `path`, replacing any previous file and
/// creating missing parent directories.
pub fn save_shader(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, source)?;
    info!("Saved {} bytes of {} to {}", source.len(), SHADER_MIME_TYPE, path.display());
    Ok(())
}
