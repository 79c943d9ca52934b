use crate::utils::error::{EditorError, Result};
use directories::{ProjectDirs, UserDirs};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub log_level: String,
    pub save_dir: Option<PathBuf>,
    pub window: WindowConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Initial width share of the editor pane.
    pub editor_fraction: f32,
    /// Initial height share of the console pane within the right column.
    pub console_fraction: f32,
    pub font_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            save_dir: None,
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "GLSL Shader Editor".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            editor_fraction: 0.5,
            console_fraction: 0.25,
            font_size: 13.0,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: EditorConfig = toml::from_str(content)?;
        config.layout.clamp();
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reads `path`, writing the defaults there first if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Location of `config.toml` in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "glsl-editor").ok_or(EditorError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Unknown names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Configured directory, else the user's documents, else the working
    /// directory.
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir
            .clone()
            .or_else(|| {
                UserDirs::new().and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl LayoutConfig {
    fn clamp(&mut self) {
        self.editor_fraction = self.editor_fraction.clamp(0.1, 0.9);
        self.console_fraction = self.console_fraction.clamp(0.05, 0.9);
        self.font_size = self.font_size.clamp(6.0, 48.0);
    }
}
