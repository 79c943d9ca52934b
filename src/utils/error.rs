use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Unable to obtain a graphics context: {0}")]
    ContextUnavailable(String),

    #[error("Graphics resource error: {0}")]
    Graphics(#[from] GraphicsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// The driver refused to create a GL object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("shader object creation failed: {0}")]
    Shader(String),

    #[error("program object creation failed: {0}")]
    Program(String),

    #[error("vertex buffer creation failed: {0}")]
    Buffer(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
