//! Demo error type.

use std::fmt;

use parasurf_graphics::{GraphError, GraphicsError};
use parasurf_parametric::SettingsError;

/// Errors surfaced by the demo binary.
#[derive(Debug)]
pub enum DemoError {
    /// Loading the TOML configuration failed.
    Settings(SettingsError),
    /// Writing the export file failed.
    Io(std::io::Error),
    /// Serializing the RON export failed.
    Export(ron::Error),
    /// The frame's render graph could not be compiled.
    Graph(GraphError),
    /// The backend failed to execute the frame.
    Backend(GraphicsError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Export(e) => write!(f, "export: {e}"),
            Self::Graph(e) => write!(f, "render graph: {e}"),
            Self::Backend(e) => write!(f, "backend: {e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Settings(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Graph(e) => Some(e),
            Self::Backend(e) => Some(e),
        }
    }
}

impl From<SettingsError> for DemoError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<std::io::Error> for DemoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ron::Error> for DemoError {
    fn from(e: ron::Error) -> Self {
        Self::Export(e)
    }
}

impl From<GraphError> for DemoError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

impl From<GraphicsError> for DemoError {
    fn from(e: GraphicsError) -> Self {
        Self::Backend(e)
    }
}
