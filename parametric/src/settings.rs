//! Settings of a parametric surface.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shapes::BoundaryShape;

/// Everything [`ParametricNode::setup`](crate::ParametricNode::setup) reads.
///
/// Loadable from TOML; missing keys take their defaults.
///
/// ```toml
/// width = 1024
/// u_cells = 64
/// v_cells = 64
/// render_sidewalls = true
/// depth_boundaries = true
/// z_function = "sin(x * 6.28) * 0.1"
///
/// [[boundaries]]
/// shape = "sphere"
/// center = [0.5, 0.5, 0.5]
/// radius = 0.25
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametricSettings {
    /// Output viewport width.
    pub width: u32,
    /// Output viewport height.
    pub height: u32,
    /// Grid cells along u.
    pub u_cells: u32,
    /// Grid cells along v.
    pub v_cells: u32,
    /// Draw the base grid at z = 0.
    pub render_base: bool,
    /// Draw the top grid at z = 1.
    pub render_top: bool,
    /// Draw the side walls joining base and top.
    pub render_sidewalls: bool,
    /// Draw boundary subgraphs in the visible composite.
    pub visible_boundaries: bool,
    /// Capture boundary subgraphs into depth textures.
    pub depth_boundaries: bool,
    /// Body of the `Z_FUNCTION` define, empty for none.
    pub z_function: String,
    /// Body of the `Z_BASE` define, empty for none.
    pub z_base: String,
    /// Body of the `Z_TOP` define, empty for none.
    pub z_top: String,
    /// Boundary primitives added as subgraphs.
    pub boundaries: Vec<BoundaryShape>,
}

impl Default for ParametricSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            u_cells: 10,
            v_cells: 10,
            render_base: false,
            render_top: true,
            render_sidewalls: false,
            visible_boundaries: false,
            depth_boundaries: false,
            z_function: String::new(),
            z_base: String::new(),
            z_top: String::new(),
            boundaries: Vec::new(),
        }
    }
}

impl ParametricSettings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        toml::from_str(source).map_err(SettingsError::Parse)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path.as_ref()).map_err(SettingsError::Io)?;
        Self::from_toml_str(&source)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string(self).map_err(SettingsError::Serialize)
    }

    /// Enable base, top and side walls.
    pub fn render_all(&mut self) {
        self.render_base = true;
        self.render_top = true;
        self.render_sidewalls = true;
    }
}

/// Errors loading or saving settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid settings TOML.
    Parse(toml::de::Error),
    /// The settings could not be written as TOML.
    Serialize(toml::ser::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "invalid settings: {e}"),
            Self::Serialize(e) => write!(f, "failed to write settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}
