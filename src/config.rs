//! Figure configuration.
//!
//! Loaded from YAML; every field has a default so an empty document is a
//! valid configuration.

use crate::camera::Camera;
use crate::color::Rgba;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Figure size, appearance and output target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Window/figure title.
    #[serde(default)]
    pub title: Option<String>,

    /// Figure width in pixels.
    #[serde(default = "default_size")]
    pub width: u32,

    /// Figure height in pixels.
    #[serde(default = "default_size")]
    pub height: u32,

    /// Padding around each panel in pixels.
    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Background color spec.
    #[serde(default = "default_background")]
    pub background: String,

    /// 3D camera angles.
    #[serde(default)]
    pub camera: CameraConfig,

    /// Where `show` sends the rendered figure.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_size() -> u32 {
    800
}
fn default_margin() -> u32 {
    40
}
fn default_background() -> String {
    "white".to_string()
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: default_size(),
            height: default_size(),
            margin: default_margin(),
            background: default_background(),
            camera: CameraConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Camera angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Rotation about the vertical axis.
    #[serde(default = "default_azimuth")]
    pub azimuth: f32,

    /// Angle above the horizontal plane.
    #[serde(default = "default_elevation")]
    pub elevation: f32,
}

fn default_azimuth() -> f32 {
    -60.0
}
fn default_elevation() -> f32 {
    30.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth: default_azimuth(),
            elevation: default_elevation(),
        }
    }
}

impl CameraConfig {
    /// Build the camera these angles describe.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::from_degrees(self.azimuth, self.elevation)
    }
}

/// Output target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// PNG file at `path`.
    Png,
    /// SVG file at `path`.
    Svg,
    /// Text rendering on stdout.
    #[default]
    Terminal,
}

/// Character set used for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStyle {
    /// Luminance ramp of ASCII characters.
    Ascii,
    /// Unicode half blocks with ANSI true color.
    #[default]
    Unicode,
}

/// Output section of [`FigureConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Target kind.
    #[serde(default)]
    pub kind: OutputKind,

    /// File path for PNG and SVG output.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Character set for terminal output.
    #[serde(default)]
    pub terminal: TerminalStyle,

    /// Terminal width in columns; 0 picks one column per 8 pixels.
    #[serde(default)]
    pub columns: u32,
}

impl FigureConfig {
    /// Defaults with a title.
    #[must_use]
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with the line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::Config {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Parsed background color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for an unparseable spec.
    pub fn background_color(&self) -> Result<Rgba> {
        Rgba::parse(&self.background)
    }
}
