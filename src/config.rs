//! Application configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes. Files are TOML or RON, picked by extension.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::ProjectionKind;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("ron") => Ok(Format::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Savanna Diorama".to_string(),
            width: 1000,
            height: 800,
        }
    }
}

/// Start pose and behaviour of the camera. Angles are in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub projection: ProjectionKind,
    pub ortho_half_height: f32,
    /// Units per second.
    pub speed: f32,
    /// Degrees per second the arrow keys turn the view.
    pub turn_rate: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 12.0, 38.0],
            yaw: -90.0,
            pitch: -15.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 200.0,
            projection: ProjectionKind::Perspective,
            ortho_half_height: 20.0,
            speed: 10.0,
            turn_rate: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Directory texture paths are resolved against.
    pub assets_dir: PathBuf,
    /// Scene file to draw instead of the built-in savanna.
    pub scene: Option<PathBuf>,
    pub clear_colour: [f64; 4],
    pub camera: CameraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets_dir: PathBuf::from("assets"),
            scene: None,
            clear_colour: [0.0, 0.0, 0.0, 1.0],
            camera: CameraConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;
        let config = match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}
