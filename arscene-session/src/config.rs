//! Application configuration
//!
//! Everything the session needs to know up front: how to run tracking,
//! which models the two placement controls refer to, marker size and
//! presentation timings. Loaded from TOML; every field has a default.

use arscene_core::{Error, Result, Viewport};
use arscene_io::ModelLibrary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Visualise detected planes with translucent quads
    pub debug_planes: bool,
    /// Also restart tracking (dropping anchors) when the reset control is pressed
    pub restart_tracking_on_reset: bool,
    pub session: SessionConfig,
    pub models: ModelSlots,
    pub measurement: MeasurementConfig,
    pub ui: UiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug_planes: cfg!(debug_assertions),
            restart_tracking_on_reset: false,
            session: SessionConfig::default(),
            models: ModelSlots::default(),
            measurement: MeasurementConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session cannot work with
    pub fn validate(&self) -> Result<()> {
        let secs = self.ui.message_duration_secs;
        if secs < 0.0 || Duration::try_from_secs_f32(secs).is_err() {
            return Err(Error::Config(format!(
                "ui.message_duration_secs must be a finite, non-negative number of seconds, got {}",
                secs
            )));
        }
        Ok(())
    }

    /// Read and parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load both model slots from disk, resolving relative paths against `base_dir`
    pub fn load_models<P: AsRef<Path>>(&self, base_dir: P) -> Result<ModelLibrary> {
        let mut library = ModelLibrary::new();
        for spec in self.models.iter() {
            let path = base_dir.as_ref().join(&spec.path);
            library.load(&spec.id, path)?;
        }
        Ok(library)
    }
}

/// Tracking session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub plane_detection_horizontal: bool,
    pub light_estimation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plane_detection_horizontal: true,
            light_estimation: true,
        }
    }
}

/// A placeable model: the id it is cloned by and the file it loads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    pub path: PathBuf,
}

impl ModelSpec {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Models behind the two placement controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSlots {
    pub primary: ModelSpec,
    pub secondary: ModelSpec,
}

impl ModelSlots {
    pub fn iter(&self) -> impl Iterator<Item = &ModelSpec> {
        [&self.primary, &self.secondary].into_iter()
    }
}

impl Default for ModelSlots {
    fn default() -> Self {
        Self {
            primary: ModelSpec::new("candle", "models/candle.obj"),
            secondary: ModelSpec::new("chair", "models/chair.obj"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Radius of endpoint markers, in meters
    pub marker_radius: f32,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self { marker_radius: 0.025 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long transient messages stay up
    pub message_duration_secs: f32,
    pub viewport: Viewport,
}

impl UiConfig {
    /// Message lifetime; negative values clamp to zero, unrepresentable ones to `Duration::MAX`
    pub fn message_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.message_duration_secs.max(0.0)).unwrap_or(Duration::MAX)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            message_duration_secs: 2.0,
            viewport: Viewport::new(375.0, 667.0),
        }
    }
}
