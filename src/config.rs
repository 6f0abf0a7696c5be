//! Dashboard configuration loaded from YAML.
//!
//! Lookup order: an explicit path (first CLI argument), then
//! `$HOME/.spriview/dashboard.yaml`, then the built-in defaults. Every
//! field is optional in the file; missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bus::{BrokerConfig, CommandType, Topics};
use crate::color_scheme::ColorScheme;
use crate::data::frames::DEFAULT_CAPACITY;
use crate::error::ConfigError;

/// One frame chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Name of the value field, shown in the chart title.
    pub field: String,
    /// Frame source; appended to the frames topic.
    pub source: String,
    /// Subtract a zero frame from every displayed value.
    pub baseline: bool,
    /// Maximum number of frames kept.
    pub capacity: usize,
    /// Channel id per channel index; missing entries use the index.
    pub channel_ids: Vec<u32>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            field: "Mean".to_string(),
            source: "mzi".to_string(),
            baseline: false,
            capacity: DEFAULT_CAPACITY,
            channel_ids: Vec::new(),
        }
    }
}

/// A slider that publishes its value on release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    pub cmd: CommandType,
    pub min: f64,
    pub max: f64,
}

impl SliderConfig {
    pub fn new(cmd: CommandType, min: f64, max: f64) -> Self {
        Self { cmd, min, max }
    }
}

/// The control column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enabled: bool,
    pub sliders: Vec<SliderConfig>,
    pub buttons: Vec<CommandType>,
    pub listeners: Vec<CommandType>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        use CommandType::*;
        Self {
            enabled: true,
            sliders: vec![
                SliderConfig::new(SetPump, 0.0, 255.0),
                SliderConfig::new(SetMeasureMasterNFrames, 4.0, 20.0),
                SliderConfig::new(SetDarkMasterDelaySecs, 1.0, 10.0),
                SliderConfig::new(SetFlatMasterDelaySecs, 1.0, 10.0),
                SliderConfig::new(SetCameraTargetExposureMs, 10.0, 100.0),
                SliderConfig::new(SetCameraTargetExposureOnFlatMs, 10.0, 100.0),
                SliderConfig::new(SetCameraAoiX, 0.0, 1400.0),
                SliderConfig::new(SetCameraAoiY, 0.0, 1400.0),
            ],
            buttons: vec![
                ExecuteSpotDetectionSequence,
                StartCamera,
                StopCamera,
                GetCameraAoiX,
                GetCameraAoiY,
            ],
            listeners: vec![GetCameraAoiX, GetCameraAoiY],
        }
    }
}

/// Complete dashboard configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub theme: ColorScheme,
    pub broker: BrokerConfig,
    pub topics: Topics,
    pub charts: Vec<ChartConfig>,
    /// Image channel names; appended to the images topic.
    pub images: Vec<String>,
    pub histogram: bool,
    pub controls: ControlsConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "SPRi App".to_string(),
            theme: ColorScheme::default(),
            broker: BrokerConfig::default(),
            topics: Topics::default(),
            charts: vec![
                ChartConfig {
                    baseline: true,
                    ..ChartConfig::default()
                },
                ChartConfig::default(),
            ],
            images: vec!["drawing".to_string(), "raw".to_string()],
            histogram: true,
            controls: ControlsConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Default config file location, if `$HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".spriview").join("dashboard.yaml"))
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_yaml_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `explicit`, else the default path if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let cfg = Self::load_from_path(path)?;
            log::info!("Loaded configuration from {:?}", path);
            return Ok(cfg);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                let cfg = Self::load_from_path(&path)?;
                log::info!("Loaded configuration from {:?}", path);
                Ok(cfg)
            }
            _ => {
                log::info!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.url.trim().is_empty() {
            return Err(ConfigError::Invalid("broker.url must not be empty".into()));
        }
        for chart in &self.charts {
            if chart.source.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "chart {:?} has an empty source",
                    chart.field
                )));
            }
            if chart.capacity == 0 {
                return Err(ConfigError::Invalid(format!(
                    "chart {:?} must keep at least one frame",
                    chart.field
                )));
            }
        }
        for slider in &self.controls.sliders {
            if !(slider.min < slider.max) {
                return Err(ConfigError::Invalid(format!(
                    "slider {} has an empty range [{}, {}]",
                    slider.cmd, slider.min, slider.max
                )));
            }
        }
        Ok(())
    }
}
