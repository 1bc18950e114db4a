//! Configuration file handling for linesense.
//!
//! Loads configuration from `~/.config/linesense/config.toml` or a
//! custom path; missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::PipelineSettings;

/// Configuration file structure for linesense.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detect: DetectConfig,
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub serial: SerialConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Acquisition loop rate in Hz
    #[serde(default = "default_fps")]
    pub fps: u32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct DetectConfig {
    /// Bias subtracted from the frame mean (15-40 recommended)
    #[serde(default = "default_threshold_offset")]
    pub threshold_offset: i32,
    /// Minimum foreground pixels per band
    #[serde(default = "default_min_pixels")]
    pub min_pixels: u32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SteeringConfig {
    /// EMA weight, 0 < alpha <= 1; higher reacts faster
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct SerialConfig {
    /// Serial device node (e.g. /dev/ttyUSB0); stdout when unset
    pub path: Option<PathBuf>,
}

fn default_width() -> u32 {
    160
}
fn default_height() -> u32 {
    120
}
fn default_fps() -> u32 {
    100
}
fn default_threshold_offset() -> i32 {
    25
}
fn default_min_pixels() -> u32 {
    800
}
fn default_alpha() -> f32 {
    0.3
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            threshold_offset: default_threshold_offset(),
            min_pixels: default_min_pixels(),
        }
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// Returns the default config if the file doesn't exist, an error
    /// if it exists but cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        let config = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.steering.alpha > 0.0 && self.steering.alpha <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "steering.alpha must be in (0, 1], got {}",
                self.steering.alpha
            )));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::Invalid(
                "camera.width and camera.height must be greater than 0".to_string(),
            ));
        }
        if self.camera.fps == 0 {
            return Err(ConfigError::Invalid(
                "camera.fps must be greater than 0".to_string(),
            ));
        }
        if !(15..=40).contains(&self.detect.threshold_offset) {
            log::warn!(
                "detect.threshold_offset={} is outside the recommended 15-40 range",
                self.detect.threshold_offset
            );
        }
        Ok(())
    }

    /// Pipeline tuning derived from this config.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            frame_interval: Duration::from_millis(1000 / self.camera.fps as u64),
            threshold_offset: self.detect.threshold_offset,
            min_pixels: self.detect.min_pixels,
            alpha: self.steering.alpha,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("linesense/config.toml")
}

/// Commented template written by `config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = "\
# linesense configuration

[camera]
# Frame size the source delivers
width = 160
height = 120
# Acquisition loop rate in Hz
fps = 100

[detect]
# Threshold = frame mean minus this bias (15-40 recommended)
threshold_offset = 25
# Minimum foreground pixels for a band to count as seeing the line
min_pixels = 800

[steering]
# EMA weight, 0 < alpha <= 1; higher reacts faster
alpha = 0.3

[serial]
# Serial device to transmit on; comment out to print to stdout
# path = \"/dev/ttyUSB0\"
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = Config::load(Some(Path::new("/nonexistent/linesense.toml"))).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.camera.width, 160);
        assert_eq!(config.detect.min_pixels, 800);
        assert!(config.serial.path.is_none());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[detect]\nthreshold_offset = 30").expect("write");
        let config = Config::load(Some(file.path())).expect("load");
        assert_eq!(config.detect.threshold_offset, 30);
        assert_eq!(config.detect.min_pixels, 800);
        assert_eq!(config.steering.alpha, 0.3);
    }

    #[test]
    fn test_load_serial_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[serial]\npath = \"/dev/ttyUSB0\"").expect("write");
        let config = Config::load(Some(file.path())).expect("load");
        assert_eq!(config.serial.path, Some(PathBuf::from("/dev/ttyUSB0")));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "not valid toml [").expect("write");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(format!("{err}").contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[steering]\nalpha = 0.0").expect("write");
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[steering]\nalpha = 1.5").expect("write");
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template parses");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_pipeline_settings_from_config() {
        let config = Config::default();
        let settings = config.pipeline_settings();
        assert_eq!(settings.frame_interval, Duration::from_millis(10));
        assert_eq!(settings.threshold_offset, 25);
        assert_eq!(settings.min_pixels, 800);
    }
}
