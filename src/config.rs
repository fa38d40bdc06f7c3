//! Application configuration

use crate::error::{ConfigurationError, EstimatorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Interleaving of the pixel buffers handed to the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    /// One luminance sample per pixel
    Grayscale,
    /// Three interleaved samples per pixel, R then G then B
    #[default]
    Rgb888,
}

impl PixelLayout {
    /// Number of samples making up one pixel
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Grayscale => 1,
            PixelLayout::Rgb888 => 3,
        }
    }
}

impl std::str::FromStr for PixelLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grayscale" | "gray" => Ok(PixelLayout::Grayscale),
            "rgb888" | "rgb" => Ok(PixelLayout::Rgb888),
            other => Err(format!("unknown pixel layout: {other}")),
        }
    }
}

/// Tunables of the luminance smoothing filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "FilterConfigFile")]
pub struct FilterConfig {
    /// Intensity the light starts at, and the value the measurement is blended with
    pub baseline_intensity: f32,
    /// Share of the live measurement in the target intensity (0-1)
    pub blend_weight: f32,
    /// Inertia of the previous output (0-1, higher = smoother but slower)
    pub damping: f32,
    /// Spacing in samples between two sampled pixels
    pub stride: usize,
    pub layout: PixelLayout,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            baseline_intensity: 1.0,
            blend_weight: 1.0,
            damping: 0.6,
            stride: PixelLayout::default().channels(),
            layout: PixelLayout::default(),
        }
    }
}

/// On-disk form of [`FilterConfig`]; a missing stride follows the layout
#[derive(Deserialize)]
#[serde(default)]
struct FilterConfigFile {
    baseline_intensity: f32,
    blend_weight: f32,
    damping: f32,
    stride: Option<usize>,
    layout: PixelLayout,
}

impl Default for FilterConfigFile {
    fn default() -> Self {
        let defaults = FilterConfig::default();
        Self {
            baseline_intensity: defaults.baseline_intensity,
            blend_weight: defaults.blend_weight,
            damping: defaults.damping,
            stride: None,
            layout: defaults.layout,
        }
    }
}

impl From<FilterConfigFile> for FilterConfig {
    fn from(file: FilterConfigFile) -> Self {
        Self {
            baseline_intensity: file.baseline_intensity,
            blend_weight: file.blend_weight,
            damping: file.damping,
            stride: file.stride.unwrap_or_else(|| file.layout.channels()),
            layout: file.layout,
        }
    }
}

impl FilterConfig {
    /// Config for tightly packed RGB buffers, sampling every pixel
    pub fn new(baseline_intensity: f32, blend_weight: f32, damping: f32) -> Self {
        Self {
            baseline_intensity,
            blend_weight,
            damping,
            ..Default::default()
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Switch layout; the stride is reset to the new channel count.
    ///
    /// This discards any stride set earlier, so call
    /// [`with_stride`](Self::with_stride) after this to subsample.
    pub fn with_layout(mut self, layout: PixelLayout) -> Self {
        self.layout = layout;
        self.stride = layout.channels();
        self
    }

    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.baseline_intensity.is_finite() {
            return Err(ConfigurationError::NonFiniteBaseline(
                self.baseline_intensity,
            ));
        }
        if !(0.0..=1.0).contains(&self.blend_weight) {
            return Err(ConfigurationError::BlendWeightOutOfRange(self.blend_weight));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigurationError::DampingOutOfRange(self.damping));
        }
        if self.stride == 0 {
            return Err(ConfigurationError::InvalidStride(self.stride));
        }
        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    /// Frames between two light estimations
    pub frame_interval: u32,
    pub log_dir: PathBuf,
    /// Where to write the sample report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            frame_interval: 5,
            log_dir: Self::app_dir().join("logs"),
            report_path: None,
        }
    }
}

impl Config {
    /// Load config from the user config file or fall back to defaults.
    ///
    /// Runs before logging is set up, so a broken file is handed back next to
    /// the defaults for the caller to report.
    pub fn load() -> (Self, Option<EstimatorError>) {
        Self::load_or_default(&Self::config_path())
    }

    /// Load `path` if it exists; defaults plus the error if it cannot be read
    pub fn load_or_default(path: &Path) -> (Self, Option<EstimatorError>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, EstimatorError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the user config file
    pub fn save(&self) -> Result<(), EstimatorError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), EstimatorError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default())
            .join("AmbientLight")
            .join("config.json")
    }

    fn app_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default())
            .join("AmbientLight")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stride_matches_layout() {
        let config = FilterConfig::default();
        assert_eq!(config.stride, 3);
        assert_eq!(config.with_layout(PixelLayout::Grayscale).stride, 1);
    }

    #[test]
    fn rejects_out_of_range_weights() {
        let config = FilterConfig::new(1.0, 1.5, 0.6);
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::BlendWeightOutOfRange(1.5))
        );

        let config = FilterConfig::new(1.0, 0.5, -0.1);
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::DampingOutOfRange(-0.1))
        );
    }

    #[test]
    fn rejects_nan_and_zero_stride() {
        assert!(FilterConfig::new(1.0, f32::NAN, 0.6).validate().is_err());
        assert!(FilterConfig::new(1.0, 0.5, f32::NAN).validate().is_err());
        assert!(FilterConfig::new(f32::INFINITY, 0.5, 0.6)
            .validate()
            .is_err());
        assert_eq!(
            FilterConfig::default().with_stride(0).validate(),
            Err(ConfigurationError::InvalidStride(0))
        );
    }

    #[test]
    fn accepts_bounds() {
        assert!(FilterConfig::new(0.0, 0.0, 0.0).validate().is_ok());
        assert!(FilterConfig::new(-2.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn parses_layout_names() {
        assert_eq!("gray".parse::<PixelLayout>(), Ok(PixelLayout::Grayscale));
        assert_eq!("RGB888".parse::<PixelLayout>(), Ok(PixelLayout::Rgb888));
        assert!("yuv".parse::<PixelLayout>().is_err());
    }

    #[test]
    fn missing_stride_follows_layout() {
        let filter: FilterConfig = serde_json::from_str(r#"{ "layout": "grayscale" }"#).unwrap();
        assert_eq!(filter.layout, PixelLayout::Grayscale);
        assert_eq!(filter.stride, filter.layout.channels());

        let filter: FilterConfig =
            serde_json::from_str(r#"{ "layout": "grayscale", "stride": 8 }"#).unwrap();
        assert_eq!(filter.stride, 8);

        let config: Config =
            serde_json::from_str(r#"{ "filter": { "layout": "grayscale" } }"#).unwrap();
        assert_eq!(config.filter.stride, 1);
    }

    #[test]
    fn with_layout_resets_stride() {
        let config = FilterConfig::default().with_stride(6).with_layout(PixelLayout::Rgb888);
        assert_eq!(config.stride, 3);

        let config = FilterConfig::default().with_layout(PixelLayout::Rgb888).with_stride(6);
        assert_eq!(config.stride, 6);
    }

    #[test]
    fn malformed_file_falls_back_with_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load_from(&path), Err(EstimatorError::Json(_))));

        let (config, error) = Config::load_or_default(&path);
        assert_eq!(config, Config::default());
        assert!(matches!(error, Some(EstimatorError::Json(_))));
    }

    #[test]
    fn missing_file_uses_defaults_silently() {
        let dir = tempfile::TempDir::new().unwrap();
        let (config, error) = Config::load_or_default(&dir.path().join("absent.json"));
        assert_eq!(config, Config::default());
        assert!(error.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.frame_interval = 2;
        config.filter = FilterConfig::new(0.8, 0.5, 0.3).with_layout(PixelLayout::Grayscale);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "filter": { "damping": 0.9 }, "frame_interval": 1 }"#)
                .unwrap();
        assert_eq!(config.frame_interval, 1);
        assert_eq!(config.filter.damping, 0.9);
        assert_eq!(config.filter.blend_weight, 1.0);
        assert_eq!(config.filter.layout, PixelLayout::Rgb888);
    }
}
