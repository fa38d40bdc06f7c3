//! Sample report for tracking estimated intensities during a run
//!
//! Every intensity the estimator emits is recorded with its frame index so a
//! run can be inspected or replayed against a renderer later.

use crate::config::PixelLayout;
use crate::error::EstimatorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One emitted light intensity
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub frame_index: u64,
    pub intensity: f32,
    /// Presentation time of the frame, when the source knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_secs: Option<f32>,
}

/// Describes where the samples came from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source: String,
    pub layout: PixelLayout,
    pub frame_interval: u32,
}

/// Report with metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub metadata: ReportMetadata,
    pub samples: Vec<SampleRecord>,
}

impl SampleReport {
    pub fn new(metadata: ReportMetadata) -> Self {
        Self {
            metadata,
            samples: Vec::new(),
        }
    }

    /// Last recorded intensity
    pub fn last_intensity(&self) -> Option<f32> {
        self.samples.last().map(|s| s.intensity)
    }
}

/// Save report to JSON file
pub fn save_report(report: &SampleReport, path: &Path) -> Result<(), EstimatorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load report from JSON file
pub fn load_report(path: &Path) -> Result<SampleReport, EstimatorError> {
    let json = std::fs::read_to_string(path)?;
    let report: SampleReport = serde_json::from_str(&json)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("runs").join("report.json");

        let mut report = SampleReport::new(ReportMetadata {
            source: "frames/".to_string(),
            layout: PixelLayout::Grayscale,
            frame_interval: 5,
        });
        report.samples.push(SampleRecord {
            frame_index: 0,
            intensity: 0.75,
            timestamp_secs: None,
        });
        report.samples.push(SampleRecord {
            frame_index: 5,
            intensity: 0.5,
            timestamp_secs: Some(0.2),
        });

        save_report(&report, &path).unwrap();
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.last_intensity(), Some(0.5));
    }

    #[test]
    fn omits_missing_timestamps() {
        let record = SampleRecord {
            frame_index: 3,
            intensity: 1.0,
            timestamp_secs: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("timestamp_secs"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_report(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, EstimatorError::Io(_)));
    }
}
