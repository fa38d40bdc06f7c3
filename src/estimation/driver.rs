//! Frame-driven light estimation
//!
//! The host feeds every camera frame to a [`LightEstimator`], which samples
//! the filter every `frame_interval` frames and hands the resulting intensity
//! to a [`LightSink`].

use super::filter::LuminanceFilter;
use super::report::{SampleRecord, SampleReport};
use crate::capture::CameraFrame;
use crate::config::Config;
use crate::error::{ConfigurationError, EstimatorError};

/// Receives every intensity the estimator emits (e.g. a scene light)
pub trait LightSink {
    fn apply_intensity(&mut self, record: SampleRecord);
}

impl LightSink for SampleReport {
    fn apply_intensity(&mut self, record: SampleRecord) {
        self.samples.push(record);
    }
}

impl<F: FnMut(SampleRecord)> LightSink for F {
    fn apply_intensity(&mut self, record: SampleRecord) {
        self(record)
    }
}

/// Totals of one [`LightEstimator::run`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub frames_seen: u64,
    pub samples_emitted: u64,
    pub final_intensity: f32,
}

/// Applies the sampling cadence and pause state around a filter
#[derive(Clone, Debug)]
pub struct LightEstimator {
    filter: LuminanceFilter,
    frame_interval: u32,
    /// Frames left before the next sample; sample when it reaches 0
    countdown: u32,
    paused: bool,
}

impl LightEstimator {
    pub fn new(filter: LuminanceFilter, frame_interval: u32) -> Self {
        Self {
            filter,
            frame_interval,
            countdown: 0,
            paused: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let filter = LuminanceFilter::new(config.filter)?;
        Ok(Self::new(filter, config.frame_interval))
    }

    pub fn filter(&self) -> &LuminanceFilter {
        &self.filter
    }

    pub fn intensity(&self) -> f32 {
        self.filter.intensity()
    }

    pub fn frame_interval(&self) -> u32 {
        self.frame_interval
    }

    /// Stop sampling until [`resume`](Self::resume) is called
    pub fn pause(&mut self) {
        if !self.paused {
            tracing::info!("Light estimation paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            tracing::info!("Light estimation resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Handle one camera frame.
    ///
    /// Returns the new intensity on sampling frames, `None` otherwise. A
    /// missing image on a sampling frame keeps the current intensity.
    pub fn on_frame(&mut self, pixels: Option<&[u8]>) -> Option<f32> {
        if self.paused {
            return None;
        }

        let mut sampled = None;
        if self.countdown == 0 {
            self.countdown = self.frame_interval;
            sampled = Some(self.filter.sample(pixels.unwrap_or_default()));
        }
        self.countdown = self.countdown.saturating_sub(1);

        sampled
    }

    /// Feed every frame of a source, forwarding emitted intensities to `sink`.
    ///
    /// Stops at the first frame the source fails to deliver.
    pub fn run<I, S>(&mut self, frames: I, sink: &mut S) -> Result<RunSummary, EstimatorError>
    where
        I: IntoIterator<Item = Result<CameraFrame, EstimatorError>>,
        S: LightSink + ?Sized,
    {
        let mut frames_seen = 0;
        let mut samples_emitted = 0;

        for frame in frames {
            let frame = frame?;
            frames_seen += 1;

            if let Some(intensity) = self.on_frame(Some(&frame.pixels)) {
                samples_emitted += 1;
                tracing::debug!(frame = frame.index, intensity, "Estimated light intensity");
                sink.apply_intensity(SampleRecord {
                    frame_index: frame.index,
                    intensity,
                    timestamp_secs: frame.timestamp_secs,
                });
            }
        }

        tracing::info!(
            "Processed {} frames, {} light estimations",
            frames_seen,
            samples_emitted
        );

        Ok(RunSummary {
            frames_seen,
            samples_emitted,
            final_intensity: self.intensity(),
        })
    }
}
