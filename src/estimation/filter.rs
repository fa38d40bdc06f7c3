//! Luminance smoothing filter
//!
//! Turns a raw pixel buffer into a scene brightness estimate, blends it with
//! the baseline intensity and exponentially smooths it against the previous
//! output.

use crate::config::{FilterConfig, PixelLayout};
use crate::error::ConfigurationError;

/// Rec. 601 luma weights
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Scale applied to the normalized luminance before blending
const MEASUREMENT_GAIN: f64 = 8.0;

/// Intermediate values of one measurement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Mean luminance of the sampled windows, in [0, 1]
    pub normalized: f64,
    /// Gained measurement (8 * normalized)
    pub raw: f64,
    /// Measurement blended with the baseline, floored at 0
    pub blended: f32,
    /// Number of sample windows read
    pub windows: usize,
}

/// Exponentially smoothed light intensity driven by pixel buffers
#[derive(Clone, Debug)]
pub struct LuminanceFilter {
    config: FilterConfig,
    intensity: f32,
}

impl LuminanceFilter {
    pub fn new(config: FilterConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            intensity: config.baseline_intensity,
            config,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Current smoothed intensity
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Forget the smoothing history and start over from the baseline
    pub fn reset(&mut self) {
        self.intensity = self.config.baseline_intensity;
    }

    /// Measure a buffer without touching the filter state.
    ///
    /// Returns `None` when the buffer holds no complete sample window.
    pub fn measure(&self, buffer: &[u8]) -> Option<Measurement> {
        let channels = self.config.layout.channels();
        let mut total = 0.0_f64;
        let mut windows = 0_usize;

        // A window is only read if all of its samples are in range, so the
        // incomplete trailing window is skipped.
        for p in (0..buffer.len()).step_by(self.config.stride) {
            let Some(window) = buffer.get(p..p + channels) else {
                break;
            };
            total += window_luma(self.config.layout, window);
            windows += 1;
        }

        if windows == 0 {
            return None;
        }

        let mut normalized = total;
        normalized /= windows as f64;
        normalized /= 255.0;

        let raw = MEASUREMENT_GAIN * normalized;
        let weight = self.config.blend_weight;
        let blended = (raw * weight as f64) as f32 + self.config.baseline_intensity * (1.0 - weight);

        Some(Measurement {
            normalized,
            raw,
            blended: blended.max(0.0),
            windows,
        })
    }

    /// Feed one pixel buffer and return the new smoothed intensity.
    ///
    /// Buffers without a complete sample window leave the intensity unchanged.
    pub fn sample(&mut self, buffer: &[u8]) -> f32 {
        let Some(measurement) = self.measure(buffer) else {
            tracing::trace!(len = buffer.len(), "No sample window, keeping intensity");
            return self.intensity;
        };

        let damping = self.config.damping;
        self.intensity = self.intensity * damping + measurement.blended * (1.0 - damping);

        tracing::trace!(
            windows = measurement.windows,
            raw = measurement.raw,
            blended = measurement.blended,
            intensity = self.intensity,
            "Sampled luminance"
        );

        self.intensity
    }
}

fn window_luma(layout: PixelLayout, window: &[u8]) -> f64 {
    match layout {
        PixelLayout::Grayscale => window[0] as f64,
        PixelLayout::Rgb888 => {
            window[0] as f64 * LUMA_R + window[1] as f64 * LUMA_G + window[2] as f64 * LUMA_B
        }
    }
}
