//! Ambient light estimation from camera frames
//!
//! A [`LuminanceFilter`] turns pixel buffers into a smoothed light intensity;
//! a [`LightEstimator`] drives it from a stream of frames on a fixed cadence.

pub mod capture;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod estimation;

pub use config::{Config, FilterConfig, PixelLayout};
pub use error::{ConfigurationError, EstimatorError};
pub use estimation::{LightEstimator, LightSink, LuminanceFilter, SampleRecord, SampleReport};
