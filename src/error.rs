//! Error types for filter construction and estimation runs

use std::path::PathBuf;

/// Rejected filter parameters
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("baseline intensity must be finite, got {0}")]
    NonFiniteBaseline(f32),

    #[error("blend weight must lie in [0, 1], got {0}")]
    BlendWeightOutOfRange(f32),

    #[error("damping must lie in [0, 1], got {0}")]
    DampingOutOfRange(f32),

    #[error("sample stride must be positive, got {0}")]
    InvalidStride(usize),
}

/// Errors raised while loading config, reading frames or writing reports
#[derive(thiserror::Error, Debug)]
pub enum EstimatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Log file error: {0}")]
    Logging(#[from] tracing_appender::rolling::InitError),

    #[error("No frames found in {0:?}")]
    NoFrames(PathBuf),

    #[error("Video error: {0}")]
    Video(String),
}

impl EstimatorError {
    pub fn video<T: ToString>(msg: T) -> Self {
        EstimatorError::Video(msg.to_string())
    }
}
