//! Error types for feature extraction

use ink_core::CoreError;
use thiserror::Error;

/// Feature extraction errors
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid mode '{mode}' for {extractor} (expected one of: {expected})")]
    InvalidMode {
        extractor: &'static str,
        mode: String,
        expected: &'static str,
    },

    #[error("Invalid smoothing window: {0} (must be > 0)")]
    InvalidWindow(usize),

    #[error("Feature requested more than once: {0}")]
    DuplicateFeature(String),

    #[error("Distinct features share the name '{0}'")]
    NameCollision(String),

    #[error("Feature depends on itself: {0}")]
    DependencyCycle(String),

    #[error("Raw schema error: {0}")]
    Core(#[from] CoreError),

    #[error("Feature '{feature}' produced {actual} values, expected {expected}")]
    LengthMismatch {
        feature: String,
        expected: usize,
        actual: usize,
    },

    #[error("Dependency '{0}' was not materialized before use")]
    Unresolved(String),

    #[error("Recording '{recording}' failed: {source}")]
    Recording {
        recording: String,
        #[source]
        source: Box<FeatureError>,
    },

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FeatureError {
    /// True for errors raised while building extractors or pipelines
    ///
    /// Configuration errors never depend on a particular recording; shape
    /// and contract errors do.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::InvalidConfig(_)
            | Self::InvalidMode { .. }
            | Self::InvalidWindow(_)
            | Self::DuplicateFeature(_)
            | Self::NameCollision(_)
            | Self::DependencyCycle(_)
            | Self::Serialization(_) => true,
            Self::Core(err) => matches!(
                err,
                CoreError::UnknownField(_) | CoreError::FieldIndexOutOfRange { .. }
            ),
            Self::Recording { source, .. } => source.is_configuration(),
            Self::LengthMismatch { .. }
            | Self::Unresolved(_)
            | Self::Resample(_)
            | Self::ThreadPool(_) => false,
        }
    }

    /// Attach the recording identity to an error
    pub fn in_recording(self, recording: &str) -> Self {
        match self {
            Self::Recording { .. } => self,
            other => Self::Recording {
                recording: recording.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type for feature operations
pub type FeatureResult<T> = Result<T, FeatureError>;
