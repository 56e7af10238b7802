//! Serializable pipeline configuration
//!
//! ```json
//! {
//!   "features": [
//!     { "type": "inst_velocity", "mode": "xy" },
//!     { "type": "rate_of_change",
//!       "numerator": { "raw": "pressure" },
//!       "denominator": { "raw": "time" } },
//!     { "type": "smoothing",
//!       "source": { "feature": { "type": "acceleration", "mode": "x" } },
//!       "window": 15 }
//!   ],
//!   "include_raw": true,
//!   "sanitize": { "infinity": "clamp_to_observed", "nan": { "replace": 0.0 } },
//!   "batch_policy": "skip_invalid",
//!   "thread_count": 0
//! }
//! ```
//!
//! Modes and raw references are validated when the configuration is built
//! into extractors, before any recording is processed.

use std::sync::Arc;

use ink_core::RawField;
use serde::{Deserialize, Serialize};

use crate::derived::{Change, DEFAULT_SMOOTHING_WINDOW, MedianSmoothing, RateOfChange};
use crate::error::FeatureResult;
use crate::extractor::{SharedExtractor, Source};
use crate::id::Mode;
use crate::kinematics::{
    Acceleration, ChangeInAcceleration, ChangeInTime, ChangeInVelocity, Displacement, Distance,
    InstantaneousVelocity, Jerk, Slope,
};
use crate::outcome::BatchPolicy;
use crate::sanitize::SanitizeConfig;

const ALL_MODES: &[Mode] = &[Mode::X, Mode::Y, Mode::Xy];
const AXIS_MODES: &[Mode] = &[Mode::X, Mode::Y];

fn default_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

/// Raw column reference by schema position or name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Index(usize),
    Name(String),
}

/// Input of a generic extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    Raw(RawRef),
    Feature(Box<ExtractorConfig>),
}

impl SourceConfig {
    pub fn raw(field: RawField) -> Self {
        Self::Raw(RawRef::Name(field.name().to_string()))
    }

    pub fn feature(config: ExtractorConfig) -> Self {
        Self::Feature(Box::new(config))
    }

    pub fn build(&self) -> FeatureResult<Source> {
        match self {
            Self::Raw(RawRef::Index(index)) => Source::raw_index(*index),
            Self::Raw(RawRef::Name(name)) => Source::raw_name(name),
            Self::Feature(config) => Ok(Source::Feature(config.build()?)),
        }
    }
}

/// Descriptor of one extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractorConfig {
    Displacement {
        mode: String,
    },
    Distance {
        mode: String,
    },
    ChangeInTime,
    #[serde(rename = "inst_velocity")]
    InstantaneousVelocity {
        mode: String,
    },
    ChangeInVelocity {
        mode: String,
    },
    Acceleration {
        mode: String,
    },
    ChangeInAcceleration {
        mode: String,
    },
    Jerk {
        mode: String,
    },
    Slope,
    Change {
        source: SourceConfig,
    },
    RateOfChange {
        numerator: SourceConfig,
        denominator: SourceConfig,
    },
    Smoothing {
        source: SourceConfig,
        #[serde(default = "default_window")]
        window: usize,
    },
}

impl ExtractorConfig {
    /// Short helper for mode-carrying variants
    pub fn velocity(mode: Mode) -> Self {
        Self::InstantaneousVelocity {
            mode: mode.to_string(),
        }
    }

    pub fn acceleration(mode: Mode) -> Self {
        Self::Acceleration {
            mode: mode.to_string(),
        }
    }

    pub fn jerk(mode: Mode) -> Self {
        Self::Jerk {
            mode: mode.to_string(),
        }
    }

    pub fn distance(mode: Mode) -> Self {
        Self::Distance {
            mode: mode.to_string(),
        }
    }

    pub fn rate_of_change(numerator: RawField, denominator: RawField) -> Self {
        Self::RateOfChange {
            numerator: SourceConfig::raw(numerator),
            denominator: SourceConfig::raw(denominator),
        }
    }

    pub fn smoothing(source: SourceConfig, window: usize) -> Self {
        Self::Smoothing { source, window }
    }

    /// Construct the extractor, validating modes, windows and raw references
    pub fn build(&self) -> FeatureResult<SharedExtractor> {
        let extractor: SharedExtractor = match self {
            Self::Displacement { mode } => {
                Arc::new(Displacement::new(Mode::parse_for("displacement", mode, AXIS_MODES)?)?)
            }
            Self::Distance { mode } => {
                Arc::new(Distance::new(Mode::parse_for("distance", mode, ALL_MODES)?))
            }
            Self::ChangeInTime => Arc::new(ChangeInTime),
            Self::InstantaneousVelocity { mode } => Arc::new(InstantaneousVelocity::new(
                Mode::parse_for("inst_velocity", mode, ALL_MODES)?,
            )),
            Self::ChangeInVelocity { mode } => Arc::new(ChangeInVelocity::new(Mode::parse_for(
                "change_in_velocity",
                mode,
                ALL_MODES,
            )?)),
            Self::Acceleration { mode } => Arc::new(Acceleration::new(Mode::parse_for(
                "acceleration",
                mode,
                ALL_MODES,
            )?)),
            Self::ChangeInAcceleration { mode } => Arc::new(ChangeInAcceleration::new(
                Mode::parse_for("change_in_acceleration", mode, ALL_MODES)?,
            )),
            Self::Jerk { mode } => Arc::new(Jerk::new(Mode::parse_for("jerk", mode, ALL_MODES)?)),
            Self::Slope => Arc::new(Slope),
            Self::Change { source } => Change::of(source.build()?),
            Self::RateOfChange {
                numerator,
                denominator,
            } => Arc::new(RateOfChange::new(numerator.build()?, denominator.build()?)),
            Self::Smoothing { source, window } => {
                Arc::new(MedianSmoothing::new(source.build()?, *window)?)
            }
        };
        Ok(extractor)
    }
}

/// Feature pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Requested features, in output column order
    pub features: Vec<ExtractorConfig>,

    /// Prepend the six raw columns
    pub include_raw: bool,

    /// Post-extraction handling of non-finite values
    pub sanitize: SanitizeConfig,

    /// Failure handling across recordings
    pub batch_policy: BatchPolicy,

    /// Number of worker threads (0 = auto)
    pub thread_count: usize,
}

impl PipelineConfig {
    /// Velocity, acceleration and jerk in every mode, pen-state rates of
    /// change over time, and smoothed pressure, orientation and speed
    pub fn kinematics() -> Self {
        let mut features = vec![
            ExtractorConfig::distance(Mode::Xy),
            ExtractorConfig::ChangeInTime,
        ];
        for mode in [Mode::X, Mode::Y, Mode::Xy] {
            features.push(ExtractorConfig::velocity(mode));
            features.push(ExtractorConfig::acceleration(mode));
            features.push(ExtractorConfig::jerk(mode));
        }
        features.push(ExtractorConfig::Slope);
        for field in [RawField::Pressure, RawField::Altitude, RawField::Azimuth] {
            features.push(ExtractorConfig::rate_of_change(field, RawField::Time));
        }
        for field in [RawField::Pressure, RawField::Altitude, RawField::Azimuth] {
            features.push(ExtractorConfig::smoothing(
                SourceConfig::raw(field),
                DEFAULT_SMOOTHING_WINDOW,
            ));
        }
        features.push(ExtractorConfig::smoothing(
            SourceConfig::feature(ExtractorConfig::velocity(Mode::Xy)),
            DEFAULT_SMOOTHING_WINDOW,
        ));

        Self {
            features,
            include_raw: true,
            ..Default::default()
        }
    }

    /// Append a requested feature
    pub fn with_feature(mut self, feature: ExtractorConfig) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_raw(mut self, include: bool) -> Self {
        self.include_raw = include;
        self
    }

    pub fn with_sanitize(mut self, sanitize: SanitizeConfig) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    /// Set thread count
    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Build every requested extractor, in order
    pub fn build_extractors(&self) -> FeatureResult<Vec<SharedExtractor>> {
        self.features.iter().map(ExtractorConfig::build).collect()
    }

    pub fn from_json(json: &str) -> FeatureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> FeatureResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
