//! Typed feature identifiers
//!
//! Cache entries are keyed by [`FeatureId`], never by formatted strings.
//! The string form (`Display`) is only used for output column names.

use std::fmt;
use std::str::FromStr;

use ink_core::RawField;
use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, FeatureResult};

/// Spatial mode of a kinematic feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Horizontal component
    X,
    /// Vertical component
    Y,
    /// Planar (Euclidean) magnitude
    Xy,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Xy => "xy",
        }
    }

    /// Parse a mode for the named extractor, accepting only `allowed`
    pub fn parse_for(extractor: &'static str, mode: &str, allowed: &[Mode]) -> FeatureResult<Self> {
        let parsed = mode.parse::<Mode>().ok().filter(|m| allowed.contains(m));
        parsed.ok_or_else(|| FeatureError::InvalidMode {
            extractor,
            mode: mode.to_string(),
            expected: if allowed.contains(&Mode::Xy) {
                "x, y, xy"
            } else {
                "x, y"
            },
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = FeatureError;

    fn from_str(s: &str) -> FeatureResult<Self> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "xy" => Ok(Self::Xy),
            _ => Err(FeatureError::InvalidMode {
                extractor: "mode",
                mode: s.to_string(),
                expected: "x, y, xy",
            }),
        }
    }
}

/// Identity of a derived feature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureId {
    Displacement(Mode),
    Distance(Mode),
    ChangeInTime,
    Velocity(Mode),
    ChangeInVelocity(Mode),
    Acceleration(Mode),
    ChangeInAcceleration(Mode),
    Jerk(Mode),
    Slope,
    Change(Box<SourceId>),
    RateOfChange(Box<SourceId>, Box<SourceId>),
    Smoothed { source: Box<SourceId>, window: usize },
    /// User-defined extractor
    Custom(String),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Displacement(mode) => write!(f, "displacement_{mode}"),
            Self::Distance(mode) => write!(f, "distance_{mode}"),
            Self::ChangeInTime => f.write_str("change_in_time"),
            Self::Velocity(mode) => write!(f, "inst_velocity_{mode}"),
            Self::ChangeInVelocity(mode) => write!(f, "change_in_velocity_{mode}"),
            Self::Acceleration(mode) => write!(f, "acceleration_{mode}"),
            Self::ChangeInAcceleration(mode) => write!(f, "change_in_acceleration_{mode}"),
            Self::Jerk(mode) => write!(f, "jerk_{mode}"),
            Self::Slope => f.write_str("slope"),
            Self::Change(source) => write!(f, "change_in_{source}"),
            Self::RateOfChange(numerator, denominator) => {
                write!(f, "roc_{numerator}_{denominator}")
            }
            Self::Smoothed { source, window } => write!(f, "smoothed_{source}_w{window}"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Identity of anything an extractor can read: a raw column or a feature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    Raw(RawField),
    Feature(FeatureId),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(field) => f.write_str(field.name()),
            Self::Feature(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl From<RawField> for SourceId {
    fn from(field: RawField) -> Self {
        Self::Raw(field)
    }
}

impl From<FeatureId> for SourceId {
    fn from(id: FeatureId) -> Self {
        Self::Feature(id)
    }
}
