//! Opt-in post-processing of non-finite feature values
//!
//! Extractors never special-case division by zero. When a pipeline is
//! configured with a non-default [`SanitizeConfig`], each output column of
//! each recording is cleaned independently after extraction.

use serde::{Deserialize, Serialize};

/// Handling of ±infinity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfinityPolicy {
    #[default]
    Keep,
    /// Replace +inf/-inf with the largest/smallest finite value of the column
    ClampToObserved,
}

/// Handling of NaN
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    #[default]
    Keep,
    Replace(f64),
}

/// Sanitation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    pub infinity: InfinityPolicy,
    pub nan: NanPolicy,
}

impl SanitizeConfig {
    /// Clamp infinities and map NaN to zero
    pub fn finite() -> Self {
        Self {
            infinity: InfinityPolicy::ClampToObserved,
            nan: NanPolicy::Replace(0.0),
        }
    }

    /// True when sanitation leaves every value untouched
    pub fn is_noop(&self) -> bool {
        self.infinity == InfinityPolicy::Keep && self.nan == NanPolicy::Keep
    }

    /// Clean one column in place, returning how many values changed
    pub fn apply(&self, column: &mut [f64]) -> usize {
        if self.is_noop() {
            return 0;
        }

        let (low, high) = match self.infinity {
            InfinityPolicy::Keep => (f64::NEG_INFINITY, f64::INFINITY),
            InfinityPolicy::ClampToObserved => finite_extremes(column).unwrap_or((0.0, 0.0)),
        };

        let mut changed = 0;
        for value in column.iter_mut() {
            let replacement = if value.is_nan() {
                match self.nan {
                    NanPolicy::Keep => continue,
                    NanPolicy::Replace(fill) => fill,
                }
            } else if *value == f64::INFINITY {
                high
            } else if *value == f64::NEG_INFINITY {
                low
            } else {
                continue;
            };
            if replacement.to_bits() != value.to_bits() {
                *value = replacement;
                changed += 1;
            }
        }
        changed
    }
}

/// Smallest and largest finite values, if any
fn finite_extremes(column: &[f64]) -> Option<(f64, f64)> {
    column
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((low, high)) => Some((low.min(v), high.max(v))),
        })
}
