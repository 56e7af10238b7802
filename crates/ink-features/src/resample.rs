//! Length normalization of per-recording tables
//!
//! Recordings differ in length. Downstream models want a fixed number of
//! rows, so each recording's table is linearly resampled along the time
//! axis to a common target length chosen from the batch.

use ndarray::{Array2, Array3, ArrayView2, s};
use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, FeatureResult};
use crate::table::FeatureTable;

/// How to choose the common row count
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Explicit row count
    Fixed(usize),
    /// Shortest recording
    Min,
    /// Longest recording
    Max,
    /// Mean length, truncated
    #[default]
    Mean,
    /// Length quantile in `[0, 1]`, linearly interpolated then truncated
    Quantile(f64),
}

impl LengthPolicy {
    /// Target length for a batch with the given recording lengths
    pub fn target_length(&self, lengths: &[usize]) -> FeatureResult<usize> {
        let target = match *self {
            Self::Fixed(rows) => rows,
            _ if lengths.is_empty() => {
                return Err(FeatureError::Resample(
                    "cannot derive a target length from an empty batch".into(),
                ));
            }
            Self::Min => lengths.iter().copied().min().unwrap_or(0),
            Self::Max => lengths.iter().copied().max().unwrap_or(0),
            Self::Mean => lengths.iter().sum::<usize>() / lengths.len(),
            Self::Quantile(q) => {
                if !(0.0..=1.0).contains(&q) {
                    return Err(FeatureError::Resample(format!(
                        "quantile {q} outside [0, 1]"
                    )));
                }
                let mut sorted = lengths.to_vec();
                sorted.sort_unstable();
                let position = q * (sorted.len() - 1) as f64;
                let lo = position.floor() as usize;
                let hi = position.ceil() as usize;
                let frac = position - lo as f64;
                let value = sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac;
                value as usize
            }
        };

        if target == 0 {
            return Err(FeatureError::Resample("target length must be > 0".into()));
        }
        Ok(target)
    }
}

/// Linearly resample rows to `target` rows
///
/// Sample centres are aligned (`src = (i + 0.5) * n / target - 0.5`,
/// clamped at 0). Columns are interpolated independently; non-finite
/// values should be sanitized first or they spread to their neighbours.
pub fn resample_table(values: ArrayView2<'_, f64>, target: usize) -> FeatureResult<Array2<f64>> {
    let rows = values.nrows();
    if rows == 0 {
        return Err(FeatureError::Resample("cannot resample an empty table".into()));
    }
    if target == 0 {
        return Err(FeatureError::Resample("target length must be > 0".into()));
    }
    if rows == target {
        return Ok(values.to_owned());
    }

    let scale = rows as f64 / target as f64;
    let mut out = Array2::zeros((target, values.ncols()));
    for (i, mut row) in out.rows_mut().into_iter().enumerate() {
        let src = ((i as f64 + 0.5) * scale - 0.5).max(0.0);
        let lo = (src.floor() as usize).min(rows - 1);
        let hi = (lo + 1).min(rows - 1);
        let frac = src - lo as f64;

        let lower = values.row(lo);
        if frac == 0.0 || lo == hi {
            row.assign(&lower);
        } else {
            let upper = values.row(hi);
            for ((dst, a), b) in row.iter_mut().zip(lower.iter()).zip(upper.iter()) {
                *dst = a * (1.0 - frac) + b * frac;
            }
        }
    }
    Ok(out)
}

/// Resample every recording of a table and stack them
///
/// Output shape is `(recordings, target, columns)`, recordings in segment
/// order.
pub fn stack_resampled(table: &FeatureTable, policy: LengthPolicy) -> FeatureResult<Array3<f64>> {
    let parts = table.split();
    let lengths: Vec<usize> = parts.iter().map(|(_, view)| view.nrows()).collect();
    let target = policy.target_length(&lengths)?;

    let mut stacked = Array3::<f64>::zeros((parts.len(), target, table.n_cols()));
    for (index, (recording, view)) in parts.into_iter().enumerate() {
        let resampled = resample_table(view, target)
            .map_err(|err| err.in_recording(recording.as_str()))?;
        stacked.slice_mut(s![index, .., ..]).assign(&resampled);
    }

    log::debug!(
        "Resampled {} recordings to {} rows ({:?})",
        stacked.shape()[0],
        target,
        policy
    );
    Ok(stacked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_target_length_policies() {
        let lengths = [10, 40, 20, 30];
        assert_eq!(LengthPolicy::Min.target_length(&lengths).unwrap(), 10);
        assert_eq!(LengthPolicy::Max.target_length(&lengths).unwrap(), 40);
        assert_eq!(LengthPolicy::Mean.target_length(&lengths).unwrap(), 25);
        assert_eq!(LengthPolicy::Fixed(7).target_length(&[]).unwrap(), 7);
        // sorted [10, 20, 30, 40], position 0.5 * 3 = 1.5
        assert_eq!(LengthPolicy::Quantile(0.5).target_length(&lengths).unwrap(), 25);
        assert_eq!(LengthPolicy::Quantile(1.0).target_length(&lengths).unwrap(), 40);
    }

    #[test]
    fn test_invalid_policies() {
        assert!(LengthPolicy::Fixed(0).target_length(&[3]).is_err());
        assert!(LengthPolicy::Quantile(1.5).target_length(&[3]).is_err());
        assert!(LengthPolicy::Mean.target_length(&[]).is_err());
    }

    #[test]
    fn test_upsample_linear() {
        let values = array![[0.0], [4.0]];
        let out = resample_table(values.view(), 4).unwrap();
        // src positions: 0 (clamped), 0.25, 0.75, 1.25 (clamped to last row)
        assert_relative_eq!(out[[0, 0]], 0.0);
        assert_relative_eq!(out[[1, 0]], 1.0);
        assert_relative_eq!(out[[2, 0]], 3.0);
        assert_relative_eq!(out[[3, 0]], 4.0);
    }

    #[test]
    fn test_downsample_keeps_columns_independent() {
        let values = array![[0.0, 10.0], [1.0, 20.0], [2.0, 30.0], [3.0, 40.0]];
        let out = resample_table(values.view(), 2).unwrap();
        assert_eq!(out.shape(), &[2, 2]);
        assert_relative_eq!(out[[0, 0]], 0.5);
        assert_relative_eq!(out[[0, 1]], 15.0);
        assert_relative_eq!(out[[1, 0]], 2.5);
        assert_relative_eq!(out[[1, 1]], 35.0);
    }

    #[test]
    fn test_same_length_is_copy() {
        let values = array![[1.0, f64::INFINITY]];
        let out = resample_table(values.view(), 1).unwrap();
        assert_eq!(out[[0, 1]], f64::INFINITY);
    }

    #[test]
    fn test_stack_resampled_shape() {
        let names = vec!["v".to_string()];
        let a =
            FeatureTable::from_columns("a".into(), 4, names.clone(), &[&[1.0, 2.0, 3.0, 4.0]])
                .unwrap();
        let b =
            FeatureTable::from_columns("b".into(), 2, names.clone(), &[&[5.0, 7.0]]).unwrap();
        let table = FeatureTable::concat(names, &[a, b]).unwrap();

        let stacked = stack_resampled(&table, LengthPolicy::Min).unwrap();
        assert_eq!(stacked.shape(), &[2, 2, 1]);
        assert_relative_eq!(stacked[[0, 0, 0]], 1.5);
        assert_relative_eq!(stacked[[1, 1, 0]], 7.0);
    }
}
