//! Feature tables

use std::ops::Range;

use ink_core::RecordingId;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis, s};

use crate::error::{FeatureError, FeatureResult};

/// Rows of one recording inside a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub recording: RecordingId,
    pub rows: Range<usize>,
}

/// Row-major feature matrix with named columns
///
/// Rows follow the raw sample order of each recording; recordings appear
/// in input order and are delimited by [`Segment`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    values: Array2<f64>,
    segments: Vec<Segment>,
}

impl FeatureTable {
    /// Table of one recording from columns of `rows` values each
    ///
    /// With no columns the table still spans `rows` rows.
    pub fn from_columns(
        recording: RecordingId,
        rows: usize,
        names: Vec<String>,
        columns: &[&[f64]],
    ) -> FeatureResult<Self> {
        if names.len() != columns.len() {
            return Err(FeatureError::InvalidConfig(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        if let Some((index, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(FeatureError::LengthMismatch {
                feature: names[index].clone(),
                expected: rows,
                actual: column.len(),
            });
        }

        let values = Array2::from_shape_fn((rows, columns.len()), |(row, col)| columns[col][row]);
        Ok(Self {
            names,
            values,
            segments: vec![Segment {
                recording,
                rows: 0..rows,
            }],
        })
    }

    /// Empty table with the given columns
    pub fn empty(names: Vec<String>) -> Self {
        let width = names.len();
        Self {
            names,
            values: Array2::zeros((0, width)),
            segments: Vec::new(),
        }
    }

    /// Stack tables row-wise, keeping their order
    ///
    /// All parts must carry the same column names.
    pub fn concat(names: Vec<String>, parts: &[FeatureTable]) -> FeatureResult<Self> {
        if let Some(part) = parts.iter().find(|part| part.names != names) {
            return Err(FeatureError::InvalidConfig(format!(
                "cannot concatenate tables with columns {:?} and {:?}",
                names, part.names
            )));
        }
        if parts.is_empty() {
            return Ok(Self::empty(names));
        }

        let views: Vec<ArrayView2<'_, f64>> = parts.iter().map(|part| part.values.view()).collect();
        let values = ndarray::concatenate(Axis(0), &views)
            .map_err(|err| FeatureError::InvalidConfig(err.to_string()))?;

        let mut segments = Vec::new();
        let mut offset = 0;
        for part in parts {
            for segment in &part.segments {
                segments.push(Segment {
                    recording: segment.recording.clone(),
                    rows: segment.rows.start + offset..segment.rows.end + offset,
                });
            }
            offset += part.n_rows();
        }

        Ok(Self {
            names,
            values,
            segments,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name)
            .map(|index| self.values.column(index))
    }

    /// Rows belonging to one recording
    pub fn recording(&self, id: &RecordingId) -> Option<ArrayView2<'_, f64>> {
        self.segments
            .iter()
            .find(|segment| &segment.recording == id)
            .map(|segment| self.values.slice(s![segment.rows.clone(), ..]))
    }

    /// Per-recording views in segment order
    pub fn split(&self) -> Vec<(&RecordingId, ArrayView2<'_, f64>)> {
        self.segments
            .iter()
            .map(|segment| {
                (
                    &segment.recording,
                    self.values.slice(s![segment.rows.clone(), ..]),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_from_columns_layout() {
        let table =
            FeatureTable::from_columns("r1".into(), 2, names(), &[&[1.0, 2.0], &[3.0, 4.0]])
                .unwrap();
        assert_eq!(table.values(), &array![[1.0, 3.0], [2.0, 4.0]]);
        assert_eq!(table.column("b").unwrap().to_vec(), vec![3.0, 4.0]);
        assert!(table.column("c").is_none());
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = FeatureTable::from_columns("r1".into(), 2, names(), &[&[1.0, 2.0], &[3.0]])
            .unwrap_err();
        assert!(matches!(err, FeatureError::LengthMismatch { ref feature, .. } if feature == "b"));
    }

    #[test]
    fn test_concat_tracks_segments() {
        let first =
            FeatureTable::from_columns("r1".into(), 2, names(), &[&[1.0, 2.0], &[3.0, 4.0]])
                .unwrap();
        let second =
            FeatureTable::from_columns("r2".into(), 1, names(), &[&[5.0], &[6.0]]).unwrap();
        let table = FeatureTable::concat(names(), &[first, second]).unwrap();

        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.segments()[1].rows, 2..3);
        let r2 = table.recording(&"r2".into()).unwrap();
        assert_eq!(r2, array![[5.0, 6.0]]);
        assert_eq!(table.split().len(), 2);
    }

    #[test]
    fn test_no_columns_keeps_rows() {
        let table = FeatureTable::from_columns("r1".into(), 3, Vec::new(), &[]).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_cols(), 0);
        assert_eq!(table.segments()[0].rows, 0..3);
        assert_eq!(table.recording(&"r1".into()).unwrap().nrows(), 3);
    }

    #[test]
    fn test_concat_empty() {
        let table = FeatureTable::concat(names(), &[]).unwrap();
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.n_cols(), 2);
    }
}
