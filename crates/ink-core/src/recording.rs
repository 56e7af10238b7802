//! Recording ("image") definitions

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::sample::{RawField, RawSample, RawValue};

/// Identity of one recording (participant + task, as chosen by the caller)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordingId(pub String);

impl RecordingId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Immutable, ordered sample sequence of one recording
///
/// Samples are shared behind an `Arc`, so cloning a recording is cheap and
/// never copies the underlying data. Nothing in the engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    id: RecordingId,
    samples: Arc<[RawSample]>,
}

impl Recording {
    /// Create recording from samples (order is preserved as given)
    pub fn new<I: Into<RecordingId>>(id: I, samples: Vec<RawSample>) -> Self {
        Self {
            id: id.into(),
            samples: samples.into(),
        }
    }

    /// Create recording from rows in schema order
    ///
    /// Every row must carry exactly six values.
    pub fn from_rows<I, R>(id: I, rows: impl IntoIterator<Item = R>) -> CoreResult<Self>
    where
        I: Into<RecordingId>,
        R: AsRef<[RawValue]>,
    {
        let samples = rows
            .into_iter()
            .enumerate()
            .map(|(row, values)| {
                RawSample::from_row(values.as_ref()).map_err(|err| match err {
                    CoreError::RowWidth {
                        expected, actual, ..
                    } => CoreError::RowWidth {
                        row,
                        expected,
                        actual,
                    },
                    other => other,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self::new(id, samples))
    }

    #[inline]
    pub fn id(&self) -> &RecordingId {
        &self.id
    }

    #[inline]
    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Fail with [`CoreError::EmptyRecording`] when there are no samples
    pub fn ensure_not_empty(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::EmptyRecording(self.id.to_string()));
        }
        Ok(())
    }

    /// One raw column as floating point values
    pub fn column(&self, field: RawField) -> Vec<f64> {
        self.samples
            .iter()
            .map(|sample| sample.get(field) as f64)
            .collect()
    }

    /// True when timestamps never decrease
    pub fn is_time_ordered(&self) -> bool {
        self.samples.windows(2).all(|pair| pair[0].time <= pair[1].time)
    }

    /// Copy of the recording with samples stably sorted by time
    ///
    /// The feature engine never reorders samples itself; callers that need
    /// strict time order sort before submission.
    pub fn sorted_by_time(&self) -> Recording {
        let mut samples = self.samples.to_vec();
        samples.sort_by_key(|sample| sample.time);
        Self::new(self.id.clone(), samples)
    }
}
