//! Generic extractors over any source: change, rate of change, smoothing

use std::sync::Arc;

use ink_core::RawField;

use crate::error::{FeatureError, FeatureResult};
use crate::extractor::{Extractor, SharedExtractor, Source};
use crate::id::FeatureId;
use crate::kinematics::{ChangeInAcceleration, ChangeInTime, ChangeInVelocity};
use crate::series::{self, EDGE_SENTINEL};

/// Default smoothing window (samples)
pub const DEFAULT_SMOOTHING_WINDOW: usize = 30;

/// Backward difference of an arbitrary source, sentinel 0
#[derive(Debug, Clone)]
pub struct Change {
    source: Source,
}

impl Change {
    /// Change of `source`, mapped onto the matching kinematic extractor
    /// when one exists so both share a cache entry
    pub fn of(source: Source) -> SharedExtractor {
        if let Source::Raw(RawField::Time) = source {
            return Arc::new(ChangeInTime);
        }
        if let Source::Feature(extractor) = &source {
            match extractor.id() {
                FeatureId::Velocity(mode) => return Arc::new(ChangeInVelocity::new(mode)),
                FeatureId::Acceleration(mode) => return Arc::new(ChangeInAcceleration::new(mode)),
                _ => {}
            }
        }
        Arc::new(Self { source })
    }
}

impl Extractor for Change {
    fn id(&self) -> FeatureId {
        FeatureId::Change(Box::new(self.source.id()))
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![self.source.clone()]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::difference(inputs[0], EDGE_SENTINEL)
    }

    fn kind(&self) -> &'static str {
        "change"
    }
}

/// Ratio of the change in one source to the change in another
///
/// `roc(a, b)[i] = Δa[i] / Δb[i]`, sentinel 0 at index 0.
#[derive(Debug, Clone)]
pub struct RateOfChange {
    id: FeatureId,
    numerator: SharedExtractor,
    denominator: SharedExtractor,
}

impl RateOfChange {
    pub fn new(numerator: Source, denominator: Source) -> Self {
        let id = FeatureId::RateOfChange(
            Box::new(numerator.id()),
            Box::new(denominator.id()),
        );
        Self {
            id,
            numerator: Change::of(numerator),
            denominator: Change::of(denominator),
        }
    }
}

impl Extractor for RateOfChange {
    fn id(&self) -> FeatureId {
        self.id.clone()
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![
            Source::Feature(self.numerator.clone()),
            Source::Feature(self.denominator.clone()),
        ]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::ratio(inputs[0], inputs[1])
    }

    fn kind(&self) -> &'static str {
        "roc"
    }
}

/// Centred box mean of a source over `window` samples
///
/// Output length always equals input length.
#[derive(Debug, Clone)]
pub struct MedianSmoothing {
    source: Source,
    window: usize,
}

impl MedianSmoothing {
    /// Window must be positive
    pub fn new(source: Source, window: usize) -> FeatureResult<Self> {
        if window == 0 {
            return Err(FeatureError::InvalidWindow(window));
        }
        Ok(Self { source, window })
    }

    /// Smoothing with [`DEFAULT_SMOOTHING_WINDOW`]
    pub fn with_default_window(source: Source) -> Self {
        Self {
            source,
            window: DEFAULT_SMOOTHING_WINDOW,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Extractor for MedianSmoothing {
    fn id(&self) -> FeatureId {
        FeatureId::Smoothed {
            source: Box::new(self.source.id()),
            window: self.window,
        }
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![self.source.clone()]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::moving_average(inputs[0], self.window)
    }

    fn kind(&self) -> &'static str {
        "smoothing"
    }
}
