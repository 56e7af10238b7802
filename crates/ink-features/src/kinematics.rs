//! Kinematic extractors
//!
//! The derivative chain, leaf first:
//!
//! ```text
//! raw x/y ──► Displacement(x|y) ─┐
//! raw x,y ──► Distance(xy) ──────┼─► InstantaneousVelocity ─► ChangeInVelocity ─► Acceleration
//! raw time ─► ChangeInTime ──────┘          ▲                                        │
//!                  │                        │                                        ▼
//!                  └────────────────────────┴──────── Jerk ◄── ChangeInAcceleration ◄┘
//! ```
//!
//! Every ratio divides by `ChangeInTime`. Each extractor holds `Arc`
//! handles to its dependencies, so a chain built once is shared by every
//! feature that needs it and resolves to the same cache keys.

use std::sync::Arc;

use ink_core::RawField;

use crate::error::{FeatureError, FeatureResult};
use crate::extractor::{Extractor, SharedExtractor, Source};
use crate::id::{FeatureId, Mode};
use crate::series::{self, EDGE_SENTINEL};

/// Raw field backing a one-dimensional mode
fn axis(mode: Mode) -> Option<RawField> {
    match mode {
        Mode::X => Some(RawField::X),
        Mode::Y => Some(RawField::Y),
        Mode::Xy => None,
    }
}

// ============ Displacement ============

/// Signed step along one axis
///
/// Index 0 holds the first raw coordinate itself, unlike every other
/// differencing extractor.
#[derive(Debug, Clone)]
pub struct Displacement {
    mode: Mode,
    field: RawField,
}

impl Displacement {
    /// Only `x` and `y` are valid
    pub fn new(mode: Mode) -> FeatureResult<Self> {
        let field = axis(mode).ok_or_else(|| FeatureError::InvalidMode {
            extractor: "displacement",
            mode: mode.to_string(),
            expected: "x, y",
        })?;
        Ok(Self { mode, field })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Extractor for Displacement {
    fn id(&self) -> FeatureId {
        FeatureId::Displacement(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![Source::Raw(self.field)]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        let values = inputs[0];
        let first = values.first().copied().unwrap_or(EDGE_SENTINEL);
        series::difference(values, first)
    }

    fn kind(&self) -> &'static str {
        "displacement"
    }
}

// ============ Distance ============

/// Unsigned path length per step
#[derive(Debug, Clone)]
pub struct Distance {
    mode: Mode,
}

impl Distance {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl Extractor for Distance {
    fn id(&self) -> FeatureId {
        FeatureId::Distance(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        match axis(self.mode) {
            Some(field) => vec![Source::Raw(field)],
            None => vec![Source::Raw(RawField::X), Source::Raw(RawField::Y)],
        }
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        match self.mode {
            Mode::Xy => series::euclidean_step(inputs[0], inputs[1]),
            Mode::X | Mode::Y => series::abs_difference(inputs[0]),
        }
    }

    fn kind(&self) -> &'static str {
        "distance"
    }
}

// ============ ChangeInTime ============

/// Time elapsed since the previous sample
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeInTime;

impl Extractor for ChangeInTime {
    fn id(&self) -> FeatureId {
        FeatureId::ChangeInTime
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![Source::Raw(RawField::Time)]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::difference(inputs[0], EDGE_SENTINEL)
    }

    fn kind(&self) -> &'static str {
        "change_in_time"
    }
}

// ============ Velocity chain ============

/// Step over elapsed time
///
/// One-dimensional modes divide the signed displacement, `xy` divides the
/// planar distance.
#[derive(Debug, Clone)]
pub struct InstantaneousVelocity {
    mode: Mode,
    path: SharedExtractor,
    change_in_time: SharedExtractor,
}

impl InstantaneousVelocity {
    pub fn new(mode: Mode) -> Self {
        let path: SharedExtractor = match axis(mode) {
            Some(field) => Arc::new(Displacement { mode, field }),
            None => Arc::new(Distance::new(Mode::Xy)),
        };
        Self {
            mode,
            path,
            change_in_time: Arc::new(ChangeInTime),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Extractor for InstantaneousVelocity {
    fn id(&self) -> FeatureId {
        FeatureId::Velocity(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![
            Source::Feature(self.path.clone()),
            Source::Feature(self.change_in_time.clone()),
        ]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::ratio(inputs[0], inputs[1])
    }

    fn kind(&self) -> &'static str {
        "inst_velocity"
    }
}

/// Backward difference of velocity
#[derive(Debug, Clone)]
pub struct ChangeInVelocity {
    mode: Mode,
    velocity: SharedExtractor,
}

impl ChangeInVelocity {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            velocity: Arc::new(InstantaneousVelocity::new(mode)),
        }
    }
}

impl Extractor for ChangeInVelocity {
    fn id(&self) -> FeatureId {
        FeatureId::ChangeInVelocity(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![Source::Feature(self.velocity.clone())]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::difference(inputs[0], EDGE_SENTINEL)
    }

    fn kind(&self) -> &'static str {
        "change_in_velocity"
    }
}

/// Change in velocity over elapsed time
#[derive(Debug, Clone)]
pub struct Acceleration {
    mode: Mode,
    change_in_velocity: SharedExtractor,
    change_in_time: SharedExtractor,
}

impl Acceleration {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            change_in_velocity: Arc::new(ChangeInVelocity::new(mode)),
            change_in_time: Arc::new(ChangeInTime),
        }
    }
}

impl Extractor for Acceleration {
    fn id(&self) -> FeatureId {
        FeatureId::Acceleration(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![
            Source::Feature(self.change_in_velocity.clone()),
            Source::Feature(self.change_in_time.clone()),
        ]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::ratio(inputs[0], inputs[1])
    }

    fn kind(&self) -> &'static str {
        "acceleration"
    }
}

/// Backward difference of acceleration
#[derive(Debug, Clone)]
pub struct ChangeInAcceleration {
    mode: Mode,
    acceleration: SharedExtractor,
}

impl ChangeInAcceleration {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            acceleration: Arc::new(Acceleration::new(mode)),
        }
    }
}

impl Extractor for ChangeInAcceleration {
    fn id(&self) -> FeatureId {
        FeatureId::ChangeInAcceleration(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![Source::Feature(self.acceleration.clone())]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::difference(inputs[0], EDGE_SENTINEL)
    }

    fn kind(&self) -> &'static str {
        "change_in_acceleration"
    }
}

/// Change in acceleration over elapsed time
#[derive(Debug, Clone)]
pub struct Jerk {
    mode: Mode,
    change_in_acceleration: SharedExtractor,
    change_in_time: SharedExtractor,
}

impl Jerk {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            change_in_acceleration: Arc::new(ChangeInAcceleration::new(mode)),
            change_in_time: Arc::new(ChangeInTime),
        }
    }
}

impl Extractor for Jerk {
    fn id(&self) -> FeatureId {
        FeatureId::Jerk(self.mode)
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![
            Source::Feature(self.change_in_acceleration.clone()),
            Source::Feature(self.change_in_time.clone()),
        ]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::ratio(inputs[0], inputs[1])
    }

    fn kind(&self) -> &'static str {
        "jerk"
    }
}

// ============ Slope ============

/// Rise over run between consecutive pen positions
#[derive(Debug, Clone, Copy, Default)]
pub struct Slope;

impl Extractor for Slope {
    fn id(&self) -> FeatureId {
        FeatureId::Slope
    }

    fn dependencies(&self) -> Vec<Source> {
        vec![Source::Raw(RawField::X), Source::Raw(RawField::Y)]
    }

    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
        series::difference_ratio(inputs[1], inputs[0])
    }

    fn kind(&self) -> &'static str {
        "slope"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_displacement_rejects_planar_mode() {
        let err = Displacement::new(Mode::Xy).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, FeatureError::InvalidMode { extractor: "displacement", .. }));
    }

    #[test]
    fn test_displacement_keeps_first_coordinate() {
        let displacement = Displacement::new(Mode::X).unwrap();
        let out = displacement.compute(&[&[7.0, 9.0, 4.0]]);
        assert_eq!(out, vec![7.0, 2.0, -5.0]);
    }

    #[test]
    fn test_distance_modes() {
        let x = [0.0, 3.0, 1.0];
        let y = [0.0, 4.0, 4.0];
        assert_eq!(Distance::new(Mode::X).compute(&[&x]), vec![0.0, 3.0, 2.0]);
        assert_eq!(Distance::new(Mode::Xy).compute(&[&x, &y]), vec![0.0, 5.0, 2.0]);
        assert_eq!(Distance::new(Mode::Xy).dependencies().len(), 2);
    }

    #[test]
    fn test_velocity_dependencies_follow_mode() {
        let ids = |mode| {
            InstantaneousVelocity::new(mode)
                .dependencies()
                .iter()
                .map(|dep| dep.id().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(Mode::X), vec!["displacement_x", "change_in_time"]);
        assert_eq!(ids(Mode::Xy), vec!["distance_xy", "change_in_time"]);
    }

    #[test]
    fn test_acceleration_formula() {
        let change_in_velocity = [0.0, 4.0, -2.0];
        let change_in_time = [0.0, 2.0, 4.0];
        let out = Acceleration::new(Mode::Y).compute(&[&change_in_velocity, &change_in_time]);
        assert_eq!(out[0], 0.0);
        assert_relative_eq!(out[1], 2.0);
        assert_relative_eq!(out[2], -0.5);
    }

    #[test]
    fn test_slope_vertical_step_is_infinite() {
        let out = Slope.compute(&[&[1.0, 1.0, 3.0], &[0.0, 2.0, 2.0]]);
        assert_eq!(out, vec![0.0, f64::INFINITY, 0.0]);
    }

    #[test]
    fn test_jerk_names() {
        assert_eq!(Jerk::new(Mode::Xy).name(), "jerk_xy");
        assert_eq!(ChangeInAcceleration::new(Mode::X).name(), "change_in_acceleration_x");
    }
}
