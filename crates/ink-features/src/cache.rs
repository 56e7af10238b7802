//! Per-recording memoization cache and dependency resolver
//!
//! A [`FeatureCache`] is bound to exactly one [`Recording`]. It is seeded
//! with the six raw columns and grows lazily as extractors are resolved.
//! Every [`FeatureId`] is evaluated at most once for the lifetime of the
//! cache, no matter how many dependents reach it.
//!
//! The cache is not thread-safe and is never shared between recordings;
//! parallel callers build one cache per worker.

use std::collections::{HashMap, HashSet};

use ink_core::{RawField, Recording};

use crate::error::{FeatureError, FeatureResult};
use crate::extractor::{Extractor, Source};
use crate::id::FeatureId;

/// Materialized features of one recording
#[derive(Debug)]
pub struct FeatureCache<'a> {
    recording: &'a Recording,
    raw: [Vec<f64>; RawField::COUNT],
    features: HashMap<FeatureId, Vec<f64>>,
    /// Features currently being evaluated (cycle guard)
    pending: HashSet<FeatureId>,
    evaluations: usize,
}

impl<'a> FeatureCache<'a> {
    /// Seed a cache with the raw columns of `recording`
    ///
    /// Fails with an empty-recording error when there are no samples.
    pub fn new(recording: &'a Recording) -> FeatureResult<Self> {
        recording.ensure_not_empty()?;
        Ok(Self {
            recording,
            raw: RawField::ALL.map(|field| recording.column(field)),
            features: HashMap::new(),
            pending: HashSet::new(),
            evaluations: 0,
        })
    }

    /// Recording this cache belongs to
    pub fn recording(&self) -> &'a Recording {
        self.recording
    }

    /// Number of samples (length of every cached sequence)
    pub fn sample_count(&self) -> usize {
        self.recording.len()
    }

    /// Raw column as `f64`
    pub fn raw(&self, field: RawField) -> &[f64] {
        &self.raw[field.index()]
    }

    /// Materialize `extractor` and everything it depends on
    ///
    /// Cache hits return the stored sequence without evaluating anything.
    pub fn resolve(&mut self, extractor: &dyn Extractor) -> FeatureResult<&[f64]> {
        let id = extractor.id();
        if !self.features.contains_key(&id) {
            self.materialize(extractor, &id)?;
        }
        self.lookup(&id)
    }

    /// Cached sequence for `id`, if materialized
    pub fn get(&self, id: &FeatureId) -> Option<&[f64]> {
        self.features.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.features.contains_key(id)
    }

    /// Number of materialized features (raw columns excluded)
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Total extractor evaluations performed by this cache
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn materialize(&mut self, extractor: &dyn Extractor, id: &FeatureId) -> FeatureResult<()> {
        if !self.pending.insert(id.clone()) {
            return Err(FeatureError::DependencyCycle(id.to_string()));
        }
        let result = self.evaluate(extractor, id);
        self.pending.remove(id);
        result
    }

    fn evaluate(&mut self, extractor: &dyn Extractor, id: &FeatureId) -> FeatureResult<()> {
        let dependencies = extractor.dependencies();
        for dependency in &dependencies {
            if let Some(inner) = dependency.extractor() {
                self.resolve(inner.as_ref())?;
            }
        }

        let output = {
            let inputs = dependencies
                .iter()
                .map(|dependency| self.input(dependency))
                .collect::<FeatureResult<Vec<&[f64]>>>()?;
            extractor.compute(&inputs)
        };

        let expected = self.recording.len();
        if output.len() != expected {
            return Err(FeatureError::LengthMismatch {
                feature: id.to_string(),
                expected,
                actual: output.len(),
            });
        }

        self.evaluations += 1;
        log::trace!(
            "[{}] materialized {} ({})",
            self.recording.id(),
            id,
            extractor.kind()
        );
        self.features.insert(id.clone(), output);
        Ok(())
    }

    fn input(&self, source: &Source) -> FeatureResult<&[f64]> {
        match source {
            Source::Raw(field) => Ok(self.raw(*field)),
            Source::Feature(extractor) => self.lookup(&extractor.id()),
        }
    }

    fn lookup(&self, id: &FeatureId) -> FeatureResult<&[f64]> {
        self.get(id)
            .ok_or_else(|| FeatureError::Unresolved(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Mode;
    use crate::kinematics::{Acceleration, ChangeInTime, Distance, InstantaneousVelocity};
    use ink_core::RawSample;
    use std::sync::Arc;

    fn recording() -> Recording {
        Recording::new(
            "scenario",
            vec![
                RawSample::at(0, 0, 0),
                RawSample::at(1, 3, 4),
                RawSample::at(3, 3, 4),
            ],
        )
    }

    #[derive(Debug)]
    struct SelfLoop;

    impl Extractor for SelfLoop {
        fn id(&self) -> FeatureId {
            FeatureId::Custom("self_loop".into())
        }

        fn dependencies(&self) -> Vec<Source> {
            vec![Source::Feature(Arc::new(SelfLoop))]
        }

        fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
            inputs[0].to_vec()
        }

        fn kind(&self) -> &'static str {
            "self_loop"
        }
    }

    #[derive(Debug)]
    struct Truncated;

    impl Extractor for Truncated {
        fn id(&self) -> FeatureId {
            FeatureId::Custom("truncated".into())
        }

        fn dependencies(&self) -> Vec<Source> {
            vec![Source::Raw(RawField::X)]
        }

        fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
            inputs[0][1..].to_vec()
        }

        fn kind(&self) -> &'static str {
            "truncated"
        }
    }

    #[test]
    fn test_resolve_scenario() {
        let recording = recording();
        let mut cache = FeatureCache::new(&recording).unwrap();

        assert_eq!(cache.resolve(&Distance::new(Mode::Xy)).unwrap(), &[0.0, 5.0, 0.0]);
        assert_eq!(cache.resolve(&ChangeInTime).unwrap(), &[0.0, 1.0, 2.0]);
        assert_eq!(
            cache.resolve(&InstantaneousVelocity::new(Mode::Xy)).unwrap(),
            &[0.0, 5.0, 0.0]
        );
        // distance_xy, change_in_time, inst_velocity_xy
        assert_eq!(cache.evaluations(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_dependencies_are_cached() {
        let recording = recording();
        let mut cache = FeatureCache::new(&recording).unwrap();

        cache.resolve(&Acceleration::new(Mode::X)).unwrap();
        assert!(cache.contains(&FeatureId::Displacement(Mode::X)));
        assert!(cache.contains(&FeatureId::Velocity(Mode::X)));
        assert!(cache.contains(&FeatureId::ChangeInVelocity(Mode::X)));
        assert!(cache.contains(&FeatureId::ChangeInTime));

        let before = cache.evaluations();
        cache.resolve(&InstantaneousVelocity::new(Mode::X)).unwrap();
        assert_eq!(cache.evaluations(), before);
    }

    #[test]
    fn test_empty_recording_is_rejected() {
        let empty = Recording::new("empty", Vec::new());
        let err = FeatureCache::new(&empty).unwrap_err();
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_cycle_is_reported() {
        let recording = recording();
        let mut cache = FeatureCache::new(&recording).unwrap();
        let err = cache.resolve(&SelfLoop).unwrap_err();
        assert!(matches!(err, FeatureError::DependencyCycle(name) if name == "self_loop"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_wrong_length_output_is_rejected() {
        let recording = recording();
        let mut cache = FeatureCache::new(&recording).unwrap();
        let err = cache.resolve(&Truncated).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
        assert!(!cache.contains(&FeatureId::Custom("truncated".into())));
    }

    #[test]
    fn test_single_sample_yields_sentinels() {
        let single = Recording::new("single", vec![RawSample::at(4, 7, 9)]);
        let mut cache = FeatureCache::new(&single).unwrap();
        assert_eq!(cache.resolve(&Acceleration::new(Mode::Xy)).unwrap(), &[0.0]);
        assert_eq!(cache.get(&FeatureId::ChangeInTime), Some(&[0.0][..]));
    }
}
