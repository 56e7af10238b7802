//! Validated set of requested features
//!
//! [`FeatureSet::new`] walks the transitive dependency graph once, before
//! any recording is touched, and rejects plans that would misbehave at
//! resolution time: duplicate requests, two distinct features rendering
//! the same column name, and features reachable from themselves.

use std::collections::HashMap;

use crate::error::{FeatureError, FeatureResult};
use crate::extractor::SharedExtractor;
use crate::id::FeatureId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Ordered, validated list of requested extractors
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    extractors: Vec<SharedExtractor>,
    names: Vec<String>,
    /// Distinct features reachable from the requested set
    graph_size: usize,
}

impl FeatureSet {
    pub fn new(requested: Vec<SharedExtractor>) -> FeatureResult<Self> {
        let mut visits: HashMap<FeatureId, Visit> = HashMap::new();
        let mut names: HashMap<String, FeatureId> = HashMap::new();

        let mut requested_ids: Vec<FeatureId> = Vec::with_capacity(requested.len());
        for extractor in &requested {
            let id = extractor.id();
            if requested_ids.contains(&id) {
                return Err(FeatureError::DuplicateFeature(id.to_string()));
            }
            requested_ids.push(id);
        }

        for extractor in &requested {
            visit(extractor, &mut visits, &mut names)?;
        }

        let names = requested.iter().map(|extractor| extractor.name()).collect();
        Ok(Self {
            extractors: requested,
            names,
            graph_size: visits.len(),
        })
    }

    pub fn extractors(&self) -> &[SharedExtractor] {
        &self.extractors
    }

    /// Output column names, in request order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Number of distinct features evaluated per recording
    pub fn graph_size(&self) -> usize {
        self.graph_size
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedExtractor> {
        self.extractors.iter()
    }
}

fn visit(
    extractor: &SharedExtractor,
    visits: &mut HashMap<FeatureId, Visit>,
    names: &mut HashMap<String, FeatureId>,
) -> FeatureResult<()> {
    let id = extractor.id();
    match visits.get(&id) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => return Err(FeatureError::DependencyCycle(id.to_string())),
        None => {}
    }

    let name = extractor.name();
    match names.get(&name) {
        Some(existing) if *existing != id => return Err(FeatureError::NameCollision(name)),
        Some(_) => {}
        None => {
            names.insert(name, id.clone());
        }
    }

    visits.insert(id.clone(), Visit::InProgress);
    for dependency in extractor.dependencies() {
        if let Some(inner) = dependency.extractor() {
            visit(inner, visits, names)?;
        }
    }
    visits.insert(id, Visit::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::RateOfChange;
    use crate::extractor::{Extractor, Source};
    use crate::id::Mode;
    use crate::kinematics::{Acceleration, ChangeInTime, InstantaneousVelocity, Jerk};
    use ink_core::RawField;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Named(&'static str, u8);

    impl Extractor for Named {
        fn id(&self) -> FeatureId {
            FeatureId::Custom(format!("{}#{}", self.0, self.1))
        }

        fn name(&self) -> String {
            self.0.to_string()
        }

        fn dependencies(&self) -> Vec<Source> {
            vec![Source::Raw(RawField::X)]
        }

        fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
            inputs[0].to_vec()
        }

        fn kind(&self) -> &'static str {
            "named"
        }
    }

    #[derive(Debug)]
    struct Ouroboros;

    impl Extractor for Ouroboros {
        fn id(&self) -> FeatureId {
            FeatureId::Custom("ouroboros".into())
        }

        fn dependencies(&self) -> Vec<Source> {
            vec![Source::Feature(Arc::new(Ouroboros))]
        }

        fn compute(&self, inputs: &[&[f64]]) -> Vec<f64> {
            inputs[0].to_vec()
        }

        fn kind(&self) -> &'static str {
            "ouroboros"
        }
    }

    #[test]
    fn test_shared_dependencies_counted_once() {
        let set = FeatureSet::new(vec![
            Arc::new(Jerk::new(Mode::X)),
            Arc::new(Acceleration::new(Mode::X)),
        ])
        .unwrap();
        // jerk, change_in_acceleration, acceleration, change_in_velocity,
        // inst_velocity, displacement, change_in_time
        assert_eq!(set.graph_size(), 7);
        assert_eq!(set.names(), &["jerk_x", "acceleration_x"]);
    }

    #[test]
    fn test_duplicate_request_rejected() {
        let err = FeatureSet::new(vec![
            Arc::new(InstantaneousVelocity::new(Mode::Y)),
            Arc::new(InstantaneousVelocity::new(Mode::Y)),
        ])
        .unwrap_err();
        assert!(matches!(err, FeatureError::DuplicateFeature(name) if name == "inst_velocity_y"));
    }

    #[test]
    fn test_name_collision_rejected() {
        let err = FeatureSet::new(vec![Arc::new(Named("speed", 1)), Arc::new(Named("speed", 2))])
            .unwrap_err();
        assert!(matches!(err, FeatureError::NameCollision(name) if name == "speed"));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = FeatureSet::new(vec![Arc::new(Ouroboros)]).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, FeatureError::DependencyCycle(_)));
    }

    #[test]
    fn test_canonical_change_is_shared() {
        // roc(x, time) reuses change_in_time rather than a second change node
        let set = FeatureSet::new(vec![
            Arc::new(ChangeInTime),
            Arc::new(RateOfChange::new(Source::raw(RawField::X), Source::raw(RawField::Time))),
        ])
        .unwrap();
        assert_eq!(set.graph_size(), 3);
    }
}
