//! Extractor trait and dependency references

use std::fmt;
use std::sync::Arc;

use ink_core::RawField;

use crate::error::FeatureResult;
use crate::id::{FeatureId, SourceId};

/// A named, stateless feature computation
///
/// An extractor declares what it reads ([`dependencies`](Extractor::dependencies))
/// and how to turn those inputs into one sequence ([`compute`](Extractor::compute)).
/// It never fetches its own inputs: the resolver materializes every
/// dependency first and hands `compute` the resolved slices, in the same
/// order as `dependencies` returned them.
pub trait Extractor: Send + Sync + fmt::Debug {
    /// Unique identity, used as the cache key
    fn id(&self) -> FeatureId;

    /// Inputs consumed by `compute`, in order
    fn dependencies(&self) -> Vec<Source>;

    /// Derive the output sequence
    ///
    /// Every input has the recording's length and the output must have it
    /// too. Index 0 holds the extractor's edge sentinel.
    fn compute(&self, inputs: &[&[f64]]) -> Vec<f64>;

    /// Short kind label for logs
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Output column name
    fn name(&self) -> String {
        self.id().to_string()
    }
}

/// Shared handle to an extractor
pub type SharedExtractor = Arc<dyn Extractor>;

/// What an extractor reads: a raw column or another extractor's output
#[derive(Debug, Clone)]
pub enum Source {
    Raw(RawField),
    Feature(SharedExtractor),
}

impl Source {
    /// Reference a raw column
    pub fn raw(field: RawField) -> Self {
        Self::Raw(field)
    }

    /// Reference a raw column by schema position
    pub fn raw_index(index: usize) -> FeatureResult<Self> {
        Ok(Self::Raw(RawField::from_index(index)?))
    }

    /// Reference a raw column by name (`time`, `x`, `y`, `pressure`, ...)
    pub fn raw_name(name: &str) -> FeatureResult<Self> {
        Ok(Self::Raw(name.parse()?))
    }

    /// Reference another extractor's output
    pub fn feature<E: Extractor + 'static>(extractor: E) -> Self {
        Self::Feature(Arc::new(extractor))
    }

    /// Identity of the referenced column
    pub fn id(&self) -> SourceId {
        match self {
            Self::Raw(field) => SourceId::Raw(*field),
            Self::Feature(extractor) => SourceId::Feature(extractor.id()),
        }
    }

    /// The referenced extractor, if any
    pub fn extractor(&self) -> Option<&SharedExtractor> {
        match self {
            Self::Raw(_) => None,
            Self::Feature(extractor) => Some(extractor),
        }
    }
}

impl From<RawField> for Source {
    fn from(field: RawField) -> Self {
        Self::Raw(field)
    }
}

impl From<SharedExtractor> for Source {
    fn from(extractor: SharedExtractor) -> Self {
        Self::Feature(extractor)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id(), f)
    }
}
