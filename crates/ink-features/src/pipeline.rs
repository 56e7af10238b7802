//! Feature extraction pipeline
//!
//! Orchestrates extraction for one recording or a batch:
//! 1. Seed a fresh cache with the recording's raw columns
//! 2. Resolve every requested feature, in request order
//! 3. Assemble the requested columns (intermediates are dropped)
//! 4. Sanitize non-finite values (optional)
//! 5. Concatenate recordings in input order (batch only)

use std::time::{Duration, Instant};

use ink_core::{RawField, Recording};
use ndarray::Array3;
use rayon::prelude::*;

use crate::cache::FeatureCache;
use crate::config::PipelineConfig;
use crate::error::{FeatureError, FeatureResult};
use crate::extractor::SharedExtractor;
use crate::graph::FeatureSet;
use crate::outcome::{BatchPolicy, BatchReport, RecordingOutcome};
use crate::resample::{LengthPolicy, stack_resampled};
use crate::sanitize::SanitizeConfig;
use crate::table::FeatureTable;

/// Feature extraction pipeline
///
/// Immutable once built and safe to share between threads; every
/// recording gets its own [`FeatureCache`].
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    features: FeatureSet,
    include_raw: bool,
    sanitize: SanitizeConfig,
    batch_policy: BatchPolicy,
    thread_count: usize,
    column_names: Vec<String>,
}

impl FeaturePipeline {
    /// Pipeline over the given extractors with default settings
    pub fn new(extractors: Vec<SharedExtractor>) -> FeatureResult<Self> {
        let features = FeatureSet::new(extractors)?;
        let column_names = column_names(&features, false)?;
        Ok(Self {
            features,
            include_raw: false,
            sanitize: SanitizeConfig::default(),
            batch_policy: BatchPolicy::default(),
            thread_count: 0,
            column_names,
        })
    }

    /// Build and validate a pipeline from configuration
    pub fn from_config(config: &PipelineConfig) -> FeatureResult<Self> {
        let pipeline = Self::new(config.build_extractors()?)?
            .with_raw(config.include_raw)?
            .with_sanitize(config.sanitize)
            .with_batch_policy(config.batch_policy)
            .with_threads(config.thread_count);
        log::debug!(
            "Pipeline: {} features ({} distinct nodes), raw columns: {}",
            pipeline.features.len(),
            pipeline.features.graph_size(),
            pipeline.include_raw
        );
        Ok(pipeline)
    }

    /// Prepend the raw columns to every table
    pub fn with_raw(mut self, include: bool) -> FeatureResult<Self> {
        self.column_names = column_names(&self.features, include)?;
        self.include_raw = include;
        Ok(self)
    }

    pub fn with_sanitize(mut self, sanitize: SanitizeConfig) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    /// Set worker thread count (0 = auto)
    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Output column names, in table order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Extract the requested features of one recording
    pub fn extract(&self, recording: &Recording) -> FeatureResult<FeatureTable> {
        let mut cache =
            FeatureCache::new(recording).map_err(|err| err.in_recording(recording.id().as_str()))?;
        self.extract_with_cache(&mut cache)
    }

    /// Extract using a caller-owned cache
    ///
    /// Features already materialized in `cache` are reused, so several
    /// pipelines can be evaluated against one recording without repeating
    /// shared work.
    pub fn extract_with_cache(&self, cache: &mut FeatureCache<'_>) -> FeatureResult<FeatureTable> {
        let recording = cache.recording();
        let id = recording.id();
        if !recording.is_time_ordered() {
            log::warn!("[{}] timestamps decrease; features follow sample order", id);
        }

        let before = cache.evaluations();
        for extractor in self.features.iter() {
            cache
                .resolve(extractor.as_ref())
                .map_err(|err| err.in_recording(id.as_str()))?;
        }

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(self.column_names.len());
        if self.include_raw {
            columns.extend(RawField::ALL.iter().map(|field| cache.raw(*field).to_vec()));
        }
        for extractor in self.features.iter() {
            let feature_id = extractor.id();
            let values = cache
                .get(&feature_id)
                .ok_or_else(|| FeatureError::Unresolved(feature_id.to_string()))
                .map_err(|err| err.in_recording(id.as_str()))?;
            let mut column = values.to_vec();
            let changed = self.sanitize.apply(&mut column);
            if changed > 0 {
                log::trace!("[{}] sanitized {} values of {}", id, changed, feature_id);
            }
            columns.push(column);
        }

        log::debug!(
            "[{}] extracted {} columns x {} samples ({} evaluations)",
            id,
            columns.len(),
            recording.len(),
            cache.evaluations() - before
        );

        let views: Vec<&[f64]> = columns.iter().map(Vec::as_slice).collect();
        FeatureTable::from_columns(
            id.clone(),
            cache.sample_count(),
            self.column_names.clone(),
            &views,
        )
    }

    /// Extract every recording in parallel, honouring the batch policy
    ///
    /// Recordings never share a cache. The returned table contains the
    /// completed recordings in input order.
    pub fn extract_batch(&self, recordings: &[Recording]) -> FeatureResult<BatchReport> {
        let start = Instant::now();
        let results = self.run(recordings)?;

        let mut tables = Vec::with_capacity(recordings.len());
        let mut outcomes = Vec::with_capacity(recordings.len());
        for (recording, (result, duration)) in recordings.iter().zip(results) {
            let id = recording.id().clone();
            match result {
                Ok(table) => {
                    outcomes.push(RecordingOutcome::success(id, table.n_rows(), duration));
                    tables.push(table);
                }
                Err(err) => match self.batch_policy {
                    BatchPolicy::FailFast => return Err(err),
                    BatchPolicy::SkipInvalid => {
                        log::warn!("Skipping recording {}: {}", id, err);
                        outcomes.push(RecordingOutcome::failure(id, err.to_string(), duration));
                    }
                },
            }
        }

        let table = FeatureTable::concat(self.column_names.clone(), &tables)?;
        let report = BatchReport {
            table,
            outcomes,
            elapsed: start.elapsed(),
        };
        log::info!(
            "Batch: {}/{} recordings, {} rows in {:?}",
            report.completed(),
            recordings.len(),
            report.table.n_rows(),
            report.elapsed
        );
        Ok(report)
    }

    /// Extract every recording and concatenate, failing on the first error
    pub fn extract_concatenated(&self, recordings: &[Recording]) -> FeatureResult<FeatureTable> {
        let tables = self
            .run(recordings)?
            .into_iter()
            .map(|(result, _)| result)
            .collect::<FeatureResult<Vec<_>>>()?;
        FeatureTable::concat(self.column_names.clone(), &tables)
    }

    /// Extract under the batch policy, then resample every completed
    /// recording to a common length
    ///
    /// Returns shape `(recordings, length, columns)`.
    pub fn extract_stacked(
        &self,
        recordings: &[Recording],
        policy: LengthPolicy,
    ) -> FeatureResult<Array3<f64>> {
        stack_resampled(&self.extract_batch(recordings)?.table, policy)
    }

    fn run(
        &self,
        recordings: &[Recording],
    ) -> FeatureResult<Vec<(FeatureResult<FeatureTable>, Duration)>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.thread_count)
            .build()
            .map_err(|err| FeatureError::ThreadPool(err.to_string()))?;

        Ok(pool.install(|| {
            recordings
                .par_iter()
                .map(|recording| {
                    let start = Instant::now();
                    let result = self.extract(recording);
                    (result, start.elapsed())
                })
                .collect()
        }))
    }
}

/// Table column names; raw names must not be shadowed by a feature
fn column_names(features: &FeatureSet, include_raw: bool) -> FeatureResult<Vec<String>> {
    let mut names = Vec::with_capacity(features.len() + RawField::COUNT);
    if include_raw {
        names.extend(RawField::ALL.iter().map(|field| field.name().to_string()));
    }
    for name in features.names() {
        if names.contains(name) {
            return Err(FeatureError::NameCollision(name.clone()));
        }
        names.push(name.clone());
    }
    Ok(names)
}
