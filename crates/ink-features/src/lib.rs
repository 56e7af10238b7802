//! ink-features: Memoized kinematic feature extraction
//!
//! Derives per-sample kinematic features from handwriting recordings:
//! - Displacement, distance and elapsed time
//! - Velocity, acceleration and jerk (x, y and planar)
//! - Slope and generic rate-of-change ratios
//! - Moving-average smoothing of any feature or raw column
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     FeaturePipeline                              │
//! │                                                                  │
//! │  ┌──────────┐   ┌──────────────┐   ┌───────────┐   ┌─────────┐  │
//! │  │ Recording│ → │ FeatureCache │ → │ Sanitize  │ → │ Feature │  │
//! │  │ (raw)    │   │ (resolver)   │   │ (opt-in)  │   │ Table   │  │
//! │  └──────────┘   └──────────────┘   └───────────┘   └─────────┘  │
//! │                        ↑                                         │
//! │           FeatureSet (validated extractor DAG)                   │
//! │                                                                  │
//! │  ┌─────────────────────────────────────────────────────────────┐ │
//! │  │                 Batch (rayon, one cache per recording)      │ │
//! │  │  [Rec1] [Rec2] [Rec3] ... [RecN] → ThreadPool → concat      │ │
//! │  └─────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ink_features::{FeaturePipeline, PipelineConfig, Recording};
//!
//! let pipeline = FeaturePipeline::from_config(&PipelineConfig::kinematics())?;
//! let report = pipeline.extract_batch(&recordings)?;
//! let matrix = report.table.values();
//! ```

mod cache;
mod config;
mod derived;
mod error;
mod extractor;
mod graph;
mod id;
mod kinematics;
mod outcome;
mod pipeline;
mod resample;
mod sanitize;
pub mod series;
mod table;

pub use cache::*;
pub use config::*;
pub use derived::*;
pub use error::*;
pub use extractor::*;
pub use graph::*;
pub use id::*;
pub use kinematics::*;
pub use outcome::*;
pub use pipeline::*;
pub use resample::*;
pub use sanitize::*;
pub use table::*;

pub use ink_core::{RawField, RawSample, Recording, RecordingId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
