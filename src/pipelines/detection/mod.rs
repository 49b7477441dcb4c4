//! Fake-news detection pipeline.
//!
//! Classify a news text as `Fake` or `Real` with a confidence score, using a
//! pretrained binary classifier loaded from local files.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fakenews_detector::detection::NewsDetectionPipelineBuilder;
//!
//! # fn main() -> fakenews_detector::error::Result<()> {
//! let pipeline = NewsDetectionPipelineBuilder::modernbert("model", "tokenizer").build()?;
//!
//! let output = pipeline.run("WASHINGTON, April 12 (Reuters) - The U.S. Labor Department reported...")?;
//! println!(
//!     "verdict: {} (confidence: {:.1}%)",
//!     output.prediction.label,
//!     output.prediction.score * 100.0
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The model and tokenizer are loaded once per process; rebuilding a pipeline
//! against the same directories reuses the cached instance.

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod pipeline;
#[cfg(test)]
pub(crate) mod testing;

// ============ Public API ============

pub use crate::models::modernbert::LocalModelDirs;
pub use crate::pipelines::stats::PipelineStats;
pub use builder::NewsDetectionPipelineBuilder;
pub use model::NewsDetectionModel;
pub use pipeline::{NewsDetectionPipeline, NewsLabel, Output, Prediction};

/// Only for generic annotations. Use [`NewsDetectionPipelineBuilder::modernbert`].
pub type NewsModernBert = crate::models::modernbert::NewsModernBertModel;
