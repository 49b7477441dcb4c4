use std::sync::Arc;

use tokenizers::Tokenizer;

use super::model::NewsDetectionModel;
use crate::error::{DetectorError, Result};
use crate::pipelines::stats::PipelineStats;

// ============ Output types ============

/// The two classes the detector distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsLabel {
    /// Class index 0 by convention.
    Fake,
    /// Class index 1 by convention.
    Real,
}

impl NewsLabel {
    /// The label string shown to the user and written to the export record.
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsLabel::Fake => "Fake",
            NewsLabel::Real => "Real",
        }
    }

    /// Visual marker shown next to the verdict.
    pub fn marker(&self) -> &'static str {
        match self {
            NewsLabel::Fake => "\u{274c}",
            NewsLabel::Real => "\u{2705}",
        }
    }

    /// Parses a label name from classifier metadata (`id2label` values).
    pub fn from_metadata_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("fake") {
            Some(NewsLabel::Fake)
        } else if name.contains("real") {
            Some(NewsLabel::Real)
        } else {
            None
        }
    }
}

impl std::fmt::Display for NewsLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prediction with label and confidence score.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// The predicted class.
    pub label: NewsLabel,
    /// Probability mass assigned to the predicted class (0.5 to 1.0 for a
    /// two-class head).
    pub score: f32,
}

/// Output of a single predict call.
#[derive(Debug)]
pub struct Output {
    /// The verdict.
    pub prediction: Prediction,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Pipeline ============

/// A model with its matching tokenizer, loaded and cached as one unit.
pub(crate) struct LoadedModel<M> {
    pub model: M,
    pub tokenizer: Tokenizer,
}

/// Classifies a news text as fake or real.
///
/// Construct with [`NewsDetectionPipelineBuilder`](super::NewsDetectionPipelineBuilder).
/// The model/tokenizer pair is shared behind an [`Arc`] through the
/// process-wide cache; every pipeline built against the same directories and
/// device reuses the same pair.
pub struct NewsDetectionPipeline<M: NewsDetectionModel> {
    pub(crate) loaded: Arc<LoadedModel<M>>,
}

impl<M: NewsDetectionModel> NewsDetectionPipeline<M> {
    /// Classifies one text.
    ///
    /// One synchronous forward pass per call. No batching, no retries.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::EmptyInput`] when the text is empty or
    /// whitespace-only; no inference runs in that case.
    pub fn run(&self, text: &str) -> Result<Output> {
        if text.trim().is_empty() {
            return Err(DetectorError::EmptyInput);
        }

        let stats_builder = PipelineStats::start();
        let prediction = self.loaded.model.predict(&self.loaded.tokenizer, text)?;

        Ok(Output {
            prediction,
            stats: stats_builder.finish(),
        })
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.loaded.model.device()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::detection::testing::stub_pipeline;

    #[test]
    fn empty_input_is_rejected_without_inference() {
        let pipeline = stub_pipeline(NewsLabel::Real, 0.9);
        assert!(matches!(
            pipeline.run(""),
            Err(DetectorError::EmptyInput)
        ));
        assert!(matches!(
            pipeline.run("   \n\t  "),
            Err(DetectorError::EmptyInput)
        ));
    }

    #[test]
    fn prediction_carries_label_and_score() {
        let pipeline = stub_pipeline(NewsLabel::Fake, 0.873);
        let output = pipeline.run("Officials deny all claims made in viral post.").unwrap();
        assert_eq!(output.prediction.label, NewsLabel::Fake);
        assert!((output.prediction.score - 0.873).abs() < f32::EPSILON);
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let pipeline = stub_pipeline(NewsLabel::Real, 0.61);
        let a = pipeline.run("same text").unwrap();
        let b = pipeline.run("same text").unwrap();
        assert_eq!(a.prediction.label, b.prediction.label);
        assert_eq!(a.prediction.score, b.prediction.score);
    }

    #[test]
    fn label_display_and_markers() {
        assert_eq!(NewsLabel::Fake.to_string(), "Fake");
        assert_eq!(NewsLabel::Real.to_string(), "Real");
        assert_eq!(NewsLabel::Fake.marker(), "\u{274c}");
        assert_eq!(NewsLabel::Real.marker(), "\u{2705}");
    }

    #[test]
    fn metadata_name_parsing() {
        assert_eq!(
            NewsLabel::from_metadata_name("FAKE"),
            Some(NewsLabel::Fake)
        );
        assert_eq!(
            NewsLabel::from_metadata_name("real news"),
            Some(NewsLabel::Real)
        );
        assert_eq!(NewsLabel::from_metadata_name("LABEL_0"), None);
    }
}
