use crate::error::Result;
use tokenizers::Tokenizer;

use super::pipeline::Prediction;

/// Model seam for the detection pipeline.
///
/// Implemented by [`NewsModernBert`](super::NewsModernBert); test doubles can
/// implement it to exercise the pipeline and the web layer without weights.
pub trait NewsDetectionModel {
    /// Options needed to locate and load the model.
    type Options: std::fmt::Debug + Clone;

    /// Loads the model onto the given device.
    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Runs one forward pass and returns the predicted label with its
    /// softmax probability.
    fn predict(&self, tokenizer: &Tokenizer, text: &str) -> Result<Prediction>;

    /// Loads the tokenizer that matches the model.
    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    /// Returns the device the model is running on.
    fn device(&self) -> &candle_core::Device;
}
