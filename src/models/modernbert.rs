use candle_core::{Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_transformers::models::modernbert::ModernBertForSequenceClassification as CandleModernBertForSequenceClassification;
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::error::{DetectorError, Result};
use crate::loaders::{ClassifierLoader, TokenizerLoader};
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::detection::model::NewsDetectionModel;
use crate::pipelines::detection::pipeline::{NewsLabel, Prediction};

/// Filesystem locations of the classifier weights and tokenizer.
#[derive(Debug, Clone)]
pub struct LocalModelDirs {
    /// Directory holding `config.json` and the model weights.
    pub model_dir: PathBuf,
    /// Directory holding `tokenizer.json`.
    pub tokenizer_dir: PathBuf,
}

impl LocalModelDirs {
    /// Creates options pointing at the given local directories.
    pub fn new(model_dir: impl Into<PathBuf>, tokenizer_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            tokenizer_dir: tokenizer_dir.into(),
        }
    }
}

impl ModelOptions for LocalModelDirs {
    fn cache_key(&self) -> String {
        format!(
            "{}|{}",
            self.model_dir.display(),
            self.tokenizer_dir.display()
        )
    }
}

/// ModernBERT binary sequence classifier loaded from local files.
pub struct NewsModernBertModel {
    model: CandleModernBertForSequenceClassification,
    device: Device,
    labels: [NewsLabel; 2],
}

impl NewsModernBertModel {
    pub(crate) fn new(options: LocalModelDirs, device: Device) -> Result<Self> {
        let loader = ClassifierLoader::new(&options.model_dir);
        let (config, vb, id2label) = loader.load(&device)?;
        let model = CandleModernBertForSequenceClassification::load(vb, &config)?;
        let labels = resolve_labels(&id2label);

        Ok(Self {
            model,
            device,
            labels,
        })
    }
}

/// Maps class indices to labels. The `id2label` metadata wins when it names
/// both classes; otherwise the conventional mapping applies (0 = Fake,
/// 1 = Real).
fn resolve_labels(id2label: &HashMap<String, String>) -> [NewsLabel; 2] {
    let by_index = |i: usize| {
        id2label
            .get(&i.to_string())
            .and_then(|name| NewsLabel::from_metadata_name(name))
    };

    match (by_index(0), by_index(1)) {
        (Some(first), Some(second)) if first != second => [first, second],
        _ => [NewsLabel::Fake, NewsLabel::Real],
    }
}

impl NewsDetectionModel for NewsModernBertModel {
    type Options = LocalModelDirs;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        NewsModernBertModel::new(options, device)
    }

    fn predict(&self, tokenizer: &Tokenizer, text: &str) -> Result<Prediction> {
        let tokens = tokenizer.encode(text, true).map_err(|e| {
            DetectorError::Tokenization(format!(
                "tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;

        let probs = softmax(&logits, D::Minus1)?;
        let probs_vec = probs.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs_vec.get(pred_id as usize).copied().unwrap_or(0.0);

        let label = *self.labels.get(pred_id as usize).ok_or_else(|| {
            DetectorError::Unexpected(format!(
                "predicted class id {pred_id} out of range for a binary classifier"
            ))
        })?;

        Ok(Prediction { label, score })
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        let max_length = ClassifierLoader::new(&options.model_dir).max_sequence_length()?;
        TokenizerLoader::new(&options.tokenizer_dir).load(max_length)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn metadata_names_win_over_convention() {
        let labels = resolve_labels(&metadata(&[("0", "REAL"), ("1", "FAKE")]));
        assert_eq!(labels, [NewsLabel::Real, NewsLabel::Fake]);
    }

    #[test]
    fn unnamed_metadata_falls_back_to_convention() {
        let labels = resolve_labels(&metadata(&[("0", "LABEL_0"), ("1", "LABEL_1")]));
        assert_eq!(labels, [NewsLabel::Fake, NewsLabel::Real]);
    }

    #[test]
    fn missing_metadata_falls_back_to_convention() {
        let labels = resolve_labels(&HashMap::new());
        assert_eq!(labels, [NewsLabel::Fake, NewsLabel::Real]);
    }

    #[test]
    fn duplicate_metadata_names_fall_back_to_convention() {
        let labels = resolve_labels(&metadata(&[("0", "fake"), ("1", "fake news")]));
        assert_eq!(labels, [NewsLabel::Fake, NewsLabel::Real]);
    }
}
