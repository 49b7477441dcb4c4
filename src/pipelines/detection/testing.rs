//! Test doubles for the detection pipeline. Compiled only for tests.

use std::sync::Arc;

use candle_core::Device;
use tokenizers::models::bpe::BPE;
use tokenizers::Tokenizer;

use super::model::NewsDetectionModel;
use super::pipeline::{LoadedModel, NewsDetectionPipeline, NewsLabel, Prediction};
use crate::error::Result;

/// Fixed-answer model. Ignores the tokenizer and the input text.
pub(crate) struct StubModel {
    pub label: NewsLabel,
    pub score: f32,
    device: Device,
}

impl NewsDetectionModel for StubModel {
    type Options = ();

    fn new(_options: Self::Options, device: Device) -> Result<Self> {
        Ok(Self {
            label: NewsLabel::Real,
            score: 0.5,
            device,
        })
    }

    fn predict(&self, _tokenizer: &Tokenizer, _text: &str) -> Result<Prediction> {
        Ok(Prediction {
            label: self.label,
            score: self.score,
        })
    }

    fn get_tokenizer(_options: Self::Options) -> Result<Tokenizer> {
        Ok(stub_tokenizer())
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

pub(crate) fn stub_tokenizer() -> Tokenizer {
    Tokenizer::new(BPE::default())
}

pub(crate) fn stub_pipeline(label: NewsLabel, score: f32) -> NewsDetectionPipeline<StubModel> {
    NewsDetectionPipeline {
        loaded: Arc::new(LoadedModel {
            model: StubModel {
                label,
                score,
                device: Device::Cpu,
            },
            tokenizer: stub_tokenizer(),
        }),
    }
}
