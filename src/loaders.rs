//! Local-path loading for the tokenizer / classifier pair.
//!
//! The demo loads everything from fixed directories on disk; there is no hub
//! download step. Missing or corrupt files surface as [`DetectorError::ModelLoad`]
//! and are fatal to the process at startup.

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::modernbert::{ClassifierConfig, ClassifierPooling, Config};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::{Tokenizer, TruncationParams};

use crate::error::{DetectorError, Result};

const TOKENIZER_FILE: &str = "tokenizer.json";
const CONFIG_FILE: &str = "config.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Fallback when `config.json` does not declare a maximum sequence length.
const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 512;

#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub dir: PathBuf,
}

impl TokenizerLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads `tokenizer.json` and enables truncation at `max_length`. Longer
    /// inputs are silently truncated, never rejected.
    pub fn load(&self, max_length: usize) -> Result<Tokenizer> {
        let path = self.dir.join(TOKENIZER_FILE);
        if !path.is_file() {
            return Err(DetectorError::ModelLoad(format!(
                "tokenizer file not found: {}",
                path.display()
            )));
        }

        let mut tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            DetectorError::Tokenization(format!(
                "failed to load tokenizer from '{}': {}",
                path.display(),
                e
            ))
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| {
                DetectorError::Tokenization(format!("invalid truncation parameters: {e}"))
            })?;

        Ok(tokenizer)
    }
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
    #[serde(default)]
    label2id: HashMap<String, u32>,
    max_position_embeddings: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ClassifierLoader {
    pub dir: PathBuf,
}

impl ClassifierLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Maximum input length the model accepts, read from `config.json`.
    pub fn max_sequence_length(&self) -> Result<usize> {
        let raw = self.read_config()?;
        let parsed: ClassifierConfigJson = serde_json::from_str(&raw)?;
        Ok(parsed
            .max_position_embeddings
            .unwrap_or(DEFAULT_MAX_SEQUENCE_LENGTH))
    }

    /// Loads the model config, weights, and label metadata from the local
    /// directory. Weights are taken from `model.safetensors` when present,
    /// `pytorch_model.bin` otherwise.
    pub fn load(
        &self,
        device: &Device,
    ) -> Result<(Config, VarBuilder<'static>, HashMap<String, String>)> {
        let config_str = self.read_config()?;
        let mut config: Config = serde_json::from_str(&config_str)?;
        let class_cfg: ClassifierConfigJson = serde_json::from_str(&config_str)?;

        let declared = class_cfg.label2id.len().max(class_cfg.id2label.len());
        if declared != 0 && declared != 2 {
            return Err(DetectorError::ModelLoad(format!(
                "expected a binary classifier, config declares {declared} labels"
            )));
        }
        patch_config_num_labels(&mut config, 2);

        let weights_path = self.weights_path()?;
        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, device)?
        };

        Ok((config, vb, class_cfg.id2label))
    }

    fn read_config(&self) -> Result<String> {
        let path = self.dir.join(CONFIG_FILE);
        std::fs::read_to_string(&path).map_err(|e| {
            DetectorError::ModelLoad(format!(
                "failed to read model config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn weights_path(&self) -> Result<PathBuf> {
        let safetensors = self.dir.join(SAFETENSORS_FILE);
        if safetensors.is_file() {
            return Ok(safetensors);
        }
        let pytorch = self.dir.join(PYTORCH_FILE);
        if pytorch.is_file() {
            return Ok(pytorch);
        }
        Err(DetectorError::ModelLoad(format!(
            "no model weights found in '{}' (looked for {} and {})",
            self.dir.display(),
            SAFETENSORS_FILE,
            PYTORCH_FILE
        )))
    }
}

// The classification head needs exactly two outputs even when the fine-tuned
// config omits label metadata.
fn patch_config_num_labels(config: &mut Config, num_labels: usize) {
    if config.classifier_config.is_none()
        || config
            .classifier_config
            .as_ref()
            .map(|c| c.id2label.len())
            .unwrap_or(0)
            != num_labels
    {
        let id2label: HashMap<String, String> = (0..num_labels)
            .map(|i| (i.to_string(), format!("label_{i}")))
            .collect();
        let label2id: HashMap<String, String> = id2label
            .iter()
            .map(|(k, v)| (v.clone(), k.clone()))
            .collect();

        config.classifier_config = Some(ClassifierConfig {
            id2label,
            label2id,
            classifier_pooling: ClassifierPooling::default(),
        });
    }
}
