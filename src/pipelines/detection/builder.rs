use super::model::NewsDetectionModel;
use super::pipeline::{LoadedModel, NewsDetectionPipeline};
use crate::error::Result;
use crate::pipelines::cache::{global_cache, ModelOptions};
use crate::pipelines::utils::{build_cache_key, DeviceRequest};

/// Builder for creating [`NewsDetectionPipeline`] instances.
///
/// Use [`Self::modernbert`] as the entry point.
///
/// # Examples
///
/// ```rust,no_run
/// # use fakenews_detector::detection::NewsDetectionPipelineBuilder;
/// # fn main() -> fakenews_detector::error::Result<()> {
/// let pipeline = NewsDetectionPipelineBuilder::modernbert("model", "tokenizer")
///     .cpu()
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct NewsDetectionPipelineBuilder<M: NewsDetectionModel> {
    options: M::Options,
    device_request: DeviceRequest,
}

impl<M: NewsDetectionModel> NewsDetectionPipelineBuilder<M> {
    pub(crate) fn new(options: M::Options) -> Self {
        Self {
            options,
            device_request: DeviceRequest::Cpu,
        }
    }

    /// Use CPU for inference (default).
    pub fn cpu(mut self) -> Self {
        self.device_request = DeviceRequest::Cpu;
        self
    }

    /// Use a specific CUDA GPU for inference.
    pub fn cuda(mut self, index: usize) -> Self {
        self.device_request = DeviceRequest::Cuda(index);
        self
    }

    /// Builds the pipeline with configured settings.
    ///
    /// The model/tokenizer pair goes through the process-wide cache: the first
    /// build pays the deserialization cost, every later build against the same
    /// directories and device reuses the loaded pair.
    ///
    /// # Errors
    ///
    /// Returns an error if model or tokenizer loading fails, or if device
    /// initialization fails.
    pub fn build(self) -> Result<NewsDetectionPipeline<M>>
    where
        M: Send + Sync + 'static,
        M::Options: ModelOptions + Clone,
    {
        let device = self.device_request.resolve()?;
        let key = build_cache_key(&self.options, &device);
        let options = self.options;

        let loaded = global_cache().get_or_create(&key, move || {
            let model = M::new(options.clone(), device.clone())?;
            let tokenizer = M::get_tokenizer(options)?;
            Ok(LoadedModel { model, tokenizer })
        })?;

        Ok(NewsDetectionPipeline { loaded })
    }
}

impl NewsDetectionPipelineBuilder<super::NewsModernBert> {
    /// Creates a builder for a ModernBERT binary classifier stored in local
    /// directories: `model_dir` holds `config.json` and the weights,
    /// `tokenizer_dir` holds `tokenizer.json`.
    pub fn modernbert(
        model_dir: impl Into<std::path::PathBuf>,
        tokenizer_dir: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self::new(super::LocalModelDirs::new(model_dir, tokenizer_dir))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use candle_core::Device;
    use tokenizers::Tokenizer;

    use super::*;
    use crate::detection::{NewsLabel, Prediction};
    use crate::pipelines::detection::testing::stub_tokenizer;

    static TOKENIZER_LOADS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, Clone)]
    struct CountingOptions;

    impl ModelOptions for CountingOptions {
        fn cache_key(&self) -> String {
            "counting-stub".to_string()
        }
    }

    struct CountingStub {
        device: Device,
    }

    impl NewsDetectionModel for CountingStub {
        type Options = CountingOptions;

        fn new(_options: Self::Options, device: Device) -> Result<Self> {
            Ok(Self { device })
        }

        fn predict(&self, _tokenizer: &Tokenizer, _text: &str) -> Result<Prediction> {
            Ok(Prediction {
                label: NewsLabel::Real,
                score: 0.75,
            })
        }

        fn get_tokenizer(_options: Self::Options) -> Result<Tokenizer> {
            TOKENIZER_LOADS.fetch_add(1, Ordering::SeqCst);
            Ok(stub_tokenizer())
        }

        fn device(&self) -> &Device {
            &self.device
        }
    }

    #[test]
    fn rebuild_reuses_the_cached_pair() {
        let first = NewsDetectionPipelineBuilder::<CountingStub>::new(CountingOptions)
            .build()
            .unwrap();
        let second = NewsDetectionPipelineBuilder::<CountingStub>::new(CountingOptions)
            .build()
            .unwrap();

        // The tokenizer is loaded alongside the model, once per cache key.
        assert_eq!(TOKENIZER_LOADS.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.loaded, &second.loaded));

        let a = first.run("headline").unwrap();
        let b = second.run("headline").unwrap();
        assert_eq!(a.prediction.label, b.prediction.label);
    }
}
