//! Fake-news detection demo: a pretrained binary text classifier behind a
//! single-page web UI.
//!
//! Powered by [Candle](https://github.com/huggingface/candle). The library
//! exposes a [`detection`] pipeline that loads a ModernBERT sequence
//! classifier from local files, and a [`server`] module serving the demo page.

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod error;
pub mod export;
pub mod server;

pub use pipelines::detection;
