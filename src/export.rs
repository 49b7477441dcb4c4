//! One-row CSV export of a prediction.
//!
//! Mirrors the on-screen result: the (newline-normalized) input text, the
//! label, and the confidence formatted to one decimal place.

use crate::detection::Prediction;

/// Header of the exported table.
pub const CSV_HEADER: &str = "text,prediction,confidence";

/// Default filename offered for the download.
pub const EXPORT_FILE_NAME: &str = "my_prediction.csv";

/// A single prediction frozen into exportable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRecord {
    /// The input text with newlines normalized to spaces.
    pub text: String,
    /// The label string ("Fake" or "Real").
    pub prediction: String,
    /// The confidence, e.g. `"97.3%"`.
    pub confidence: String,
}

impl PredictionRecord {
    /// Builds the record for one prediction over `text`.
    pub fn new(text: &str, prediction: &Prediction) -> Self {
        Self {
            text: normalize_newlines(text),
            prediction: prediction.label.to_string(),
            confidence: format!("{:.1}%", prediction.score * 100.0),
        }
    }

    /// Serializes the record as UTF-8 delimited text: a header line and
    /// exactly one data row, with minimal RFC 4180 quoting.
    pub fn to_csv(&self) -> String {
        format!(
            "{}\n{},{},{}\n",
            CSV_HEADER,
            csv_field(&self.text),
            csv_field(&self.prediction),
            csv_field(&self.confidence),
        )
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
