use std::error::Error as _;
use thiserror::Error;

/// Why a single weather or places lookup produced no usable data.
///
/// These never abort a batch: the collector turns them into skipped cities and the
/// hotel search turns them into the "No hotel found" placeholder.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Failed to parse JSON response for '{resource}'")]
    JsonParse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response for '{resource}' has no value at '{path}'")]
    MissingField { resource: String, path: String },
}

impl LookupError {
    /// This error followed by every underlying cause, joined with `": "`.
    pub fn chain(&self) -> String {
        let mut text = self.to_string();
        let mut cause = self.source();
        while let Some(e) = cause {
            text.push_str(": ");
            text.push_str(&e.to_string());
            cause = e.source();
        }
        text
    }
}
