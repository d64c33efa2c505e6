//! Structured error types for the flex layout engine.
//!
//! Three variants cover the real error sources: attribute validation,
//! host measurement, and JSON document parsing. Degenerate geometry
//! (zero width, single-item lines) is never an error.

use thiserror::Error;

/// The unified error type returned by all public flexline API functions.
#[derive(Debug, Error)]
pub enum FlexError {
    /// An attribute value could not be understood. The pass stops before
    /// any geometry is committed.
    #[error("Invalid attribute `{property}: {value}`: {reason}")]
    InvalidAttribute {
        property: String,
        value: String,
        reason: String,
    },
    /// The host could not measure an item whose basis resolves to `content`.
    #[error("Measurement unavailable for item {item}: {reason}")]
    MeasurementUnavailable { item: usize, reason: String },
    /// JSON input failed to parse as a valid flexline document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl FlexError {
    pub(crate) fn invalid(property: &str, value: &str, reason: impl Into<String>) -> Self {
        FlexError::InvalidAttribute {
            property: property.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FlexError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check attribute names; unknown keys are rejected.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FlexError::ParseError { source: e, hint }
    }
}
