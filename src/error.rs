//! Structured error types for the Bookflow engine.
//!
//! The transform itself is total: any text input produces a page list.
//! Errors only arise at the request boundary — malformed JSON, seed
//! colors that are not hex, or a degenerate page box.

use thiserror::Error;

/// The unified error type returned by the public JSON API.
#[derive(Debug, Error)]
pub enum BookflowError {
    /// JSON input failed to parse as a layout request.
    #[error("failed to parse layout request: {source}{hint}")]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// A seed color was not a `#rrggbb` hex string.
    #[error("invalid seed color {0:?}: expected a #rrggbb hex string")]
    InvalidColor(String),

    /// The page box has a non-positive dimension.
    #[error("page box must have positive dimensions, got {width}x{height}")]
    InvalidPageBox { width: f64, height: f64 },

    /// The produced page list failed to serialize (should not happen for
    /// well-formed blocks; surfaced rather than panicking).
    #[error("failed to serialize page list: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl From<serde_json::Error> for BookflowError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "\n  Hint: check for trailing commas, missing quotes, or unescaped characters."
            }
            serde_json::error::Category::Data => {
                "\n  Hint: the JSON is valid but doesn't match the request schema. Check field names and types."
            }
            serde_json::error::Category::Eof => "\n  Hint: unexpected end of input — is the JSON truncated?",
            serde_json::error::Category::Io => "",
        };
        BookflowError::Parse {
            source: e,
            hint: hint.to_string(),
        }
    }
}
