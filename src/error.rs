//! Structured error types for the Quire layout engine.
//!
//! Geometry is never rejected and layout itself is total, so most variants
//! describe the edges of the system: JSON input, fonts, images, the renderer
//! and the output sink.

use thiserror::Error;

/// The unified error type returned by all public Quire API functions.
#[derive(Debug, Error)]
pub enum QuireError {
    /// JSON input failed to parse as a valid Quire document.
    #[error("Failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font could not be loaded or parsed.
    #[error("Font error: {0}")]
    Font(String),

    /// An image source could not be read or decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// The layout engine hit a broken internal invariant.
    #[error("Layout error on page {page} at element {element}: {message}")]
    Layout {
        page: usize,
        element: usize,
        message: String,
    },

    /// The page renderer failed while drawing a placement.
    #[error("Render error on page {page}, element {element_index} ({element}): {message}")]
    Render {
        page: usize,
        element_index: usize,
        element: &'static str,
        message: String,
    },

    /// The page renderer failed while opening or closing a page.
    #[error("Render error on page {page}: {message}")]
    RenderPage { page: usize, message: String },

    /// The renderer failed outside of any page.
    #[error("Renderer error: {0}")]
    Renderer(String),

    /// Writing the finished output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, QuireError>;

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the Quire document schema. Check element types and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        QuireError::Parse { source: e, hint }
    }
}
