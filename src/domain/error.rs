//! Domain error types for Gena Card.
//!
//! Session actions convert these into status messages; nothing here is
//! meant to reach the end user as a crash.

use thiserror::Error;

/// Failures of a text-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Missing Gemini API key (set GEMINI_API_KEY or api_key in config.toml)")]
    Configuration,

    #[error("Gemini returned no usable text")]
    EmptyResponse,

    #[error("Gemini request failed: {0}")]
    Transport(String),
}

/// Failures while accepting card artwork.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Please choose an image file ({0} is not an image)")]
    UnsupportedFileType(String),

    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),
}

/// The card region could not be captured as an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Card rendering failed: {0}")]
pub struct RenderError(pub String);

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failures of the download action.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Invalid PNG data URL")]
    InvalidDataUrl,

    #[error("Failed to write card image: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of clipboard and share surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Clipboard unavailable")]
    ClipboardUnavailable,

    #[error("Native share is not supported")]
    ShareUnavailable,

    #[error("Share cancelled by user")]
    Cancelled,

    #[error("Share failed: {0}")]
    Failed(String),
}
