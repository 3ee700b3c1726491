//! Error types for slide assembly.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Which placeholder element of a slide could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    Body,
}

impl std::fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceholderKind::Title => f.write_str("title"),
            PlaceholderKind::Body => f.write_str("body"),
        }
    }
}

/// Errors that can occur while compiling or assembling a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Slide content is malformed (missing title, blocks not a list, ...).
    #[error("Invalid slide content: {0}")]
    Validation(String),

    /// The content generator returned something that is not a presentation.
    #[error("Unusable generated content: {0}")]
    UpstreamContent(String),

    /// The document API did not report a title or body placeholder.
    #[error("Could not find {missing} placeholder on slide {slide_id}")]
    PlaceholderResolution {
        slide_id: String,
        missing: PlaceholderKind,
    },

    /// Submitting an operation batch failed, or the batch is malformed.
    #[error("Operation batch failed: {0}")]
    OperationBatch(String),

    /// The remote presentation itself could not be created.
    #[error("Failed to create presentation: {0}")]
    PresentationCreation(String),

    /// The diagram generator failed to produce an image.
    #[error("Diagram generation failed: {0}")]
    DiagramGeneration(String),

    /// Uploading a diagram to the file host failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The sentence summarizer could not process a text block.
    #[error("Summarization failed: {0}")]
    Summarize(String),

    /// The overall build deadline passed before this slide was reached.
    #[error("Build deadline exceeded before slide at index {index}")]
    DeadlineExceeded { index: usize },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or remove a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
