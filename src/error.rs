//! Error handling for the skill gap analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillGapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Taxonomy load error: {0}")]
    TaxonomyLoad(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Verification error: {0}")]
    Verification(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillGapError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for SkillGapError {
    fn from(err: anyhow::Error) -> Self {
        SkillGapError::Processing(err.to_string())
    }
}

/// Convert reqwest errors to our custom error type
impl From<reqwest::Error> for SkillGapError {
    fn from(err: reqwest::Error) -> Self {
        SkillGapError::Network(err.to_string())
    }
}
