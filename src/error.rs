use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Animal not found: {0}")]
    AnimalNotFound(String),

    #[error("Sub-species '{sub_species}' not found for {animal}")]
    SubSpeciesNotFound { animal: String, sub_species: String },

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Commercial feed not found: {0}")]
    FeedNotFound(String),

    #[error("No commercial feed is selected for this animal")]
    NoBulkFeed,

    #[error("Invalid suggestion: {0}")]
    InvalidSuggestion(String),

    #[error("Suggestion provider failed: {0}")]
    ProviderFailure(#[source] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failures of the external suggestion request. The cause is kept for diagnostics.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<ProviderError> for FeedError {
    fn from(err: ProviderError) -> Self {
        FeedError::ProviderFailure(err)
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
