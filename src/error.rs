use thiserror::Error;

/// Errors raised at the I/O and configuration boundaries.
///
/// Parsing, quantity scaling and ranking never fail; malformed recipe text
/// degrades into empty fields instead.
#[derive(Error, Debug)]
pub enum RecipeWebError {
    /// Failed to read recipe sources from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode a JSON document (e.g. the REPOSITORIES variable)
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// A repository identity failed validation
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    /// No configured repository belongs to the given author
    #[error("Unknown repository for author: {0}")]
    UnknownRepository(String),

    /// No recipe is stored under the given slug
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// Command-line or caller supplied an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
