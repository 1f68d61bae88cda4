use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::RecipeWebError;
use crate::model::{Repository, DEFAULT_RAW_CONTENT_HOST};

/// Environment variable holding the repository list as a JSON array
pub const REPOSITORIES_VAR: &str = "REPOSITORIES";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeWebConfig {
    /// Repositories making up the corpus
    #[serde(default)]
    pub repositories: Vec<Repository>,
    /// Host serving raw repository content
    #[serde(default = "default_raw_content_host")]
    pub raw_content_host: String,
    /// Directory holding checked-out repositories as `<author>/<repository>`
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
    /// Search and ranking tuning
    #[serde(default)]
    pub search: SearchConfig,
    /// Slugs of favorited recipes
    #[serde(default)]
    pub favorites: Vec<String>,
    /// Fixed shuffle seed; a fresh one is drawn per session when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Configuration for fuzzy search and ranking
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Match cost above which results are dropped (0.0-1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Score bonus for favorited recipes
    #[serde(default = "default_favorite_bonus")]
    pub favorite_bonus: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            favorite_bonus: default_favorite_bonus(),
        }
    }
}

impl Default for RecipeWebConfig {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            raw_content_host: default_raw_content_host(),
            library_dir: default_library_dir(),
            search: SearchConfig::default(),
            favorites: Vec::new(),
            seed: None,
        }
    }
}

// Default value functions
fn default_raw_content_host() -> String {
    DEFAULT_RAW_CONTENT_HOST.to_string()
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("recipes")
}

fn default_threshold() -> f64 {
    0.4
}

fn default_favorite_bonus() -> f64 {
    20.0
}

impl RecipeWebConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. `REPOSITORIES` JSON array (repository list only)
    /// 2. Environment variables with RECIPE_WEB__ prefix
    /// 3. recipe-web.toml file in current directory
    /// 4. Default values
    pub fn load() -> Result<Self, RecipeWebError> {
        let mut config = load_config()?;
        if let Ok(json) = std::env::var(REPOSITORIES_VAR) {
            config.repositories = repositories_from_json(&json)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject malformed repository identities before they reach the parser
    pub fn validate(&self) -> Result<(), RecipeWebError> {
        self.repositories.iter().try_for_each(validate_repository)?;
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(RecipeWebError::InvalidArgument(format!(
                "search threshold must be within 0.0-1.0, got {}",
                self.search.threshold
            )));
        }
        Ok(())
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: RECIPE_WEB__SEARCH__THRESHOLD
pub fn load_config() -> Result<RecipeWebConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-web").required(false))
        // Use double underscore for nested: RECIPE_WEB__SEARCH__FAVORITE_BONUS
        .add_source(
            Environment::with_prefix("RECIPE_WEB")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Parse and validate a JSON array of `{author, repository, branch}` objects
pub fn repositories_from_json(json: &str) -> Result<Vec<Repository>, RecipeWebError> {
    let repositories: Vec<Repository> = serde_json::from_str(json)?;
    repositories.iter().try_for_each(validate_repository)?;
    Ok(repositories)
}

fn validate_repository(repository: &Repository) -> Result<(), RecipeWebError> {
    let fields = [
        ("author", &repository.author),
        ("repository", &repository.repository),
        ("branch", &repository.branch),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(RecipeWebError::InvalidRepository(format!(
                "{} must not be empty",
                name
            )));
        }
    }
    for (name, value) in &fields[..2] {
        if value.contains('/') {
            return Err(RecipeWebError::InvalidRepository(format!(
                "{} must not contain '/': {}",
                name, value
            )));
        }
    }
    Ok(())
}
