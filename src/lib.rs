pub mod config;
pub mod error;
pub mod favorites;
pub mod language;
pub mod model;
pub mod parser;
pub mod quantity;
pub mod ranking;
pub mod scaler;
pub mod search;
pub mod source;
pub mod tokenizer;
pub mod yields;

use log::info;

pub use crate::config::{load_config, RecipeWebConfig, SearchConfig};
pub use crate::error::RecipeWebError;
pub use crate::favorites::{Favorites, InMemoryFavorites};
pub use crate::model::{Corpus, Recipe, RecipeField, RecipeMeta, Repository};
pub use crate::parser::RecipeParser;
pub use crate::quantity::{
    multiply_amount, split_amount, split_amount_list, split_amount_unit, Amount, Quantity,
};
pub use crate::ranking::{Filter, Ranking, RankingContext, RankingEngine, FAVORITE_BONUS};
pub use crate::scaler::{scale_ingredients, shopping_list};
pub use crate::source::{build_corpus, LocalSource, RecipeSource};
pub use crate::yields::YieldControls;

/// Parse one RecipeMD document with the default tokenizer and language detector
pub fn parse_recipe(path: &str, content: &str, repository: &Repository) -> Recipe {
    RecipeParser::default().parse(path, content, repository)
}

/// Parser honoring the configured raw content host
pub fn parser_for(config: &RecipeWebConfig) -> RecipeParser {
    RecipeParser::default().with_raw_content_host(config.raw_content_host.clone())
}

/// Ranking engine honoring the configured threshold and favorite bonus
pub fn ranking_engine_for(config: &RecipeWebConfig) -> RankingEngine {
    RankingEngine::default()
        .with_threshold(config.search.threshold)
        .with_favorite_bonus(config.search.favorite_bonus)
}

/// Build the corpus for every configured repository from the local library
pub fn load_corpus(config: &RecipeWebConfig) -> Result<Corpus, RecipeWebError> {
    let source = LocalSource::new(&config.library_dir);
    let corpus = build_corpus(&source, &config.repositories, &parser_for(config))?;
    info!("Loaded {} recipes", corpus.len());
    Ok(corpus)
}
