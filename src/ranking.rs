//! Orders the corpus for list views.
//!
//! Without a query the order is a shuffle that is stable for a given seed;
//! with a query it follows fuzzy-match relevance. In both cases favorites get
//! a fixed bonus so they float towards the front.
//!
//! Ranking is synchronous and pure: every call recomputes the order from the
//! corpus snapshot it is given. Callers debounce live input and pass only the
//! settled query text.

use log::debug;

use crate::favorites::Favorites;
use crate::model::{Corpus, Recipe};
use crate::search::{
    FuzzySearch, StrsimSearch, WeightedField, DEFAULT_FIELDS, DEFAULT_THRESHOLD,
};

/// Score added to favorited recipes before sorting
pub const FAVORITE_BONUS: f64 = 20.0;

/// Stand-in for a perfect (zero) match cost, keeping scores finite
pub const ZERO_COST_EPSILON: f64 = f64::EPSILON;

/// Optional author and tag constraints, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub author: Option<String>,
    pub tag: Option<String>,
}

impl Filter {
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let author_ok = self
            .author
            .as_deref()
            .map_or(true, |author| recipe.author() == author);
        let tag_ok = self
            .tag
            .as_deref()
            .map_or(true, |tag| recipe.tags.iter().any(|t| t == tag));
        author_ok && tag_ok
    }
}

/// Inputs of a single ranking pass
pub struct RankingContext<'a> {
    pub corpus: &'a Corpus,
    pub filter: &'a Filter,
    pub query: &'a str,
    pub favorites: &'a dyn Favorites,
    /// Session seed for the no-query shuffle
    pub seed: u64,
}

/// Result of a ranking pass
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Recipes ordered by score plus favorite bonus; `score` holds the bare score
    pub recipes: Vec<Recipe>,
    /// Number of recipes that passed the filter
    pub candidates: usize,
}

impl Ranking {
    /// Same recipes ordered strictly by score, ignoring favorites
    pub fn by_relevance(&self) -> Vec<&Recipe> {
        let mut ordered: Vec<&Recipe> = self.recipes.iter().collect();
        ordered.sort_by(|a, b| b.score.total_cmp(&a.score));
        ordered
    }

    /// "results / candidates", as shown above search results
    pub fn summary(&self) -> String {
        format!("{} / {}", self.recipes.len(), self.candidates)
    }
}

/// Ranks a corpus with an injected fuzzy search
pub struct RankingEngine {
    search: Box<dyn FuzzySearch>,
    fields: Vec<WeightedField>,
    threshold: f64,
    favorite_bonus: f64,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(Box::new(StrsimSearch::new()))
    }
}

impl RankingEngine {
    pub fn new(search: Box<dyn FuzzySearch>) -> Self {
        Self {
            search,
            fields: DEFAULT_FIELDS.to_vec(),
            threshold: DEFAULT_THRESHOLD,
            favorite_bonus: FAVORITE_BONUS,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_favorite_bonus(mut self, bonus: f64) -> Self {
        self.favorite_bonus = bonus;
        self
    }

    pub fn with_fields(mut self, fields: Vec<WeightedField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn rank(&self, context: &RankingContext<'_>) -> Ranking {
        let candidates: Vec<&Recipe> = context
            .corpus
            .values()
            .filter(|recipe| context.filter.matches(recipe))
            .collect();

        let query = context.query.trim();
        let mut recipes = if query.is_empty() {
            shuffled(&candidates, context.seed)
        } else {
            self.search
                .search(&candidates, &self.fields, self.threshold, query)
                .into_iter()
                .map(|hit| {
                    let mut recipe = hit.item.clone();
                    recipe.score = relevance_score(hit.cost);
                    recipe
                })
                .collect()
        };
        sort_by_composite(&mut recipes, context.favorites, self.favorite_bonus);

        debug!(
            "Ranked {} of {} candidates (query: {:?}, seed: {})",
            recipes.len(),
            candidates.len(),
            query,
            context.seed
        );

        Ranking {
            recipes,
            candidates: candidates.len(),
        }
    }
}

/// Relevance score for a match cost: `-log10(cost)`, with zero cost clamped
pub fn relevance_score(cost: f64) -> f64 {
    let cost = if cost <= 0.0 { ZERO_COST_EPSILON } else { cost };
    -cost.log10()
}

/// Deterministic pseudo-random sort key for a recipe within a session
pub fn shuffle_key(slug: &str, seed: u64) -> u64 {
    let hash = blake3::hash(format!("{}{}", slug, seed).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

/// Candidates in shuffle order, scored so that order survives the
/// composite sort: scores fall from 1 towards 0 and stay below the bonus
fn shuffled(candidates: &[&Recipe], seed: u64) -> Vec<Recipe> {
    let mut ordered: Vec<&Recipe> = candidates.to_vec();
    ordered.sort_by_cached_key(|recipe| shuffle_key(recipe.slug(), seed));
    let total = ordered.len() as f64;
    ordered
        .into_iter()
        .enumerate()
        .map(|(position, recipe)| {
            let mut recipe = recipe.clone();
            recipe.score = 1.0 - position as f64 / total;
            recipe
        })
        .collect()
}

/// Stable sort, best first, by score plus the bonus for favorites.
///
/// Equal composite scores keep their incoming order.
pub fn sort_by_composite(recipes: &mut [Recipe], favorites: &dyn Favorites, bonus: f64) {
    let composite = |recipe: &Recipe| {
        if favorites.is_favorite(recipe.slug()) {
            recipe.score + bonus
        } else {
            recipe.score
        }
    };
    recipes.sort_by(|a, b| composite(b).total_cmp(&composite(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::InMemoryFavorites;
    use crate::model::{RecipeMeta, Repository};

    fn recipe(author: &str, name: &str, tags: &[&str], score: f64) -> Recipe {
        Recipe {
            meta: RecipeMeta::new(
                &format!("{}.md", name),
                &Repository::new(author, "recipes", "main"),
            ),
            title: name.to_string(),
            image_path: String::new(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            yields: String::new(),
            ingredients: String::new(),
            instructions: String::new(),
            detected_language: String::new(),
            score,
        }
    }

    #[test]
    fn test_filter() {
        let r = recipe("alice", "cake", &["sweet", "baking"], 0.0);
        assert!(Filter::default().matches(&r));
        assert!(Filter::default().author("alice").matches(&r));
        assert!(!Filter::default().author("bob").matches(&r));
        assert!(Filter::default().tag("sweet").matches(&r));
        assert!(!Filter::default().tag("swee").matches(&r));
        assert!(!Filter::default().author("alice").tag("savory").matches(&r));
    }

    #[test]
    fn test_relevance_score() {
        assert_eq!(relevance_score(1.0), 0.0);
        assert!((relevance_score(0.01) - 2.0).abs() < 1e-12);
        assert!(relevance_score(0.0).is_finite());
        assert!(relevance_score(0.0) > 15.0);
    }

    #[test]
    fn test_shuffle_key_depends_on_seed() {
        assert_eq!(shuffle_key("alice/cake", 7), shuffle_key("alice/cake", 7));
        assert_ne!(shuffle_key("alice/cake", 7), shuffle_key("alice/cake", 8));
    }

    #[test]
    fn test_favorite_bonus_dominance() {
        let favorites: InMemoryFavorites = vec!["alice/fav"].into_iter().collect();
        let mut recipes = vec![
            recipe("alice", "high", &[], 21.0),
            recipe("alice", "mid", &[], 19.0),
            recipe("alice", "fav", &[], 0.1),
        ];
        sort_by_composite(&mut recipes, &favorites, FAVORITE_BONUS);
        let order: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(order, vec!["high", "fav", "mid"]);
    }

    #[test]
    fn test_by_relevance_ignores_favorites() {
        let ranking = Ranking {
            recipes: vec![
                recipe("alice", "fav", &[], 0.5),
                recipe("alice", "best", &[], 3.0),
            ],
            candidates: 2,
        };
        let order: Vec<&str> = ranking
            .by_relevance()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(order, vec!["best", "fav"]);
        assert_eq!(ranking.summary(), "2 / 2");
    }

    #[test]
    fn test_shuffled_scores_stay_below_bonus() {
        let a = recipe("alice", "a", &[], 0.0);
        let b = recipe("alice", "b", &[], 0.0);
        let c = recipe("alice", "c", &[], 0.0);
        let ordered = shuffled(&[&a, &b, &c], 42);
        assert_eq!(ordered.len(), 3);
        assert_eq!(ordered[0].score, 1.0);
        assert!(ordered.windows(2).all(|w| w[0].score > w[1].score));
        assert!(ordered.iter().all(|r| r.score > 0.0 && r.score < FAVORITE_BONUS));
    }
}
