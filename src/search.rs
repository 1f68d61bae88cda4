//! Weighted fuzzy matching over recipe fields.

use crate::model::{Recipe, RecipeField};

/// A searchable field and its relative importance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedField {
    pub field: RecipeField,
    pub weight: f64,
}

impl WeightedField {
    pub const fn new(field: RecipeField, weight: f64) -> Self {
        Self { field, weight }
    }
}

/// Title matches dominate, then tags, then everything else equally
pub const DEFAULT_FIELDS: [WeightedField; 6] = [
    WeightedField::new(RecipeField::Title, 10.0),
    WeightedField::new(RecipeField::Tags, 5.0),
    WeightedField::new(RecipeField::Author, 1.0),
    WeightedField::new(RecipeField::Description, 1.0),
    WeightedField::new(RecipeField::Ingredients, 1.0),
    WeightedField::new(RecipeField::Instructions, 1.0),
];

/// Matches worse than this cost are dropped
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// A matched recipe; `cost` is in `[0, 1]`, 0 being a perfect match
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub item: &'a Recipe,
    pub cost: f64,
}

pub trait FuzzySearch: Send + Sync {
    /// Matching items ordered best first
    fn search<'a>(
        &self,
        items: &[&'a Recipe],
        fields: &[WeightedField],
        threshold: f64,
        query: &str,
    ) -> Vec<SearchHit<'a>>;
}

/// Edit-distance search backed by `strsim`.
///
/// A field costs 0 when it contains the query (case-insensitively), otherwise
/// one minus the best normalized Levenshtein similarity between the query and
/// any run of as many consecutive words. Matched fields combine into the item
/// cost as a product weighted by field weight and damped for long fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrsimSearch;

impl StrsimSearch {
    pub fn new() -> Self {
        Self
    }
}

/// Cost of matching a lowercased query against one field value, and the
/// value's word count
fn field_cost(query: &str, query_words: usize, value: &str) -> (f64, usize) {
    let value = value.to_lowercase();
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.is_empty() {
        return (1.0, 0);
    }
    if value.contains(query) {
        return (0.0, words.len());
    }
    let window = query_words.clamp(1, words.len());
    let best = words
        .windows(window)
        .map(|run| strsim::normalized_levenshtein(query, &run.join(" ")))
        .fold(0.0_f64, f64::max);
    (1.0 - best, words.len())
}

impl FuzzySearch for StrsimSearch {
    fn search<'a>(
        &self,
        items: &[&'a Recipe],
        fields: &[WeightedField],
        threshold: f64,
        query: &str,
    ) -> Vec<SearchHit<'a>> {
        let query = query.trim().to_lowercase();
        let query_words = query.split_whitespace().count();
        let total_weight: f64 = fields.iter().map(|f| f.weight).sum();
        if query_words == 0 || total_weight <= 0.0 {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'a>> = items
            .iter()
            .copied()
            .filter_map(|item| {
                let mut matched = false;
                let mut cost = 1.0_f64;
                for weighted in fields {
                    let best = item
                        .field_values(weighted.field)
                        .into_iter()
                        .map(|value| field_cost(&query, query_words, value))
                        .min_by(|a, b| a.0.total_cmp(&b.0));
                    let Some((value_cost, words)) = best else {
                        continue;
                    };
                    if value_cost > threshold {
                        continue;
                    }
                    matched = true;
                    let norm = 1.0 / (words.max(1) as f64).sqrt();
                    let exponent = weighted.weight / total_weight * norm;
                    cost *= value_cost.max(f64::EPSILON).powf(exponent);
                }
                matched.then_some(SearchHit { item, cost })
            })
            .collect();

        hits.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecipeMeta, Repository};

    fn recipe(title: &str, tags: &[&str], ingredients: &str) -> Recipe {
        Recipe {
            meta: RecipeMeta::new(
                &format!("{}.md", title.to_lowercase().replace(' ', "-")),
                &Repository::new("alice", "recipes", "main"),
            ),
            title: title.to_string(),
            image_path: String::new(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            yields: String::new(),
            ingredients: ingredients.to_string(),
            instructions: String::new(),
            detected_language: String::new(),
            score: 0.0,
        }
    }

    #[test]
    fn test_title_match_beats_ingredient_match() {
        let pie = recipe("Apple Pie", &["dessert"], "- apples\n- flour");
        let salad = recipe("Green Salad", &["side"], "- apple\n- lettuce");
        let items = vec![&salad, &pie];
        let hits = StrsimSearch.search(&items, &DEFAULT_FIELDS, DEFAULT_THRESHOLD, "apple");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item.title, "Apple Pie");
        assert!(hits[0].cost < hits[1].cost);
    }

    #[test]
    fn test_typo_still_matches() {
        let soup = recipe("Tomato Soup", &[], "");
        let items = vec![&soup];
        let hits = StrsimSearch.search(&items, &DEFAULT_FIELDS, DEFAULT_THRESHOLD, "tomatoe");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].cost > 0.0 && hits[0].cost <= 1.0);
    }

    #[test]
    fn test_unrelated_query_is_excluded() {
        let soup = recipe("Tomato Soup", &["vegan"], "- tomatoes");
        let items = vec![&soup];
        let hits = StrsimSearch.search(&items, &DEFAULT_FIELDS, DEFAULT_THRESHOLD, "chocolate");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_tag_match() {
        let soup = recipe("Tomato Soup", &["vegan", "quick"], "");
        let items = vec![&soup];
        let hits = StrsimSearch.search(&items, &DEFAULT_FIELDS, DEFAULT_THRESHOLD, "Vegan");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let soup = recipe("Tomato Soup", &[], "");
        let items = vec![&soup];
        assert!(StrsimSearch
            .search(&items, &DEFAULT_FIELDS, DEFAULT_THRESHOLD, "  ")
            .is_empty());
    }

    #[test]
    fn test_field_cost() {
        assert_eq!(field_cost("soup", 1, "Tomato Soup"), (0.0, 2));
        assert_eq!(field_cost("soup", 1, ""), (1.0, 0));
        let (cost, _) = field_cost("sopu", 1, "tomato soup");
        assert!(cost > 0.0 && cost < 1.0);
    }
}
