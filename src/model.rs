use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host serving raw repository files; relative image references resolve against it.
pub const DEFAULT_RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";

/// All parsed recipes keyed by slug.
///
/// An ordered map keeps iteration (and therefore every ranking pass) deterministic.
pub type Corpus = BTreeMap<String, Recipe>;

/// Identity of a recipe source repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    pub author: String,
    pub repository: String,
    pub branch: String,
}

impl Repository {
    pub fn new(
        author: impl Into<String>,
        repository: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            repository: repository.into(),
            branch: branch.into(),
        }
    }

    /// Root URL for raw file content, always ending in `/`
    pub fn raw_root(&self, host: &str) -> String {
        format!(
            "https://{}/{}/{}/{}/",
            host, self.author, self.repository, self.branch
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMeta {
    #[serde(flatten)]
    pub repository: Repository,
    /// Source file path relative to the repository root
    pub path: String,
    /// `author/path-without-extension`, unique across the corpus
    pub slug: String,
}

impl RecipeMeta {
    pub fn new(path: &str, repository: &Repository) -> Self {
        Self {
            repository: repository.clone(),
            path: path.to_string(),
            slug: slug_for(&repository.author, path),
        }
    }

    pub fn author(&self) -> &str {
        &self.repository.author
    }

    /// Link to the file on GitHub
    pub fn source_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{}",
            self.repository.author, self.repository.repository, self.repository.branch, self.path
        )
    }
}

/// Derive the corpus key for a file: the author prefix keeps equal paths in
/// different repositories apart.
pub fn slug_for(author: &str, path: &str) -> String {
    let stem = path.strip_suffix(".md").unwrap_or(path);
    format!("{}/{}", author, stem)
}

/// A parsed RecipeMD document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub meta: RecipeMeta,
    pub title: String,
    /// Absolute URL of the first image in the document, or empty
    pub image_path: String,
    /// Raw markdown
    pub description: String,
    pub tags: Vec<String>,
    /// Raw yields text, tracks separated by `|`
    pub yields: String,
    /// Raw markdown
    pub ingredients: String,
    /// Raw markdown
    pub instructions: String,
    pub detected_language: String,
    /// Transient relevance score, overwritten on every ranking pass
    pub score: f64,
}

impl Recipe {
    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn author(&self) -> &str {
        self.meta.author()
    }

    /// Text values searched for the given field
    pub fn field_values(&self, field: RecipeField) -> Vec<&str> {
        match field {
            RecipeField::Title => vec![self.title.as_str()],
            RecipeField::Tags => self.tags.iter().map(String::as_str).collect(),
            RecipeField::Author => vec![self.author()],
            RecipeField::Description => vec![self.description.as_str()],
            RecipeField::Ingredients => vec![self.ingredients.as_str()],
            RecipeField::Instructions => vec![self.instructions.as_str()],
        }
    }
}

/// Recipe fields visible to fuzzy search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeField {
    Title,
    Tags,
    Author,
    Description,
    Ingredients,
    Instructions,
}
