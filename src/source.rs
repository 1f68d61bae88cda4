//! Recipe sources and corpus assembly.
//!
//! Fetching documents is delegated to a [`RecipeSource`]; this crate ships a
//! [`LocalSource`] that reads checked-out repositories from disk.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RecipeWebError;
use crate::model::{Corpus, Recipe, Repository};
use crate::parser::RecipeParser;

/// Supplies recipe documents for a repository
pub trait RecipeSource {
    /// Every file path in the repository, relative, `/`-separated
    fn list_paths(&self, repository: &Repository) -> Result<Vec<String>, RecipeWebError>;

    /// Raw text of one file
    fn fetch(&self, repository: &Repository, path: &str) -> Result<String, RecipeWebError>;
}

/// Markdown files other than the repository README are recipes
pub fn is_recipe_path(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    path.ends_with(".md") && file_name != "README.md"
}

/// Repositories checked out under `<root>/<author>/<repository>/`
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn repository_dir(&self, repository: &Repository) -> PathBuf {
        self.root
            .join(&repository.author)
            .join(&repository.repository)
    }
}

fn collect_files(dir: &Path, prefix: &str, paths: &mut Vec<String>) -> Result<(), RecipeWebError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        if entry.file_type()?.is_dir() {
            collect_files(&entry.path(), &relative, paths)?;
        } else {
            paths.push(relative);
        }
    }
    Ok(())
}

impl RecipeSource for LocalSource {
    fn list_paths(&self, repository: &Repository) -> Result<Vec<String>, RecipeWebError> {
        let mut paths = Vec::new();
        collect_files(&self.repository_dir(repository), "", &mut paths)?;
        paths.sort();
        Ok(paths)
    }

    fn fetch(&self, repository: &Repository, path: &str) -> Result<String, RecipeWebError> {
        let mut file = self.repository_dir(repository);
        for segment in path.split('/') {
            if segment == ".." {
                return Err(RecipeWebError::InvalidArgument(format!(
                    "path escapes repository: {}",
                    path
                )));
            }
            file.push(segment);
        }
        Ok(fs::read_to_string(file)?)
    }
}

/// Parse every recipe of every repository into one corpus.
///
/// A later document with the same slug replaces an earlier one.
pub fn build_corpus(
    source: &dyn RecipeSource,
    repositories: &[Repository],
    parser: &RecipeParser,
) -> Result<Corpus, RecipeWebError> {
    let mut corpus = Corpus::new();
    info!("Found repos: {}", repositories.len());
    for repository in repositories {
        let paths: Vec<String> = source
            .list_paths(repository)?
            .into_iter()
            .filter(|path| is_recipe_path(path))
            .collect();
        info!(
            "Found {} recipes in {}/{}",
            paths.len(),
            repository.author,
            repository.repository
        );
        for path in paths {
            let content = source.fetch(repository, &path)?;
            let recipe = parser.parse(&path, &content, repository);
            debug!("Recipe parsed: {}", recipe.meta.slug);
            if let Some(previous) = corpus.insert(recipe.meta.slug.clone(), recipe) {
                warn!("Duplicate slug {}, keeping the later file", previous.meta.slug);
            }
        }
    }
    Ok(corpus)
}

/// Find the repository and file path a slug refers to
pub fn locate<'a>(
    slug: &str,
    repositories: &'a [Repository],
) -> Result<(&'a Repository, String), RecipeWebError> {
    let (author, rest) = slug
        .split_once('/')
        .filter(|(_, rest)| !rest.is_empty())
        .ok_or_else(|| RecipeWebError::RecipeNotFound(slug.to_string()))?;
    let repository = repositories
        .iter()
        .find(|r| r.author == author)
        .ok_or_else(|| RecipeWebError::UnknownRepository(author.to_string()))?;
    Ok((repository, format!("{}.md", rest)))
}

/// Fetch and parse the single recipe behind a slug
pub fn load_recipe(
    slug: &str,
    source: &dyn RecipeSource,
    repositories: &[Repository],
    parser: &RecipeParser,
) -> Result<Recipe, RecipeWebError> {
    let (repository, path) = locate(slug, repositories)?;
    let content = source.fetch(repository, &path).map_err(|e| match e {
        RecipeWebError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            RecipeWebError::RecipeNotFound(slug.to_string())
        }
        other => other,
    })?;
    Ok(parser.parse(&path, &content, repository))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_recipe_path() {
        assert!(is_recipe_path("cake.md"));
        assert!(is_recipe_path("desserts/cake.md"));
        assert!(!is_recipe_path("README.md"));
        assert!(!is_recipe_path("desserts/README.md"));
        assert!(!is_recipe_path("images/cake.jpg"));
        assert!(!is_recipe_path("notes.markdown"));
    }

    #[test]
    fn test_locate() {
        let repos = vec![
            Repository::new("alice", "recipes", "main"),
            Repository::new("bob", "kitchen", "master"),
        ];
        let (repo, path) = locate("bob/soups/leek", &repos).unwrap();
        assert_eq!(repo.repository, "kitchen");
        assert_eq!(path, "soups/leek.md");
    }

    #[test]
    fn test_locate_errors() {
        let repos = vec![Repository::new("alice", "recipes", "main")];
        assert!(matches!(
            locate("carol/x", &repos),
            Err(RecipeWebError::UnknownRepository(_))
        ));
        assert!(matches!(
            locate("alice", &repos),
            Err(RecipeWebError::RecipeNotFound(_))
        ));
    }
}
