use std::collections::BTreeSet;

/// Marks recipes as favorites; how the set is persisted is up to the implementor
pub trait Favorites {
    fn is_favorite(&self, slug: &str) -> bool;

    /// Add the slug if absent, remove it otherwise
    fn toggle(&mut self, slug: &str);
}

/// Favorites held in memory for the lifetime of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryFavorites {
    slugs: BTreeSet<String>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InMemoryFavorites {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            slugs: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Favorites for InMemoryFavorites {
    fn is_favorite(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    fn toggle(&mut self, slug: &str) {
        if !self.slugs.remove(slug) {
            self.slugs.insert(slug.to_string());
        }
    }
}
