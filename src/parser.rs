//! RecipeMD document parser.
//!
//! A document is split by horizontal rules into three sections:
//!
//! ```text
//! # Title                <- preamble: title, *tags*, **yields**, description
//! *tag, tag*
//! **4 servings**
//! ---
//! - *250 g* flour        <- ingredients
//! ---
//! Mix and bake.          <- instructions (further rules are dropped)
//! ```
//!
//! Parsing is total: any input produces a [`Recipe`], with missing parts left empty.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use url::Url;

use crate::language::{LanguageDetector, WhatlangDetector};
use crate::model::{Recipe, RecipeMeta, Repository, DEFAULT_RAW_CONTENT_HOST};
use crate::tokenizer::{BlockKind, BlockToken, InlineKind, MarkdownTokenizer, Tokenizer};

lazy_static! {
    static ref FIRST_IMAGE: Regex =
        Regex::new(r#"!\[.*?\]\((.+?)\)|<img.+?src="(.+?)""#).unwrap();
    static ref TAG_SEPARATOR: Regex = Regex::new(r",\s*").unwrap();
}

/// Which part of the document tokens currently belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Preamble,
    Ingredients,
    /// Terminal: further rules do not open new sections
    Instructions,
}

impl Section {
    /// The section after a horizontal rule
    pub fn next(self) -> Self {
        match self {
            Section::Preamble => Section::Ingredients,
            Section::Ingredients | Section::Instructions => Section::Instructions,
        }
    }
}

/// Fields gathered while folding over the token stream
#[derive(Debug, Default)]
struct Accumulator {
    section: Section,
    title: Option<String>,
    tags: Vec<String>,
    yields: String,
    description: String,
    ingredients: String,
    instructions: String,
}

impl Accumulator {
    fn accept(mut self, token: BlockToken) -> Self {
        if token.kind == BlockKind::Rule {
            self.section = self.section.next();
            return self;
        }
        match self.section {
            Section::Preamble => self.accept_preamble(token),
            Section::Ingredients => self.ingredients.push_str(&token.raw),
            Section::Instructions => self.instructions.push_str(&token.raw),
        }
        self
    }

    fn accept_preamble(&mut self, token: BlockToken) {
        if token.is_heading(1) {
            // First title wins, later level-one headings are dropped
            if self.title.is_none() {
                self.title = Some(token.content);
            }
            return;
        }
        if token.kind == BlockKind::Paragraph {
            match token.sole_inline() {
                Some(inline) if inline.kind == InlineKind::Emphasis => {
                    self.tags = split_tags(&inline.raw);
                    return;
                }
                Some(inline) if inline.kind == InlineKind::Strong => {
                    self.yields = inline.raw.clone();
                    return;
                }
                _ => {}
            }
        }
        self.description.push_str(&token.raw);
    }
}

/// Split an emphasized tag line on commas
pub fn split_tags(text: &str) -> Vec<String> {
    TAG_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Turns RecipeMD documents into [`Recipe`] values.
///
/// The tokenizer and language detector are injected so tests can substitute
/// deterministic fakes.
pub struct RecipeParser {
    tokenizer: Box<dyn Tokenizer>,
    detector: Box<dyn LanguageDetector>,
    raw_content_host: String,
}

impl Default for RecipeParser {
    fn default() -> Self {
        Self::new(
            Box::new(MarkdownTokenizer::new()),
            Box::new(WhatlangDetector::new()),
        )
    }
}

impl RecipeParser {
    pub fn new(tokenizer: Box<dyn Tokenizer>, detector: Box<dyn LanguageDetector>) -> Self {
        Self {
            tokenizer,
            detector,
            raw_content_host: DEFAULT_RAW_CONTENT_HOST.to_string(),
        }
    }

    /// Resolve relative images against a different raw content host
    pub fn with_raw_content_host(mut self, host: impl Into<String>) -> Self {
        self.raw_content_host = host.into();
        self
    }

    pub fn parse(&self, path: &str, content: &str, repository: &Repository) -> Recipe {
        let meta = RecipeMeta::new(path, repository);
        let fields = self
            .tokenizer
            .tokenize(content)
            .into_iter()
            .fold(Accumulator::default(), Accumulator::accept);

        let root = repository.raw_root(&self.raw_content_host);
        let image_path = first_image(content)
            .and_then(|target| resolve_url(&root, &target))
            .unwrap_or_default();

        debug!(
            "Parsed {}: {} tags, {} description bytes, {} ingredient bytes, {} instruction bytes",
            meta.slug,
            fields.tags.len(),
            fields.description.len(),
            fields.ingredients.len(),
            fields.instructions.len()
        );

        Recipe {
            meta,
            title: fields.title.unwrap_or_default(),
            image_path,
            description: fields.description,
            tags: fields.tags,
            yields: fields.yields,
            ingredients: fields.ingredients,
            instructions: fields.instructions,
            detected_language: self.detector.best(content),
            score: 0.0,
        }
    }
}

/// Target of the first markdown image or HTML `<img>` anywhere in the text
pub fn first_image(content: &str) -> Option<String> {
    let captures = FIRST_IMAGE.captures(content)?;
    if let Some(markdown) = captures.get(1) {
        return Some(markdown_target(markdown.as_str()).to_string());
    }
    captures.get(2).map(|html| html.as_str().to_string())
}

/// Link destination of `![alt](...)`: `<...>` brackets or an optional title removed
fn markdown_target(inner: &str) -> &str {
    let inner = inner.trim();
    if let Some(bracketed) = inner.strip_prefix('<') {
        if let Some((target, _)) = bracketed.split_once('>') {
            return target;
        }
    }
    inner.split_whitespace().next().unwrap_or(inner)
}

/// Resolve a link target against a base URL ending in `/`; `None` when either is unusable
pub fn resolve_url(base: &str, target: &str) -> Option<String> {
    match Url::parse(base).and_then(|base| base.join(target)) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Cannot resolve image '{}' against {}: {}", target, base, e);
            None
        }
    }
}
