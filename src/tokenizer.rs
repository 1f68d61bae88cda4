//! Block-level view of a markdown document.
//!
//! The recipe parser only needs the top-level blocks of a document together
//! with their raw source text, plus the inline children of paragraphs and
//! headings. [`Tokenizer`] is the seam; [`MarkdownTokenizer`] implements it on
//! top of `pulldown-cmark`.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    List,
    Rule,
    BlockQuote,
    CodeBlock,
    Html,
    Table,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Text,
    Emphasis,
    Strong,
    Code,
    Link,
    Image,
    Html,
    Break,
    Other,
}

/// A direct inline child of a paragraph or heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineToken {
    pub kind: InlineKind,
    /// Plain text content, markup removed
    pub text: String,
    /// Source of the content inside the delimiters, markup kept
    pub raw: String,
}

/// A top-level block of a markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToken {
    pub kind: BlockKind,
    /// Heading level (1-6); `None` for every other block
    pub depth: Option<u8>,
    /// Source text of the block, up to the start of the next block
    pub raw: String,
    /// Plain text content, markup removed
    pub text: String,
    /// Source of the inline content (heading text without `#`), markup kept
    pub content: String,
    /// Direct inline children; only filled for paragraphs and headings
    pub inline: Vec<InlineToken>,
}

impl BlockToken {
    pub fn is_heading(&self, depth: u8) -> bool {
        self.kind == BlockKind::Heading && self.depth == Some(depth)
    }

    /// The single inline child, if the block has exactly one
    pub fn sole_inline(&self) -> Option<&InlineToken> {
        match self.inline.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// Converts raw text into an ordered sequence of top-level block tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<BlockToken>;
}

/// CommonMark tokenizer backed by `pulldown-cmark`
#[derive(Debug, Clone)]
pub struct MarkdownTokenizer {
    options: Options,
}

impl Default for MarkdownTokenizer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }
}

impl MarkdownTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

struct PendingBlock {
    start: usize,
    token: BlockToken,
    /// Byte span covered by the block's children
    content: Option<Range<usize>>,
    /// Byte span inside each inline token's delimiters
    inline_spans: Vec<Option<Range<usize>>>,
}

impl PendingBlock {
    fn new(start: usize, kind: BlockKind, depth: Option<u8>) -> Self {
        Self {
            start,
            token: BlockToken {
                kind,
                depth,
                raw: String::new(),
                text: String::new(),
                content: String::new(),
                inline: Vec::new(),
            },
            content: None,
            inline_spans: Vec::new(),
        }
    }

    fn cover(&mut self, range: &Range<usize>, nesting: usize) {
        widen(&mut self.content, range);
        if nesting >= 2 {
            if let Some(span) = self.inline_spans.last_mut() {
                widen(span, range);
            }
        }
    }

    fn collects_inline(&self) -> bool {
        matches!(self.token.kind, BlockKind::Paragraph | BlockKind::Heading)
    }
}

impl Tokenizer for MarkdownTokenizer {
    fn tokenize(&self, text: &str) -> Vec<BlockToken> {
        let mut pending: Vec<PendingBlock> = Vec::new();
        let mut nesting = 0usize;

        for (event, range) in Parser::new_ext(text, self.options).into_offset_iter() {
            match event {
                Event::Start(tag) => {
                    if nesting == 0 {
                        let (kind, depth) = block_kind(&tag);
                        pending.push(PendingBlock::new(range.start, kind, depth));
                    } else if let Some(block) = pending.last_mut() {
                        block.cover(&range, nesting);
                        if nesting == 1 && block.collects_inline() {
                            block.token.inline.push(InlineToken {
                                kind: inline_kind(&tag),
                                text: String::new(),
                                raw: String::new(),
                            });
                            block.inline_spans.push(None);
                        }
                    }
                    nesting += 1;
                }
                Event::End(_) => {
                    nesting = nesting.saturating_sub(1);
                    if nesting >= 1 {
                        if let Some(block) = pending.last_mut() {
                            widen(&mut block.content, &range);
                        }
                    }
                }
                leaf => {
                    if nesting == 0 {
                        let kind = match leaf {
                            Event::Rule => BlockKind::Rule,
                            _ => BlockKind::Other,
                        };
                        pending.push(PendingBlock::new(range.start, kind, None));
                        continue;
                    }
                    let Some(block) = pending.last_mut() else {
                        continue;
                    };
                    block.cover(&range, nesting);
                    let content = leaf_text(&leaf);
                    block.token.text.push_str(content);
                    if !block.collects_inline() {
                        continue;
                    }
                    if nesting == 1 {
                        block.token.inline.push(InlineToken {
                            kind: leaf_kind(&leaf),
                            text: content.to_string(),
                            raw: String::new(),
                        });
                        block.inline_spans.push(Some(range.clone()));
                    } else if let Some(inline) = block.token.inline.last_mut() {
                        inline.text.push_str(content);
                    }
                }
            }
        }

        // Each block owns the source up to where the next one starts, so
        // concatenating raw text reproduces the document between rules.
        let ends: Vec<usize> = pending
            .iter()
            .skip(1)
            .map(|b| b.start)
            .chain(std::iter::once(text.len()))
            .collect();

        pending
            .into_iter()
            .zip(ends)
            .map(|(block, end)| {
                let slice = |span: Option<Range<usize>>| {
                    span.and_then(|span| text.get(span))
                        .unwrap_or_default()
                        .to_string()
                };
                let mut token = block.token;
                token.raw = text.get(block.start..end).unwrap_or_default().to_string();
                token.content = slice(block.content);
                for (inline, span) in token.inline.iter_mut().zip(block.inline_spans) {
                    inline.raw = slice(span);
                }
                token
            })
            .collect()
    }
}

fn widen(span: &mut Option<Range<usize>>, range: &Range<usize>) {
    *span = Some(match span.take() {
        Some(span) => span.start.min(range.start)..span.end.max(range.end),
        None => range.clone(),
    });
}

fn block_kind(tag: &Tag) -> (BlockKind, Option<u8>) {
    match tag {
        Tag::Heading { level, .. } => (BlockKind::Heading, Some(heading_depth(*level))),
        Tag::Paragraph => (BlockKind::Paragraph, None),
        Tag::List(_) => (BlockKind::List, None),
        Tag::BlockQuote(_) => (BlockKind::BlockQuote, None),
        Tag::CodeBlock(_) => (BlockKind::CodeBlock, None),
        Tag::HtmlBlock => (BlockKind::Html, None),
        Tag::Table(_) => (BlockKind::Table, None),
        _ => (BlockKind::Other, None),
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn inline_kind(tag: &Tag) -> InlineKind {
    match tag {
        Tag::Emphasis => InlineKind::Emphasis,
        Tag::Strong => InlineKind::Strong,
        Tag::Link { .. } => InlineKind::Link,
        Tag::Image { .. } => InlineKind::Image,
        _ => InlineKind::Other,
    }
}

fn leaf_kind(event: &Event) -> InlineKind {
    match event {
        Event::Text(_) => InlineKind::Text,
        Event::Code(_) => InlineKind::Code,
        Event::Html(_) | Event::InlineHtml(_) => InlineKind::Html,
        Event::SoftBreak | Event::HardBreak => InlineKind::Break,
        _ => InlineKind::Other,
    }
}

fn leaf_text<'a>(event: &'a Event<'_>) -> &'a str {
    match event {
        Event::Text(text) | Event::Code(text) => &**text,
        Event::SoftBreak | Event::HardBreak => " ",
        _ => "",
    }
}
