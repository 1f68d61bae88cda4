//! Rewrites leading ingredient quantities for a multiplier.
//!
//! Walks the list items of the ingredients markdown. An item whose first text
//! run starts with a quantity (optionally wrapped in emphasis, as RecipeMD
//! writes `- *250 g* flour`) gets that quantity replaced by its scaled form;
//! everything else, code blocks included, is copied through untouched.

use lazy_static::lazy_static;
use num_rational::Rational64;
use num_traits::One;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;

use crate::quantity::Quantity;

lazy_static! {
    static ref LEADING_AMOUNT: Regex =
        Regex::new(r"^\d+(?:[.,]\d+)?(?:/\d+)?(?:\s*-\s*\d+(?:[.,]\d+)?(?:/\d+)?)?").unwrap();
}

/// Scale the leading quantity of every ingredient list item
pub fn scale_ingredients(markdown: &str, multiplier: Rational64) -> String {
    if multiplier.is_one() {
        return markdown.to_string();
    }
    let mut scaled = String::with_capacity(markdown.len());
    let mut copied = 0;
    for range in leading_amounts(markdown) {
        let Some(quantity) = Quantity::parse(&markdown[range.clone()])
            .and_then(|quantity| quantity.scale(multiplier))
        else {
            continue;
        };
        scaled.push_str(&markdown[copied..range.start]);
        scaled.push_str(&quantity.to_string());
        copied = range.end;
    }
    scaled.push_str(&markdown[copied..]);
    scaled
}

/// Byte ranges of the quantities opening each list item's first text run
fn leading_amounts(markdown: &str) -> Vec<Range<usize>> {
    let mut amounts = Vec::new();
    let mut awaiting_text = false;
    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::Item) => awaiting_text = true,
            Event::Text(_) if awaiting_text => {
                awaiting_text = false;
                if let Some(found) = LEADING_AMOUNT.find(&markdown[range.clone()]) {
                    amounts.push(range.start + found.start()..range.start + found.end());
                }
            }
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. })
            | Event::Code(_)
            | Event::Html(_)
            | Event::InlineHtml(_) => awaiting_text = false,
            _ => {}
        }
    }
    amounts
}

/// Plain text of every ingredient list item, markup removed.
///
/// Nested items are listed after their parent. Used to build shopping lists
/// from (optionally scaled) ingredients.
pub fn ingredient_items(markdown: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    for event in Parser::new(markdown) {
        let current = open.last().copied();
        match event {
            Event::Start(Tag::Item) => {
                open.push(items.len());
                items.push(String::new());
            }
            Event::End(TagEnd::Item) => {
                open.pop();
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(index) = current {
                    items[index].push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(index) = current {
                    items[index].push(' ');
                }
            }
            _ => {}
        }
    }
    items
        .into_iter()
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Shopping list for a recipe's ingredients at the given multiplier
pub fn shopping_list(ingredients: &str, multiplier: Rational64) -> Vec<String> {
    if multiplier.is_one() {
        return ingredient_items(ingredients);
    }
    ingredient_items(&scale_ingredients(ingredients, multiplier))
}
