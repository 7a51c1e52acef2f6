//! Subscripts and superscripts attached to whatever precedes them.

use mathfield_parser::{Parser, opt_whitespace, string};

use super::Item;
use crate::latex::{Entry, Grammar, Registry, Template};

/// `^x`, optionally followed by `_y` (and the mirror image for `_`), so
/// `x_1^2` becomes one node with both parts.
fn parser(g: &Grammar, first: char) -> Parser<Vec<Item>> {
    let second = if first == '^' { "_" } else { "^" };
    let tail = opt_whitespace().and(string(second)).and(g.block()).optional();
    g.block().then(move |head| {
        tail.clone().map(move |tail| {
            let item = if first == '^' {
                Item::supsub(tail, Some(head.clone()))
            } else {
                Item::supsub(Some(head.clone()), tail)
            };
            vec![item]
        })
    })
}

pub(crate) fn register(registry: &mut Registry) {
    registry.register_char(
        '^',
        Entry::parsed(|g| parser(g, '^'))
            .with_template(Template::Insert(Item::supsub(None, Some(Vec::new())))),
    );
    registry.register_char(
        '_',
        Entry::parsed(|g| parser(g, '_'))
            .with_template(Template::Insert(Item::supsub(Some(Vec::new()), None))),
    );
}

/// Braces are dropped around a single character.
pub(crate) fn latex_part(marker: char, content: &str) -> String {
    if content.chars().count() == 1 {
        format!("{marker}{content}")
    } else {
        format!("{marker}{{{content}}}")
    }
}

pub(crate) fn text_part(marker: char, content: &str) -> String {
    if content.chars().count() == 1 {
        format!("{marker}{content}")
    } else {
        format!("{marker}({content})")
    }
}
