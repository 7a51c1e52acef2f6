//! Square roots and roots with an explicit index.

use mathfield_parser::{Parser, opt_whitespace, string};

use super::Item;
use crate::latex::{Entry, Grammar, Registry, Template};

/// `\sqrt{x}` or, with a bracketed index, `\sqrt[n]{x}`.
fn sqrt_parser(g: &Grammar) -> Parser<Vec<Item>> {
    let index = opt_whitespace()
        .and(string("["))
        .and(g.sequence_until(&[']']))
        .skip(opt_whitespace())
        .skip(string("]"))
        .optional();
    let radicand = g.block();
    index.then(move |index| {
        radicand.clone().map(move |r| match &index {
            Some(i) => vec![Item::nth_root(i.clone(), r)],
            None => vec![Item::sqrt(r)],
        })
    })
}

/// `\nthroot{n}{x}`, index first.
fn nthroot_parser(g: &Grammar) -> Parser<Vec<Item>> {
    let radicand = g.block();
    g.block().then(move |index| {
        radicand
            .clone()
            .map(move |r| vec![Item::nth_root(index.clone(), r)])
    })
}

pub(crate) fn register(registry: &mut Registry) {
    registry.register_command(
        "sqrt",
        Entry::parsed(sqrt_parser).with_template(Template::Insert(Item::sqrt(Vec::new()))),
    );
    registry.register_command(
        "nthroot",
        Entry::parsed(nthroot_parser)
            .with_template(Template::Insert(Item::nth_root(Vec::new(), Vec::new()))),
    );
}

pub(crate) fn sqrt_latex(radicand: &str) -> String {
    format!("\\sqrt{{{radicand}}}")
}

/// An index holding `]` is braced so the bracket cannot end it early.
pub(crate) fn nth_root_latex(index: &str, radicand: &str) -> String {
    if index.contains(']') {
        format!("\\sqrt[{{{index}}}]{{{radicand}}}")
    } else {
        format!("\\sqrt[{index}]{{{radicand}}}")
    }
}

pub(crate) fn sqrt_text(radicand: &str) -> String {
    format!("sqrt({radicand})")
}

pub(crate) fn nth_root_text(index: &str, radicand: &str) -> String {
    format!("root({index})({radicand})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_with_closing_bracket_is_braced() {
        assert_eq!(nth_root_latex("3", "x"), "\\sqrt[3]{x}");
        assert_eq!(nth_root_latex("]", "x"), "\\sqrt[{]}]{x}");

        let items = Grammar::default().parse("\\sqrt[{]}]{x}").unwrap();
        let mut tree = Tree::new();
        let root = tree.root();
        let mut fragment = tree.instantiate(&items);
        fragment.adopt(&mut tree, root, None, None);
        assert_eq!(tree.latex(root), "\\sqrt[{]}]{x}");
        assert_eq!(tree.text(root), "root(])(x)");
    }
}
