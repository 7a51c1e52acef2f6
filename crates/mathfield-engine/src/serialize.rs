//! LaTeX, plain-text and HTML output for any subtree.

use html_escape::encode_text;

use crate::kinds::{BlockRole, NodeKind, SymbolClass, fraction, root, style, supsub};
use crate::tree::{Dir, NodeId, Tree};

/// Append `next`, separating a trailing word command such as `\alpha` from a
/// following letter so the two do not read back as one name.
pub(crate) fn push_latex(out: &mut String, next: &str) {
    if ends_with_word_command(out) && next.starts_with(|c: char| c.is_ascii_alphabetic()) {
        out.push(' ');
    }
    out.push_str(next);
}

fn ends_with_word_command(latex: &str) -> bool {
    let stem = latex.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    stem.len() < latex.len() && stem.ends_with('\\')
}

fn role_class(role: BlockRole) -> &'static str {
    match role {
        BlockRole::Root => "mf-root-block",
        BlockRole::Numerator => "mf-numerator",
        BlockRole::Denominator => "mf-denominator",
        BlockRole::Radicand => "mf-radicand",
        BlockRole::Index => "mf-index",
        BlockRole::Sub => "mf-sub",
        BlockRole::Sup => "mf-sup",
        BlockRole::Body => "mf-body",
    }
}

fn symbol_class(class: SymbolClass) -> &'static str {
    match class {
        SymbolClass::Variable => "mf-variable",
        SymbolClass::Digit => "mf-digit",
        SymbolClass::BinaryOperator => "mf-binary-operator",
        SymbolClass::OperatorName => "mf-operator-name",
        SymbolClass::Plain => "mf-symbol",
    }
}

impl Tree {
    fn block_of<F>(&self, command: NodeId, role: BlockRole, render: F) -> String
    where
        F: Fn(&Self, NodeId) -> String,
    {
        self.block_with_role(command, role)
            .map(|b| render(self, b))
            .unwrap_or_default()
    }

    /// LaTeX for `id` and everything below it.
    pub fn latex(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Block(_) => {
                let mut out = String::new();
                for child in self.child_ids(id) {
                    push_latex(&mut out, &self.latex(child));
                }
                out
            }
            NodeKind::Symbol(s) => s.ctrl_seq.clone(),
            NodeKind::Fraction => fraction::latex(
                &self.block_of(id, BlockRole::Numerator, Self::latex),
                &self.block_of(id, BlockRole::Denominator, Self::latex),
            ),
            NodeKind::SquareRoot => {
                root::sqrt_latex(&self.block_of(id, BlockRole::Radicand, Self::latex))
            }
            NodeKind::NthRoot => root::nth_root_latex(
                &self.block_of(id, BlockRole::Index, Self::latex),
                &self.block_of(id, BlockRole::Radicand, Self::latex),
            ),
            NodeKind::SupSub => self
                .child_ids(id)
                .map(|b| {
                    let marker = if self.role(b) == Some(BlockRole::Sup) { '^' } else { '_' };
                    supsub::latex_part(marker, &self.latex(b))
                })
                .collect(),
            NodeKind::Bracket(b) => {
                let mut out = format!("\\left{}", b.side_latex(Dir::Left));
                push_latex(&mut out, &self.block_of(id, BlockRole::Body, Self::latex));
                push_latex(&mut out, &format!("\\right{}", b.side_latex(Dir::Right)));
                out
            }
            NodeKind::Style(s) => style::latex(s, &self.block_of(id, BlockRole::Body, Self::latex)),
        }
    }

    /// A plain-text approximation, e.g. `(1)/(x)` for a fraction.
    pub fn text(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Block(_) => {
                let mut out = String::new();
                let mut after_operator_name = false;
                for child in self.child_ids(id) {
                    let text = self.text(child);
                    if after_operator_name && text.starts_with(char::is_alphanumeric) {
                        out.push(' ');
                    }
                    after_operator_name = matches!(
                        self.kind(child),
                        NodeKind::Symbol(s) if s.class == SymbolClass::OperatorName
                    );
                    out.push_str(&text);
                }
                out
            }
            NodeKind::Symbol(s) => s.text.clone(),
            NodeKind::Fraction => fraction::text(
                &self.block_of(id, BlockRole::Numerator, Self::text),
                &self.block_of(id, BlockRole::Denominator, Self::text),
            ),
            NodeKind::SquareRoot => {
                root::sqrt_text(&self.block_of(id, BlockRole::Radicand, Self::text))
            }
            NodeKind::NthRoot => root::nth_root_text(
                &self.block_of(id, BlockRole::Index, Self::text),
                &self.block_of(id, BlockRole::Radicand, Self::text),
            ),
            NodeKind::SupSub => self
                .child_ids(id)
                .map(|b| {
                    let marker = if self.role(b) == Some(BlockRole::Sup) { '^' } else { '_' };
                    supsub::text_part(marker, &self.text(b))
                })
                .collect(),
            NodeKind::Bracket(b) => format!(
                "{}{}{}",
                b.side_text(Dir::Left),
                self.block_of(id, BlockRole::Body, Self::text),
                b.side_text(Dir::Right)
            ),
            NodeKind::Style(_) => self.block_of(id, BlockRole::Body, Self::text),
        }
    }

    /// Markup for a rendering layer. Every element carries `data-node-id`
    /// so positions can be mapped back to nodes.
    pub fn html(&self, id: NodeId) -> String {
        let n = id.index();
        let children = || self.child_ids(id).map(|c| self.html(c)).collect::<String>();
        match self.kind(id) {
            NodeKind::Block(role) => {
                let empty = if self.end(id, Dir::Left).is_none() { " mf-empty" } else { "" };
                format!(
                    r#"<span class="{}{empty}" data-node-id="{n}">{}</span>"#,
                    role_class(*role),
                    children()
                )
            }
            NodeKind::Symbol(s) if s.class == SymbolClass::Variable => {
                format!(r#"<var data-node-id="{n}">{}</var>"#, encode_text(&s.html))
            }
            NodeKind::Symbol(s) => format!(
                r#"<span class="{}" data-node-id="{n}">{}</span>"#,
                symbol_class(s.class),
                encode_text(&s.html)
            ),
            NodeKind::SquareRoot => format!(
                r#"<span class="mf-sqrt" data-node-id="{n}"><span class="mf-sqrt-prefix">√</span>{}</span>"#,
                children()
            ),
            NodeKind::NthRoot => format!(
                r#"<span class="mf-nthroot" data-node-id="{n}">{}<span class="mf-sqrt-prefix">√</span>{}</span>"#,
                self.block_of(id, BlockRole::Index, Self::html),
                self.block_of(id, BlockRole::Radicand, Self::html)
            ),
            NodeKind::Bracket(b) => {
                let paren = |dir: Dir| {
                    let ghost = if b.ghost == Some(dir) { " mf-ghost" } else { "" };
                    format!(
                        r#"<span class="mf-paren{ghost}">{}</span>"#,
                        encode_text(b.side_text(dir))
                    )
                };
                format!(
                    r#"<span class="mf-bracket" data-node-id="{n}">{}{}{}</span>"#,
                    paren(Dir::Left),
                    children(),
                    paren(Dir::Right)
                )
            }
            NodeKind::Style(s) => format!(
                r#"<span class="mf-style {}" data-node-id="{n}">{}</span>"#,
                s.class,
                children()
            ),
            kind @ (NodeKind::Fraction | NodeKind::SupSub) => format!(
                r#"<span class="mf-{}" data-node-id="{n}">{}</span>"#,
                kind.name(),
                children()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::Grammar;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tree_of(latex: &str) -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        let items = Grammar::default().parse(latex).unwrap();
        let mut frag = tree.instantiate(&items);
        frag.adopt(&mut tree, root, None, None);
        tree
    }

    #[rstest]
    #[case("\\frac{1}{2}", "\\frac{1}{2}")]
    #[case("\\frac12", "\\frac{1}{2}")]
    #[case("\\dfrac{a}{b}", "\\frac{a}{b}")]
    #[case("x^{2}", "x^2")]
    #[case("x^{10}_i", "x_i^{10}")]
    #[case("\\sqrt[3]{x}", "\\sqrt[3]{x}")]
    #[case("\\alpha x", "\\alpha x")]
    #[case("\\alpha\\beta", "\\alpha\\beta")]
    #[case("\\left\\langle x\\right\\rangle", "\\left\\langle x\\right\\rangle")]
    #[case("\\left(x\\right.", "\\left(x\\right.")]
    #[case("\\mathbf{v}", "\\mathbf{v}")]
    #[case("a*b", "a\\cdot b")]
    #[case("\\operatorname{arcsec}x", "\\operatorname{arcsec}x")]
    fn normalized_latex(#[case] input: &str, #[case] expected: &str) {
        let tree = tree_of(input);
        assert_eq!(tree.latex(tree.root()), expected);
    }

    #[rstest]
    #[case("\\frac{1}{x+1}", "(1)/(x+1)")]
    #[case("\\sqrt{2}", "sqrt(2)")]
    #[case("\\sqrt[3]{8}", "root(3)(8)")]
    #[case("x^{n+1}", "x^(n+1)")]
    #[case("\\alpha^2", "α^2")]
    #[case("\\sin x", "sin x")]
    #[case("\\left[a\\right]", "[a]")]
    fn plain_text(#[case] input: &str, #[case] expected: &str) {
        let tree = tree_of(input);
        assert_eq!(tree.text(tree.root()), expected);
    }

    #[test]
    fn html_escapes_and_tags_nodes() {
        let tree = tree_of("a<b");
        let html = tree.html(tree.root());
        assert!(html.starts_with(r#"<span class="mf-root-block" data-node-id="0">"#), "{html}");
        assert!(html.contains("&lt;"), "{html}");
        assert!(!html.contains("<b"), "{html}");
    }

    #[test]
    fn html_marks_empty_blocks_and_ghosts() {
        let tree = tree_of("\\frac{}{x}\\left(\\right.");
        let html = tree.html(tree.root());
        assert!(html.contains(r#"class="mf-numerator mf-empty""#), "{html}");
        assert!(html.contains(r#"class="mf-paren mf-ghost""#), "{html}");
    }

    #[test]
    fn word_command_detection() {
        assert!(ends_with_word_command("x\\alpha"));
        assert!(!ends_with_word_command("\\{"));
        assert!(!ends_with_word_command("ab"));
        assert!(!ends_with_word_command("\\frac{a}{b}"));
    }
}
