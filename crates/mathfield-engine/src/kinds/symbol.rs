//! Leaf nodes: letters, digits, operators and named symbols.

use mathfield_config::DEFAULT_OPERATOR_NAMES;
use mathfield_parser::{letters, opt_whitespace, string};

use super::Item;
use crate::latex::{Entry, Registry, Template};

/// How a symbol behaves when typing and rendering around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    /// A single italic letter; runs of these form auto-command words.
    Variable,
    Digit,
    /// Spaced operator; a typed `/` stops collecting its numerator here.
    BinaryOperator,
    /// Upright function name such as `\sin`.
    OperatorName,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// LaTeX spelling, e.g. `x`, `\alpha`, `\{`.
    pub ctrl_seq: String,
    /// Display form, unescaped.
    pub html: String,
    /// Plain-text form.
    pub text: String,
    pub class: SymbolClass,
}

impl Symbol {
    pub fn new(ctrl_seq: &str, html: &str, text: &str, class: SymbolClass) -> Self {
        Self {
            ctrl_seq: ctrl_seq.to_string(),
            html: html.to_string(),
            text: text.to_string(),
            class,
        }
    }

    pub fn variable(ch: char) -> Self {
        let s = ch.to_string();
        Self::new(&s, &s, &s, SymbolClass::Variable)
    }

    pub fn digit(ch: char) -> Self {
        let s = ch.to_string();
        Self::new(&s, &s, &s, SymbolClass::Digit)
    }

    pub fn binary(ctrl_seq: &str, html: &str, text: &str) -> Self {
        Self::new(ctrl_seq, html, text, SymbolClass::BinaryOperator)
    }

    pub fn plain(ctrl_seq: &str, html: &str, text: &str) -> Self {
        Self::new(ctrl_seq, html, text, SymbolClass::Plain)
    }

    /// `\name` when LaTeX knows the operator, `\operatorname{name}` otherwise.
    pub fn operator_name(name: &str) -> Self {
        let ctrl_seq = if DEFAULT_OPERATOR_NAMES.contains(&name) {
            format!("\\{name}")
        } else {
            format!("\\operatorname{{{name}}}")
        };
        Self::new(&ctrl_seq, name, name, SymbolClass::OperatorName)
    }

    /// Any other typed character, escaped where LaTeX needs it.
    pub fn from_char(ch: char) -> Self {
        let s = ch.to_string();
        match ESCAPED.iter().find(|(c, _)| *c == ch) {
            Some((_, ctrl_seq)) => Self::plain(ctrl_seq, &s, &s),
            None => Self::plain(&s, &s, &s),
        }
    }

    pub fn is_variable(&self) -> bool {
        self.class == SymbolClass::Variable
    }

    /// The letter of a variable symbol.
    pub fn letter(&self) -> Option<char> {
        if !self.is_variable() {
            return None;
        }
        let mut chars = self.ctrl_seq.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// Characters that need a backslash in LaTeX.
const ESCAPED: &[(char, &str)] = &[
    ('\\', "\\backslash"),
    ('{', "\\{"),
    ('}', "\\}"),
    ('%', "\\%"),
    ('$', "\\$"),
    ('#', "\\#"),
    ('&', "\\&"),
    ('_', "\\_"),
    ('~', "\\sim"),
];

const GREEK: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ϵ"),
    ("varepsilon", "ε"),
    ("zeta", "ζ"),
    ("eta", "η"),
    ("theta", "θ"),
    ("vartheta", "ϑ"),
    ("iota", "ι"),
    ("kappa", "κ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("pi", "π"),
    ("varpi", "ϖ"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("upsilon", "υ"),
    ("phi", "ϕ"),
    ("varphi", "φ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
    ("Gamma", "Γ"),
    ("Delta", "Δ"),
    ("Theta", "Θ"),
    ("Lambda", "Λ"),
    ("Xi", "Ξ"),
    ("Pi", "Π"),
    ("Sigma", "Σ"),
    ("Upsilon", "Υ"),
    ("Phi", "Φ"),
    ("Psi", "Ψ"),
    ("Omega", "Ω"),
];

/// (name, display, text)
const BINARY_OPERATORS: &[(&str, &str, &str)] = &[
    ("pm", "±", "+-"),
    ("mp", "∓", "-+"),
    ("times", "×", "*"),
    ("div", "÷", "/"),
    ("cdot", "·", "*"),
    ("ast", "∗", "*"),
    ("le", "≤", "<="),
    ("leq", "≤", "<="),
    ("ge", "≥", ">="),
    ("geq", "≥", ">="),
    ("ne", "≠", "!="),
    ("neq", "≠", "!="),
    ("approx", "≈", "~="),
    ("equiv", "≡", "=="),
    ("sim", "∼", "~"),
    ("to", "→", "->"),
    ("rightarrow", "→", "->"),
    ("leftarrow", "←", "<-"),
    ("in", "∈", " in "),
    ("notin", "∉", " notin "),
    ("subset", "⊂", " subset "),
    ("cup", "∪", " cup "),
    ("cap", "∩", " cap "),
];

const PLAIN_COMMANDS: &[(&str, &str, &str)] = &[
    ("infty", "∞", "infinity"),
    ("partial", "∂", "d"),
    ("nabla", "∇", "nabla"),
    ("cdots", "⋯", "..."),
    ("ldots", "…", "..."),
    ("sum", "∑", "sum"),
    ("prod", "∏", "prod"),
    ("int", "∫", "int"),
    ("forall", "∀", "forall"),
    ("exists", "∃", "exists"),
    ("emptyset", "∅", "{}"),
    ("langle", "⟨", "<"),
    ("rangle", "⟩", ">"),
    ("backslash", "\\", "\\"),
];

/// Non-letter commands: `\ ` and the escaped specials.
const PUNCTUATION_COMMANDS: &[(&str, &str)] = &[
    (" ", " "),
    (",", " "),
    ("{", "{"),
    ("}", "}"),
    ("%", "%"),
    ("$", "$"),
    ("#", "#"),
    ("&", "&"),
    ("_", "_"),
];

/// (char, spelling, display, text); typed and parsed alike.
const CHAR_OPERATORS: &[(char, &str, &str, &str)] = &[
    ('+', "+", "+", "+"),
    ('-', "-", "−", "-"),
    ('=', "=", "=", "="),
    ('<', "<", "<", "<"),
    ('>', ">", ">", ">"),
    ('*', "\\cdot", "·", "*"),
];

pub(crate) fn register(registry: &mut Registry) {
    for (name, html) in GREEK {
        let symbol = Symbol::plain(&format!("\\{name}"), html, html);
        registry.register_command(name, Entry::fixed(Item::symbol(symbol)));
    }
    for (name, html, text) in BINARY_OPERATORS {
        let symbol = Symbol::binary(&format!("\\{name}"), html, text);
        registry.register_command(name, Entry::fixed(Item::symbol(symbol)));
    }
    for (name, html, text) in PLAIN_COMMANDS {
        let symbol = Symbol::plain(&format!("\\{name}"), html, text);
        registry.register_command(name, Entry::fixed(Item::symbol(symbol)));
    }
    for (name, html) in PUNCTUATION_COMMANDS {
        let symbol = Symbol::plain(&format!("\\{name}"), html, html);
        registry.register_command(name, Entry::fixed(Item::symbol(symbol)));
    }
    for (ch, ctrl_seq, html, text) in CHAR_OPERATORS {
        let symbol = Symbol::binary(ctrl_seq, html, text);
        registry.register_char(*ch, Entry::fixed(Item::symbol(symbol)));
    }
    registry.register_char(
        ',',
        Entry::typed(Template::Insert(Item::symbol(Symbol::plain(",", ",", ",")))),
    );
    for name in DEFAULT_OPERATOR_NAMES {
        registry.register_command(name, Entry::fixed(Item::symbol(Symbol::operator_name(name))));
    }
    registry.register_command(
        "operatorname",
        Entry::parsed(|_| {
            opt_whitespace()
                .and(string("{"))
                .and(letters())
                .skip(string("}"))
                .map(|name| vec![Item::symbol(Symbol::operator_name(&name))])
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn operator_name_spelling() {
        assert_eq!(Symbol::operator_name("sin").ctrl_seq, "\\sin");
        assert_eq!(
            Symbol::operator_name("arcsinh").ctrl_seq,
            "\\operatorname{arcsinh}"
        );
    }

    #[test]
    fn typed_specials_are_escaped() {
        assert_eq!(Symbol::from_char('%').ctrl_seq, "\\%");
        assert_eq!(Symbol::from_char('\\').ctrl_seq, "\\backslash");
        assert_eq!(Symbol::from_char('!').ctrl_seq, "!");
    }

    #[test]
    fn letter_of_variable() {
        assert_eq!(Symbol::variable('q').letter(), Some('q'));
        assert_eq!(Symbol::digit('4').letter(), None);
    }

    #[test]
    fn star_types_as_cdot() {
        let registry = Registry::standard();
        let entry = registry.char_entry('*').unwrap();
        match &entry.template {
            Some(Template::Insert(item)) => {
                assert_eq!(item.kind.as_symbol().unwrap().ctrl_seq, "\\cdot");
            }
            other => panic!("unexpected template {other:?}"),
        }
    }
}
