//! Paired delimiters that grow with their content.
//!
//! A bracket typed without its partner is half-open: the missing side is a
//! *ghost* that renders faintly and serializes as `.` until the matching
//! character is typed.

use std::sync::LazyLock;

use mathfield_parser::{Parser, fail, opt_whitespace, regex, string, succeed};
use regex::Regex;

use super::Item;
use crate::latex::{Entry, Grammar, Registry, Template};
use crate::tree::Dir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracket {
    /// LaTeX spelling of each side, e.g. `(` or `\langle`.
    pub open: String,
    pub close: String,
    /// The side that has not been typed yet, if any.
    pub ghost: Option<Dir>,
}

impl Bracket {
    pub fn new(open: &str, close: &str, ghost: Option<Dir>) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            ghost,
        }
    }

    /// The delimiter on the `dir` side, whether typed yet or not.
    pub fn delimiter(&self, dir: Dir) -> &str {
        match dir {
            Dir::Left => &self.open,
            Dir::Right => &self.close,
        }
    }

    /// LaTeX for the `dir` side; ghosts are spelled `.`.
    pub fn side_latex(&self, dir: Dir) -> &str {
        if self.ghost == Some(dir) {
            return ".";
        }
        self.delimiter(dir)
    }

    pub fn side_text(&self, dir: Dir) -> &'static str {
        let latex = self.delimiter(dir);
        DELIMITERS
            .iter()
            .find(|d| d.latex == latex)
            .map_or("", |d| d.text)
    }
}

struct Delimiter {
    latex: &'static str,
    partner: &'static str,
    text: &'static str,
}

const DELIMITERS: &[Delimiter] = &[
    Delimiter { latex: "(", partner: ")", text: "(" },
    Delimiter { latex: ")", partner: "(", text: ")" },
    Delimiter { latex: "[", partner: "]", text: "[" },
    Delimiter { latex: "]", partner: "[", text: "]" },
    Delimiter { latex: "\\{", partner: "\\}", text: "{" },
    Delimiter { latex: "\\}", partner: "\\{", text: "}" },
    Delimiter { latex: "|", partner: "|", text: "|" },
    Delimiter { latex: "\\langle", partner: "\\rangle", text: "⟨" },
    Delimiter { latex: "\\rangle", partner: "\\langle", text: "⟩" },
];

static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\\langle|\\rangle|\\lbrace|\\rbrace|\\\{|\\\}|[()\[\]|.])")
        .unwrap_or_else(|e| panic!("delimiter pattern: {e}"))
});

fn partner(latex: &str) -> Option<&'static str> {
    DELIMITERS.iter().find(|d| d.latex == latex).map(|d| d.partner)
}

fn delimiter() -> Parser<String> {
    opt_whitespace()
        .and(regex(DELIMITER.clone()))
        .map(|d| match d.as_str() {
            "\\lbrace" => "\\{".to_string(),
            "\\rbrace" => "\\}".to_string(),
            _ => d,
        })
}

/// Build the bracket once both delimiters are known. At most one side may
/// be the invisible `.`.
fn assemble(open: &str, close: &str, body: Vec<Item>) -> Parser<Vec<Item>> {
    let bracket = match (open, close) {
        (".", ".") => return fail("a visible delimiter"),
        (".", close) => partner(close).map(|open| Bracket::new(open, close, Some(Dir::Left))),
        (open, ".") => partner(open).map(|close| Bracket::new(open, close, Some(Dir::Right))),
        (open, close) => Some(Bracket::new(open, close, None)),
    };
    match bracket {
        Some(bracket) => succeed(vec![Item::bracket(bracket, body)]),
        None => fail("a delimiter"),
    }
}

/// `\left<delim> ... \right<delim>`
fn parser(g: &Grammar) -> Parser<Vec<Item>> {
    let body = g.sequence_until(&[]).skip(opt_whitespace());
    let close = string("\\right").and(delimiter());
    delimiter().then(move |open| {
        let close = close.clone();
        body.clone().then(move |items| {
            let open = open.clone();
            close
                .clone()
                .then(move |close| assemble(&open, &close, items.clone()))
        })
    })
}

/// Characters that open and close brackets when typed, with their LaTeX.
const TYPED: &[(char, char, &str, &str)] = &[
    ('(', ')', "(", ")"),
    ('[', ']', "[", "]"),
    ('{', '}', "\\{", "\\}"),
];

pub(crate) fn register(registry: &mut Registry) {
    registry.register_command("left", Entry::parsed(parser));
    for (open_char, close_char, open, close) in TYPED {
        let open = open.to_string();
        let close = close.to_string();
        registry.register_char(
            *open_char,
            Entry::typed(Template::OpenBracket {
                open: open.clone(),
                close: close.clone(),
            }),
        );
        registry.register_char(*close_char, Entry::typed(Template::CloseBracket { open, close }));
    }
    registry.register_char(
        '|',
        Entry::typed(Template::OpenBracket {
            open: "|".to_string(),
            close: "|".to_string(),
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ghost_sides_spell_as_dot() {
        let b = Bracket::new("(", ")", Some(Dir::Right));
        assert_eq!(b.side_latex(Dir::Left), "(");
        assert_eq!(b.side_latex(Dir::Right), ".");
        assert_eq!(b.side_text(Dir::Right), ")");
    }

    #[test]
    fn delimiter_normalizes_brace_names() {
        assert_eq!(delimiter().parse(" \\lbrace").unwrap(), "\\{");
        assert_eq!(delimiter().parse("\\langle").unwrap(), "\\langle");
        assert!(delimiter().parse("x").is_err());
    }

    #[test]
    fn both_sides_invisible_is_rejected() {
        assert!(assemble(".", ".", Vec::new()).parse("").is_err());
        let items = assemble(".", "]", Vec::new()).parse("").unwrap();
        assert_eq!(
            items,
            vec![Item::bracket(Bracket::new("[", "]", Some(Dir::Left)), Vec::new())]
        );
    }
}
