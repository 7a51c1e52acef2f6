use std::rc::Rc;

use mathfield_parser::{
    ParseError, Parser, any_char, digit, fail, letter, letters, opt_whitespace, satisfy, string,
};

use super::Registry;
use crate::kinds::{Item, Symbol};

/// The LaTeX grammar, assembled from the registry at parse time.
///
/// Cloning is cheap; every clone shares the same registry.
#[derive(Clone)]
pub struct Grammar {
    registry: Rc<Registry>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}

impl Grammar {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Rc::new(registry),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse a whole LaTeX math string into detached items.
    pub fn parse(&self, latex: &str) -> Result<Vec<Item>, ParseError> {
        self.latex_math().parse(latex)
    }

    /// A sequence of items with surrounding whitespace allowed.
    pub fn latex_math(&self) -> Parser<Vec<Item>> {
        self.sequence_until(&[]).skip(opt_whitespace())
    }

    /// Items up to the first closing brace or one of `stops`, which are not
    /// consumed. `{...}` groups inside are flattened into the sequence.
    pub fn sequence_until(&self, stops: &'static [char]) -> Parser<Vec<Item>> {
        let g = self.clone();
        Parser::lazy(move || {
            g.item(stops)
                .many()
                .map(|groups| groups.into_iter().flatten().collect())
        })
    }

    /// A command argument: a braced group or a single item.
    pub fn block(&self) -> Parser<Vec<Item>> {
        opt_whitespace().and(self.group().or(self.single(&[])))
    }

    fn item(&self, stops: &'static [char]) -> Parser<Vec<Item>> {
        opt_whitespace().and(self.group().or(self.single(stops)))
    }

    fn group(&self) -> Parser<Vec<Item>> {
        string("{")
            .and(self.sequence_until(&[]))
            .skip(opt_whitespace())
            .skip(string("}"))
    }

    fn single(&self, stops: &'static [char]) -> Parser<Vec<Item>> {
        self.command()
            .or(letter().map(|c| vec![Item::symbol(Symbol::variable(c))]))
            .or(digit().map(|c| vec![Item::symbol(Symbol::digit(c))]))
            .or(self.character(stops))
    }

    /// `\name` or `\<char>`, handed to the registered parser for `name`.
    fn command(&self) -> Parser<Vec<Item>> {
        let g = self.clone();
        string("\\")
            .and(letters().or(any_char().map(String::from)))
            .then(move |name| match g.registry.command(&name) {
                Some(entry) => match &entry.parser {
                    Some(factory) => factory(&g),
                    None => fail(&format!("a command that can be parsed, not \\{name}")),
                },
                None => fail(&format!("a known command, not \\{name}")),
            })
    }

    /// Any other character: its registered parser, or a plain symbol.
    fn character(&self, stops: &'static [char]) -> Parser<Vec<Item>> {
        let g = self.clone();
        satisfy("a symbol", move |c| {
            !matches!(c, '{' | '}' | '\\') && !c.is_whitespace() && !stops.contains(&c)
        })
        .then(move |c| match g.registry.char_entry(c).and_then(|e| e.parser.clone()) {
            Some(factory) => factory(&g),
            None => mathfield_parser::succeed(vec![Item::symbol(Symbol::from_char(c))]),
        })
    }
}
