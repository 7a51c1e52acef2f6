use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use mathfield_parser::Parser;

use super::Grammar;
use crate::kinds::{self, Item};

/// Builds the parser for whatever follows a command's spelling.
pub type ParserFactory = Rc<dyn Fn(&Grammar) -> Parser<Vec<Item>>>;

/// What typing a command's name or character inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Insert(Item),
    /// Opens a bracket that swallows everything to its right.
    OpenBracket { open: String, close: String },
    /// Closes the enclosing half-open bracket, or wraps everything to its
    /// left in a new one.
    CloseBracket { open: String, close: String },
}

/// One command or character the editor understands.
#[derive(Clone, Default)]
pub struct Entry {
    pub parser: Option<ParserFactory>,
    pub template: Option<Template>,
}

impl Entry {
    /// An entry whose LaTeX arguments are read by `factory`.
    pub fn parsed(factory: impl Fn(&Grammar) -> Parser<Vec<Item>> + 'static) -> Self {
        Self {
            parser: Some(Rc::new(factory)),
            template: None,
        }
    }

    /// A fixed item with no arguments, both parsed and typed.
    pub fn fixed(item: Item) -> Self {
        let parsed = item.clone();
        Self::parsed(move |_| mathfield_parser::succeed(vec![parsed.clone()]))
            .with_template(Template::Insert(item))
    }

    /// An entry that can only be typed.
    pub fn typed(template: Template) -> Self {
        Self {
            parser: None,
            template: Some(template),
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("parser", &self.parser.as_ref().map(|_| "<parser>"))
            .field("template", &self.template)
            .finish()
    }
}

/// Maps control-sequence names and typed characters to entries.
///
/// Built once and shared read-only by the grammar and the typing code.
/// Command names are stored without the leading backslash.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: HashMap<String, Entry>,
    chars: HashMap<char, Entry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in command and character.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        kinds::register_all(&mut registry);
        registry
    }

    /// Add or replace a command, returning the entry it displaced.
    pub fn register_command(&mut self, name: &str, entry: Entry) -> Option<Entry> {
        self.commands.insert(name.to_string(), entry)
    }

    pub fn register_char(&mut self, ch: char, entry: Entry) -> Option<Entry> {
        self.chars.insert(ch, entry)
    }

    pub fn command(&self, name: &str) -> Option<&Entry> {
        self.commands.get(name)
    }

    pub fn char_entry(&self, ch: char) -> Option<&Entry> {
        self.chars.get(&ch)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}
