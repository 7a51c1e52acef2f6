//! Key chords to editor actions.
//!
//! Chords are strings such as `"Shift-Left"` or `"Ctrl-Shift-End"`.
//! Modifiers may arrive in any order; [`normalize`] puts them in the order
//! `Ctrl`, `Shift`, `Alt`, `Meta` before lookup.

use std::collections::HashMap;

use mathfield_config::Vertical;

use crate::tree::Dir;

/// What a chord does. Executed by [`crate::MathField::perform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Dir),
    MoveVertically(Vertical),
    MoveToBlockEnd(Dir),
    MoveToRootEnd(Dir),
    Select(Dir),
    /// Shift-Up selects towards the block start, Shift-Down towards its end.
    SelectVertically(Dir),
    SelectToBlockEnd(Dir),
    SelectToRootEnd(Dir),
    SelectAll,
    Delete(Dir),
    DeleteToBlockEnd(Dir),
    /// Tab and Esc: leave the current block.
    Escape(Dir),
    Enter,
    /// Handled only when space is configured to behave like Tab.
    Space,
}

const MODIFIERS: [&str; 4] = ["Ctrl", "Shift", "Alt", "Meta"];

/// Put a chord's modifiers in canonical order. Unknown modifier names are
/// kept as part of the key.
pub fn normalize(chord: &str) -> String {
    let mut parts: Vec<&str> = chord.split('-').collect();
    let Some(key) = parts.pop() else {
        return String::new();
    };
    let mut held = [false; MODIFIERS.len()];
    let mut rest = Vec::new();
    for part in parts {
        match MODIFIERS.iter().position(|m| m.eq_ignore_ascii_case(part)) {
            Some(i) => held[i] = true,
            None => rest.push(part),
        }
    }
    MODIFIERS
        .iter()
        .zip(held)
        .filter_map(|(m, on)| on.then_some(*m))
        .chain(rest)
        .chain(std::iter::once(key))
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    bindings: HashMap<String, Action>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bindings every math field starts with.
    pub fn standard() -> Self {
        use Action::*;
        use Dir::{Left, Right};

        let mut table = Self::new();
        for (chord, action) in [
            ("Left", Move(Left)),
            ("Right", Move(Right)),
            ("Up", MoveVertically(Vertical::Up)),
            ("Down", MoveVertically(Vertical::Down)),
            ("Shift-Left", Select(Left)),
            ("Shift-Right", Select(Right)),
            ("Shift-Up", SelectVertically(Left)),
            ("Shift-Down", SelectVertically(Right)),
            ("Home", MoveToBlockEnd(Left)),
            ("End", MoveToBlockEnd(Right)),
            ("Ctrl-Home", MoveToRootEnd(Left)),
            ("Ctrl-End", MoveToRootEnd(Right)),
            ("Shift-Home", SelectToBlockEnd(Left)),
            ("Shift-End", SelectToBlockEnd(Right)),
            ("Ctrl-Shift-Home", SelectToRootEnd(Left)),
            ("Ctrl-Shift-End", SelectToRootEnd(Right)),
            ("Backspace", Delete(Left)),
            ("Shift-Backspace", Delete(Left)),
            ("Del", Delete(Right)),
            ("Shift-Del", Delete(Right)),
            ("Ctrl-Backspace", DeleteToBlockEnd(Left)),
            ("Ctrl-Del", DeleteToBlockEnd(Right)),
            ("Ctrl-A", SelectAll),
            ("Meta-A", SelectAll),
            ("Tab", Escape(Right)),
            ("Shift-Tab", Escape(Left)),
            ("Esc", Escape(Right)),
            ("Shift-Esc", Escape(Left)),
            ("Enter", Enter),
            ("Spacebar", Space),
        ] {
            table.bind(chord, action);
        }
        table
    }

    /// Bind `chord`, returning whatever it was bound to before.
    pub fn bind(&mut self, chord: &str, action: Action) -> Option<Action> {
        self.bindings.insert(normalize(chord), action)
    }

    pub fn unbind(&mut self, chord: &str) -> Option<Action> {
        self.bindings.remove(&normalize(chord))
    }

    pub fn lookup(&self, chord: &str) -> Option<Action> {
        self.bindings.get(&normalize(chord)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Left", "Left")]
    #[case("Shift-Ctrl-End", "Ctrl-Shift-End")]
    #[case("meta-A", "Meta-A")]
    #[case("Hyper-Shift-X", "Shift-Hyper-X")]
    fn normalizes_modifier_order(#[case] chord: &str, #[case] expected: &str) {
        assert_eq!(normalize(chord), expected);
    }

    #[test]
    fn standard_table_lookups() {
        let table = KeyTable::standard();
        assert_eq!(table.lookup("Shift-Left"), Some(Action::Select(Dir::Left)));
        assert_eq!(
            table.lookup("Shift-Ctrl-Home"),
            Some(Action::SelectToRootEnd(Dir::Left))
        );
        assert_eq!(table.lookup("Meta-A"), Some(Action::SelectAll));
        assert_eq!(table.lookup("F13"), None);
    }

    #[test]
    fn rebinding_replaces() {
        let mut table = KeyTable::standard();
        let before = table.len();
        assert_eq!(
            table.bind("Esc", Action::Enter),
            Some(Action::Escape(Dir::Right))
        );
        assert_eq!(table.len(), before);
        assert_eq!(table.unbind("Esc"), Some(Action::Enter));
        assert_eq!(table.lookup("Esc"), None);
    }
}
