//! # mathfield-parser
//!
//! A small backtracking parser-combinator library. The mathfield grammar is
//! not a fixed BNF: each command registered with the engine contributes its
//! own parser for whatever follows its spelling, and the root grammar is
//! assembled from those pieces at parse time. That calls for parsers that are
//! plain values which can be stored, cloned and composed at runtime.
//!
//! ## Model
//!
//! ```text
//! Parser<T> = (input, position) -> Ok(Success { pos, value, hint })
//!                                | Err(Failure { pos, expected })
//! ```
//!
//! Parsers hold no mutable state, so backtracking is free: an alternative is
//! simply run again from the original position. Repetition is a loop, not
//! recursion, so long inputs do not grow the stack.
//!
//! ## Module Structure
//!
//! ```text
//! mathfield-parser/
//! ├── lib.rs         # This file - public API and integration tests
//! ├── parser.rs      # Parser<T>, Success, Failure and the combinators
//! ├── primitives.rs  # string, regex, succeed, fail, letter, digit, ...
//! └── error.rs       # ParseError returned by Parser::parse
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use mathfield_parser::{letter, string, Parser};
//!
//! let pair: Parser<(char, char)> = string("(")
//!     .and(letter())
//!     .then(|a| string(",").and(letter()).map(move |b| (a, b)))
//!     .skip(string(")"));
//!
//! assert_eq!(pair.parse("(x,y)").unwrap(), ('x', 'y'));
//! assert!(pair.parse("(x;y)").is_err());
//! ```

pub mod error;
pub mod parser;
pub mod primitives;

pub use error::ParseError;
pub use parser::{Failure, Parser, Reply, Success};
pub use primitives::{
    any_char, digit, eof, fail, letter, letters, opt_whitespace, regex, satisfy, string, succeed,
    whitespace,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A toy S-expression grammar exercising recursion, alternation and
    /// repetition together.
    #[derive(Debug, Clone, PartialEq)]
    enum Sexp {
        Atom(String),
        List(Vec<Sexp>),
    }

    fn sexp() -> Parser<Sexp> {
        Parser::lazy(|| {
            let atom = letters().map(Sexp::Atom);
            let list = string("(")
                .and(opt_whitespace().and(sexp()).many())
                .skip(opt_whitespace())
                .skip(string(")"))
                .map(Sexp::List);
            atom.or(list)
        })
    }

    #[test]
    fn nested_lists() {
        let parsed = sexp().parse("(a (b c) ())").unwrap();
        assert_eq!(
            parsed,
            Sexp::List(vec![
                Sexp::Atom("a".into()),
                Sexp::List(vec![Sexp::Atom("b".into()), Sexp::Atom("c".into())]),
                Sexp::List(vec![]),
            ])
        );
    }

    #[test]
    fn unclosed_list_reports_missing_paren() {
        let err = sexp().parse("(a (b c)").unwrap_err();
        assert_eq!(err.position, 8);
        assert!(err.expected.contains("')'"), "{}", err.expected);
        assert_eq!(err.remainder, "");
    }

    #[test]
    fn parsers_are_reusable_values() {
        let word = letters();
        let two = word.clone().skip(whitespace()).then(move |a| {
            word.clone().map(move |b| format!("{a}-{b}"))
        });
        assert_eq!(two.parse("hello world").unwrap(), "hello-world");
        assert_eq!(two.parse("a b").unwrap(), "a-b");
    }

    #[test]
    fn eof_and_any_char_compose() {
        let p = any_char().skip(eof());
        assert_eq!(p.parse("z").unwrap(), 'z');
        assert!(p.parse("zz").is_err());
    }

    #[test]
    fn regex_composes_with_strings() {
        let number = regex(::regex::Regex::new(r"^[0-9]+").unwrap());
        let p = string("x=").and(number);
        assert_eq!(p.parse("x=42").unwrap(), "42");
    }

    #[test]
    fn fail_then_or_recovers() {
        let p = fail::<char>("never").or(digit());
        assert_eq!(p.parse("5").unwrap(), '5');
        let p = digit().or(succeed('?'));
        assert_eq!(p.parse("").unwrap(), '?');
    }
}
