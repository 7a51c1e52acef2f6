//! Leaf parsers. Everything else is built from these with the combinators
//! on [`Parser`].

use regex::Regex;

use crate::parser::{Failure, Parser, Success};

/// Match `expected` literally, returning it.
pub fn string(expected: &str) -> Parser<String> {
    let expected = expected.to_string();
    let description = format!("'{expected}'");
    Parser::new(move |input, pos| {
        if input[pos..].starts_with(expected.as_str()) {
            Ok(Success::new(pos + expected.len(), expected.clone()))
        } else {
            Err(Failure::new(pos, description.clone()))
        }
    })
}

/// Match a regular expression at the current position.
///
/// # Panics
///
/// The pattern must be anchored with `^`. An unanchored pattern could match
/// further along the input and silently skip text, so it is rejected as a
/// usage error when the parser is built.
pub fn regex(re: Regex) -> Parser<String> {
    assert!(
        re.as_str().starts_with('^'),
        "regex parser patterns must be anchored with '^', got {:?}",
        re.as_str()
    );
    let description = format!("/{}/", re.as_str());
    Parser::new(move |input, pos| match re.find(&input[pos..]) {
        Some(m) if m.start() == 0 => Ok(Success::new(pos + m.end(), m.as_str().to_string())),
        _ => Err(Failure::new(pos, description.clone())),
    })
}

/// Always succeed with `value`, consuming nothing.
pub fn succeed<T: Clone + 'static>(value: T) -> Parser<T> {
    Parser::new(move |_, pos| Ok(Success::new(pos, value.clone())))
}

/// Always fail with the given expectation.
pub fn fail<T: 'static>(expected: &str) -> Parser<T> {
    let expected = expected.to_string();
    Parser::new(move |_, pos| Err(Failure::new(pos, expected.clone())))
}

/// Match one character satisfying `pred`.
pub fn satisfy(expected: &str, pred: impl Fn(char) -> bool + 'static) -> Parser<char> {
    let expected = expected.to_string();
    Parser::new(move |input, pos| match input[pos..].chars().next() {
        Some(c) if pred(c) => Ok(Success::new(pos + c.len_utf8(), c)),
        _ => Err(Failure::new(pos, expected.clone())),
    })
}

pub fn any_char() -> Parser<char> {
    satisfy("any character", |_| true)
}

/// One ASCII letter.
pub fn letter() -> Parser<char> {
    satisfy("a letter", |c| c.is_ascii_alphabetic())
}

/// One or more ASCII letters.
pub fn letters() -> Parser<String> {
    take_while("letters", 1, |c| c.is_ascii_alphabetic())
}

pub fn digit() -> Parser<char> {
    satisfy("a digit", |c| c.is_ascii_digit())
}

/// One or more whitespace characters.
pub fn whitespace() -> Parser<String> {
    take_while("whitespace", 1, char::is_whitespace)
}

/// Zero or more whitespace characters.
pub fn opt_whitespace() -> Parser<String> {
    take_while("whitespace", 0, char::is_whitespace)
}

/// Succeed only at the end of input.
pub fn eof() -> Parser<()> {
    Parser::new(|input, pos| {
        if pos >= input.len() {
            Ok(Success::new(pos, ()))
        } else {
            Err(Failure::new(pos, "end of input"))
        }
    })
}

fn take_while(
    expected: &'static str,
    min_chars: usize,
    pred: impl Fn(char) -> bool + 'static,
) -> Parser<String> {
    Parser::new(move |input, pos| {
        let rest = &input[pos..];
        let len: usize = rest
            .chars()
            .take_while(|c| pred(*c))
            .map(char::len_utf8)
            .sum();
        if rest[..len].chars().count() < min_chars {
            return Err(Failure::new(pos, expected));
        }
        Ok(Success::new(pos + len, rest[..len].to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn string_matches_prefix_only() {
        let p = string("\\frac");
        assert_eq!(p.run("\\frac{1}{2}", 0).unwrap().pos, 5);
        assert!(p.run("\\fra", 0).is_err());
    }

    #[test]
    fn regex_is_anchored_at_current_position() {
        let p = regex(Regex::new(r"^[0-9]+").unwrap());
        let s = p.run("ab12", 2).unwrap();
        assert_eq!(s.value, "12");
        assert!(p.run("a12", 0).is_err());
    }

    #[test]
    #[should_panic(expected = "anchored")]
    fn unanchored_regex_is_rejected() {
        let _ = regex(Regex::new(r"[0-9]+").unwrap());
    }

    #[rstest]
    #[case("abc1", Some("abc"))]
    #[case("Q", Some("Q"))]
    #[case("1abc", None)]
    #[case("", None)]
    fn letters_needs_at_least_one(#[case] input: &str, #[case] expected: Option<&str>) {
        let got = letters().run(input, 0).ok().map(|s| s.value);
        assert_eq!(got.as_deref(), expected);
    }

    #[test]
    fn opt_whitespace_accepts_nothing() {
        let s = opt_whitespace().run("x", 0).unwrap();
        assert_eq!(s.pos, 0);
        let s = opt_whitespace().run(" \t x", 0).unwrap();
        assert_eq!(s.pos, 3);
    }

    #[test]
    fn any_char_handles_multibyte() {
        let s = any_char().run("αβ", 0).unwrap();
        assert_eq!(s.value, 'α');
        assert_eq!(s.pos, 'α'.len_utf8());
    }

    #[test]
    fn eof_only_at_end() {
        assert!(eof().run("a", 0).is_err());
        assert!(eof().run("a", 1).is_ok());
    }
}
