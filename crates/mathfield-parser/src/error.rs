use thiserror::Error;

use crate::parser::Failure;

/// A parse that did not consume the whole input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position {position}: expected {expected}, got {}", describe(.remainder))]
pub struct ParseError {
    /// Byte offset of the furthest failure.
    pub position: usize,
    /// What the grammar expected there, alternatives joined with " or ".
    pub expected: String,
    /// The unconsumed input from `position` on.
    pub remainder: String,
}

impl ParseError {
    pub fn from_failure(input: &str, failure: Failure) -> Self {
        let position = failure.pos.min(input.len());
        Self {
            position,
            expected: failure.expected.join(" or "),
            remainder: input[position..].to_string(),
        }
    }
}

fn describe(remainder: &str) -> String {
    if remainder.is_empty() {
        return "end of input".to_string();
    }
    let mut shown: String = remainder.chars().take(24).collect();
    if shown.len() < remainder.len() {
        shown.push('…');
    }
    format!("{shown:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_remainder_and_expectation() {
        let err = ParseError::from_failure("\\frac{1}x", Failure::new(8, "'{'"));
        assert_eq!(
            err.to_string(),
            "parse error at position 8: expected '{', got \"x\""
        );
    }

    #[test]
    fn message_at_end_of_input() {
        let err = ParseError::from_failure("{", Failure::new(1, "'}'"));
        assert_eq!(
            err.to_string(),
            "parse error at position 1: expected '}', got end of input"
        );
    }
}
