//! # The `Parser` value and its combinators
//!
//! A [`Parser<T>`] is an immutable wrapper around a function
//! `(input, position) -> Reply<T>`. Combinators never mutate the parsers they
//! are built from: `a.or(b)` returns a new parser and leaves `a` and `b`
//! usable elsewhere. Cloning is a reference-count bump.
//!
//! ## Backtracking
//!
//! A parser never mutates shared state, so retrying an alternative from the
//! original position is just calling it again with that position. `or` relies
//! on this: whatever the left branch consumed before failing is forgotten.
//!
//! ## Error hints
//!
//! A successful reply may carry the furthest [`Failure`] seen while producing
//! it. `many` over `\frac{1}` stops before `\frac`, but the hint remembers
//! that a `{` was expected at the end of input; [`Parser::parse`] reports the
//! hint instead of the less useful "expected end of input" at position 0.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::ParseError;

/// A failed parse attempt: where it failed and what was expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Byte offset of the failure.
    pub pos: usize,
    /// Human-readable expectations, e.g. `"'}'"` or `"a letter"`.
    pub expected: Vec<String>,
}

impl Failure {
    pub fn new(pos: usize, expected: impl Into<String>) -> Self {
        Self {
            pos,
            expected: vec![expected.into()],
        }
    }

    /// Keep whichever failure got further; equal positions merge expectations.
    pub fn merge(self, other: Failure) -> Failure {
        match self.pos.cmp(&other.pos) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => {
                let mut expected = self.expected;
                for e in other.expected {
                    if !expected.contains(&e) {
                        expected.push(e);
                    }
                }
                Failure {
                    pos: self.pos,
                    expected,
                }
            }
        }
    }
}

pub(crate) fn merge_hint(a: Option<Failure>, b: Option<Failure>) -> Option<Failure> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn merge_into(hint: Option<Failure>, failure: Failure) -> Failure {
    match hint {
        Some(h) => h.merge(failure),
        None => failure,
    }
}

/// A successful parse attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    /// Byte offset just past the consumed input.
    pub pos: usize,
    pub value: T,
    /// Furthest failure encountered on the way, if any.
    pub hint: Option<Failure>,
}

impl<T> Success<T> {
    pub fn new(pos: usize, value: T) -> Self {
        Self {
            pos,
            value,
            hint: None,
        }
    }
}

pub type Reply<T> = Result<Success<T>, Failure>;

type RunFn<T> = dyn Fn(&str, usize) -> Reply<T>;

/// An immutable, cheaply clonable parser producing values of type `T`.
pub struct Parser<T> {
    run: Rc<RunFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T: 'static> Parser<T> {
    /// Wrap a raw parse function.
    pub fn new(f: impl Fn(&str, usize) -> Reply<T> + 'static) -> Self {
        Self { run: Rc::new(f) }
    }

    /// Run the parser at `pos` without requiring the input to be consumed.
    pub fn run(&self, input: &str, pos: usize) -> Reply<T> {
        (self.run)(input, pos)
    }

    /// Parse the whole of `input`.
    ///
    /// Fails with a [`ParseError`] naming the unconsumed remainder and the
    /// furthest expectation that was not met.
    pub fn parse(&self, input: &str) -> Result<T, ParseError> {
        match self.run(input, 0) {
            Ok(s) if s.pos == input.len() => Ok(s.value),
            Ok(s) => {
                let failure = merge_into(s.hint, Failure::new(s.pos, "end of input"));
                Err(ParseError::from_failure(input, failure))
            }
            Err(failure) => Err(ParseError::from_failure(input, failure)),
        }
    }

    /// Defer construction until first use; needed for recursive grammars.
    pub fn lazy(build: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
        let cell: OnceCell<Parser<T>> = OnceCell::new();
        Parser::new(move |input, pos| cell.get_or_init(&build).run(input, pos))
    }

    /// Try `self`; if it fails, try `other` from the same position.
    pub fn or(self, other: Parser<T>) -> Parser<T> {
        Parser::new(move |input, pos| match self.run(input, pos) {
            Ok(s) => Ok(s),
            Err(left) => match other.run(input, pos) {
                Ok(mut s) => {
                    s.hint = merge_hint(Some(left), s.hint);
                    Ok(s)
                }
                Err(right) => Err(left.merge(right)),
            },
        })
    }

    /// Sequence with a parser chosen from the first result.
    ///
    /// This is what lets a command's spelling decide what follows it.
    pub fn then<U: 'static>(self, next: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        Parser::new(move |input, pos| {
            let first = self.run(input, pos)?;
            match next(first.value).run(input, first.pos) {
                Ok(mut s) => {
                    s.hint = merge_hint(first.hint, s.hint);
                    Ok(s)
                }
                Err(e) => Err(merge_into(first.hint, e)),
            }
        })
    }

    /// Sequence, keeping the result of `next`.
    pub fn and<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        self.then(move |_| next.clone())
    }

    /// Sequence, keeping the result of `self`.
    pub fn skip<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        Parser::new(move |input, pos| {
            let first = self.run(input, pos)?;
            match next.run(input, first.pos) {
                Ok(s) => Ok(Success {
                    pos: s.pos,
                    value: first.value,
                    hint: merge_hint(first.hint, s.hint),
                }),
                Err(e) => Err(merge_into(first.hint, e)),
            }
        })
    }

    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        Parser::new(move |input, pos| {
            self.run(input, pos).map(|s| Success {
                pos: s.pos,
                value: f(s.value),
                hint: s.hint,
            })
        })
    }

    /// Replace the result with a fixed value.
    pub fn result<U: Clone + 'static>(self, value: U) -> Parser<U> {
        self.map(move |_| value.clone())
    }

    /// Replace the expectation reported when this parser fails.
    pub fn desc(self, expected: &str) -> Parser<T> {
        let expected = expected.to_string();
        Parser::new(move |input, pos| {
            self.run(input, pos)
                .map_err(|_| Failure::new(pos, expected.clone()))
        })
    }

    /// Match between `min` and `max` repetitions.
    ///
    /// Iterative, so long inputs cost heap rather than stack. A repetition
    /// that consumes nothing ends the loop once `min` is satisfied.
    pub fn times(self, min: usize, max: usize) -> Parser<Vec<T>> {
        Parser::new(move |input, pos| {
            let mut values = Vec::new();
            let mut at = pos;
            let mut hint = None;
            while values.len() < max {
                match self.run(input, at) {
                    Ok(s) => {
                        hint = merge_hint(hint, s.hint);
                        let progressed = s.pos != at;
                        at = s.pos;
                        values.push(s.value);
                        if !progressed && values.len() >= min {
                            break;
                        }
                    }
                    Err(e) => {
                        hint = merge_hint(hint, Some(e));
                        break;
                    }
                }
            }
            if values.len() >= min {
                Ok(Success {
                    pos: at,
                    value: values,
                    hint,
                })
            } else {
                Err(merge_into(
                    hint,
                    Failure::new(at, format!("at least {min} repetitions")),
                ))
            }
        })
    }

    pub fn many(self) -> Parser<Vec<T>> {
        self.times(0, usize::MAX)
    }

    pub fn at_least(self, min: usize) -> Parser<Vec<T>> {
        self.times(min, usize::MAX)
    }

    pub fn at_most(self, max: usize) -> Parser<Vec<T>> {
        self.times(0, max)
    }

    pub fn optional(self) -> Parser<Option<T>> {
        self.times(0, 1).map(|mut v| v.pop())
    }
}
