use std::fmt;

use crate::error::{Error, Malformed, Result};

pub mod parser;
pub mod printer;
pub mod scanner;

/// One leaf of a snailfish number, tagged with where it sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub value: u64,
    pub is_right: bool,
    /// Number of brackets enclosing the leaf.
    pub depth: usize,
}

/// A snailfish number, stored as its leaves in left-to-right order.
///
/// The tree shape is recovered from the `depth` and `is_right` tags alone:
/// a left leaf at depth `d` is closed by the next right leaf at depth `d`
/// once any deeper subtrees in between have been closed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pub(crate) tokens: Vec<Token>,
}

impl Token {
    pub fn left(value: u64, depth: usize) -> Self {
        Token {
            value,
            is_right: false,
            depth,
        }
    }

    pub fn right(value: u64, depth: usize) -> Self {
        Token {
            value,
            is_right: true,
            depth,
        }
    }

    /// Whether `self` and `next` are the two leaves of the same pair.
    pub(crate) fn pairs_with(&self, next: &Token) -> bool {
        !self.is_right && next.is_right && self.depth == next.depth
    }
}

impl Sequence {
    /// Builds a sequence from raw tokens, rejecting lists that do not
    /// describe a full binary tree.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self> {
        check_shape(&tokens).map_err(|_| Error::malformed(0, Malformed::NotABinaryTree))?;
        Ok(Sequence { tokens })
    }

    /// A bare literal, the degenerate depth-zero number.
    pub fn literal(value: u64) -> Self {
        Sequence {
            tokens: vec![Token::left(value, 0)],
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.tokens.iter().map(|t| t.depth).max().unwrap_or(0)
    }

    /// Renders every token in its tagged form, e.g. `(9L5) (8R5) (1R4)`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&token.to_string());
        }
        out
    }

    pub(crate) fn violation(&self, operation: &'static str, index: usize) -> Error {
        Error::StructuralInvariantViolation {
            operation,
            index,
            state: self.dump(),
        }
    }

    pub(crate) fn overflow(&self, operation: &'static str, index: usize) -> Error {
        Error::Overflow {
            operation,
            index,
            state: self.dump(),
        }
    }

    /// Re-checks the tree shape, blaming `operation` for any damage.
    /// Rewrites call this after every step in debug builds.
    pub fn validate(&self, operation: &'static str) -> Result<()> {
        check_shape(&self.tokens).map_err(|index| self.violation(operation, index))
    }
}

/// Collapses adjacent siblings on a stack until a single root remains.
///
/// Leaves carry their role; collapsed subtrees have none yet, so either
/// side of a pair may be taken by them. Returns the index of the first
/// token that could not be placed.
fn check_shape(tokens: &[Token]) -> Result<(), usize> {
    // (depth, role of a leaf, or None for a collapsed pair)
    let mut stack: Vec<(usize, Option<bool>)> = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        if tokens.len() > 1 && token.depth == 0 {
            return Err(i);
        }
        stack.push((token.depth, Some(token.is_right)));

        while let [.., (left_depth, left_role), (right_depth, right_role)] = stack[..] {
            if left_depth != right_depth {
                break;
            }
            if left_role == Some(true) || right_role == Some(false) || left_depth == 0 {
                return Err(i);
            }
            stack.truncate(stack.len() - 2);
            stack.push((left_depth - 1, None));
        }
    }

    match stack[..] {
        [(0, _)] => Ok(()),
        _ => Err(tokens.len()),
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = if self.is_right { 'R' } else { 'L' };
        write!(f, "({}{}{})", self.value, role, self.depth)
    }
}
