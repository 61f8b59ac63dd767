use std::fmt;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("malformed input at byte {position}: {reason}")]
    MalformedInput { position: usize, reason: Malformed },
    #[error("structural invariant violated by {operation} at token {index}: {state}")]
    StructuralInvariantViolation {
        operation: &'static str,
        index: usize,
        state: String,
    },
    #[error("value overflow in {operation} at token {index}: {state}")]
    Overflow {
        operation: &'static str,
        index: usize,
        state: String,
    },
    #[error("reduction did not settle within {limit} steps: {state}")]
    StepLimitExceeded { limit: usize, state: String },
    #[error("no numbers to add")]
    EmptyHomework,
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<Error>,
    },
}

/// Why a line of bracket notation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    UnexpectedCharacter(char),
    UnmatchedClose,
    Unclosed(usize),
    MultiDigitLiteral,
    Empty,
    NotABinaryTree,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            Malformed::UnmatchedClose => write!(f, "closing bracket without an open pair"),
            Malformed::Unclosed(depth) => write!(f, "{depth} pair(s) left open"),
            Malformed::MultiDigitLiteral => write!(f, "literals must be a single digit"),
            Malformed::Empty => write!(f, "empty number"),
            Malformed::NotABinaryTree => write!(f, "pairs must hold exactly two elements"),
        }
    }
}

impl Error {
    pub(crate) fn malformed(position: usize, reason: Malformed) -> Self {
        Error::MalformedInput { position, reason }
    }

    /// Attaches a 1-based line number to an error raised while reading homework.
    pub fn at_line(self, line: usize) -> Self {
        Error::Line {
            line,
            source: Box::new(self),
        }
    }
}
