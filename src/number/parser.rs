use std::{iter::Peekable, str::FromStr};

use crate::error::{Error, Malformed, Result};

use super::{
    scanner::{BracketScanner, Lexeme},
    Sequence, Token,
};

/// Parses one snailfish number written in bracket notation.
///
/// Surrounding whitespace is ignored; error positions are byte offsets into
/// `source` as given.
pub fn parse_number(source: &str) -> Result<Sequence> {
    let trimmed = source.trim_start();
    let lead = source.len() - trimmed.len();
    let trimmed = trimmed.trim_end();

    let mut scanner = BracketScanner::new(trimmed).peekable();
    let tokens = scan_tokens(&mut scanner).map_err(|err| match err {
        Error::MalformedInput { position, reason } => Error::malformed(lead + position, reason),
        other => other,
    })?;

    if tokens.is_empty() {
        return Err(Error::malformed(lead, Malformed::Empty));
    }
    Sequence::from_tokens(tokens).map_err(|_| Error::malformed(lead, Malformed::NotABinaryTree))
}

fn scan_tokens(scanner: &mut Peekable<BracketScanner>) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut is_right = false;
    let mut end = 0;

    while let Some((position, lexeme)) = scanner.next() {
        end = position + 1;
        match lexeme {
            Lexeme::Open => {
                depth += 1;
                is_right = false;
            }
            Lexeme::Close => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(Error::malformed(position, Malformed::UnmatchedClose))?;
            }
            Lexeme::Comma => is_right = true,
            Lexeme::Digit(digit) => {
                if let Some((_, Lexeme::Digit(_))) = scanner.peek() {
                    return Err(Error::malformed(position, Malformed::MultiDigitLiteral));
                }
                tokens.push(Token {
                    value: digit.into(),
                    is_right,
                    depth,
                });
                is_right = false;
            }
            Lexeme::Other(c) => {
                return Err(Error::malformed(
                    position,
                    Malformed::UnexpectedCharacter(c),
                ))
            }
        }
    }

    if depth > 0 {
        return Err(Error::malformed(end, Malformed::Unclosed(depth)));
    }
    Ok(tokens)
}

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_number(s)
    }
}
