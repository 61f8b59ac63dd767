use std::fmt;

#[derive(Debug)]
pub struct BracketScanner<'a> {
    source: &'a str,
    offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme {
    Open,
    Close,
    Comma,
    Digit(u8),
    Other(char),
}

impl<'a> BracketScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        BracketScanner { source, offset: 0 }
    }
}

impl Iterator for BracketScanner<'_> {
    /// Each lexeme with its byte offset in the original source.
    type Item = (usize, Lexeme);

    fn next(&mut self) -> Option<(usize, Lexeme)> {
        let next = self.source.chars().next()?;
        let position = self.offset;
        self.source = &self.source[next.len_utf8()..];
        self.offset += next.len_utf8();

        let lexeme = match next {
            '[' => Lexeme::Open,
            ']' => Lexeme::Close,
            ',' => Lexeme::Comma,
            '0'..='9' => Lexeme::Digit(next as u8 - b'0'),
            _ => Lexeme::Other(next),
        };
        Some((position, lexeme))
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::Open => write!(f, "["),
            Lexeme::Close => write!(f, "]"),
            Lexeme::Comma => write!(f, ","),
            Lexeme::Digit(d) => write!(f, "{d}"),
            Lexeme::Other(c) => write!(f, "{c}"),
        }
    }
}
