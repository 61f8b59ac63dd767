use std::fmt::{self, Write};

use super::Sequence;

/// Writes the number back in bracket notation.
///
/// The cursor is the stack of open brackets, each remembering whether its
/// left child has been written. Leaf depths alone fix the shape, so a leaf
/// opens brackets until the stack reaches its depth, and every completed
/// right child closes its bracket and counts towards the parent.
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut open: Vec<bool> = Vec::with_capacity(self.max_depth());

        for token in &self.tokens {
            if open.last() == Some(&true) {
                f.write_char(',')?;
            }
            while open.len() < token.depth {
                f.write_char('[')?;
                open.push(false);
            }
            write!(f, "{}", token.value)?;

            while let Some(left_written) = open.last_mut() {
                if !*left_written {
                    *left_written = true;
                    break;
                }
                f.write_char(']')?;
                open.pop();
            }
        }

        for _ in open {
            f.write_char(']')?;
        }
        Ok(())
    }
}
