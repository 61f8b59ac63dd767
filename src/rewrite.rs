//! The reduction rules: explode, split, and the fixpoint loop that applies
//! them in priority order.
//!
//! Rewrites update the sequence in place. Callers that need the original
//! value keep a clone; [`Sequence::reduced`] consumes its input and hands
//! back the reduced number.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    number::{Sequence, Token},
};

/// Limits that drive reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Pairs nested deeper than this explode.
    pub explode_depth: usize,
    /// Leaves at or above this value split.
    pub split_threshold: u64,
    /// Maximum number of rewrites a single reduction may apply.
    pub step_limit: Option<usize>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            explode_depth: 4,
            split_threshold: 10,
            step_limit: Some(1_000_000),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReduceStats {
    pub explodes: usize,
    pub splits: usize,
}

impl ReduceStats {
    pub fn steps(&self) -> usize {
        self.explodes + self.splits
    }
}

impl Sequence {
    /// Explodes the leftmost pair nested deeper than `rules.explode_depth`.
    ///
    /// Returns `false` and leaves the sequence untouched when no pair is
    /// deep enough.
    pub fn explode(&mut self, rules: &Rules) -> Result<bool> {
        let Some(i) = self
            .tokens
            .iter()
            .tuple_windows()
            .position(|(left, right)| left.pairs_with(right) && left.depth > rules.explode_depth)
        else {
            return Ok(false);
        };

        let (left, right) = (self.tokens[i], self.tokens[i + 1]);
        let depth = right.depth - 1;
        let is_right = self.merged_role(i, depth, "explode")?;
        trace!(index = i, left = left.value, right = right.value, "explode");

        let before = match i.checked_sub(1) {
            Some(j) => Some((j, self.absorb(j, left.value)?)),
            None => None,
        };
        let after = match self.tokens.get(i + 2) {
            Some(_) => Some((i + 2, self.absorb(i + 2, right.value)?)),
            None => None,
        };
        for (j, value) in before.into_iter().chain(after) {
            self.tokens[j].value = value;
        }
        self.tokens[i] = Token {
            value: 0,
            is_right,
            depth,
        };
        self.tokens.remove(i + 1);

        #[cfg(debug_assertions)]
        self.validate("explode")?;
        Ok(true)
    }

    /// Splits the leftmost leaf whose value reaches `rules.split_threshold`.
    pub fn split(&mut self, rules: &Rules) -> Result<bool> {
        let Some(i) = self
            .tokens
            .iter()
            .position(|token| token.value >= rules.split_threshold)
        else {
            return Ok(false);
        };

        let token = self.tokens[i];
        let depth = token.depth + 1;
        trace!(index = i, value = token.value, "split");
        self.tokens[i] = Token::left(token.value / 2, depth);
        self.tokens.insert(i + 1, Token::right(token.value.div_ceil(2), depth));

        #[cfg(debug_assertions)]
        self.validate("split")?;
        Ok(true)
    }

    /// Reduces with the default rules.
    pub fn reduce(&mut self) -> Result<ReduceStats> {
        self.reduce_with(&Rules::default())
    }

    /// Applies explode until it no longer fires, then a single split, and
    /// repeats until neither rule applies.
    pub fn reduce_with(&mut self, rules: &Rules) -> Result<ReduceStats> {
        let mut stats = ReduceStats::default();

        loop {
            if let Some(limit) = rules.step_limit {
                if stats.steps() >= limit {
                    return Err(Error::StepLimitExceeded {
                        limit,
                        state: self.to_string(),
                    });
                }
            }

            if self.explode(rules)? {
                stats.explodes += 1;
            } else if self.split(rules)? {
                stats.splits += 1;
            } else {
                break;
            }
        }

        debug!(
            explodes = stats.explodes,
            splits = stats.splits,
            len = self.len(),
            "reduced"
        );
        Ok(stats)
    }

    /// Consuming form of [`Sequence::reduce_with`].
    pub fn reduced(mut self, rules: &Rules) -> Result<Self> {
        self.reduce_with(rules)?;
        Ok(self)
    }

    /// Whether neither rewrite would fire.
    pub fn is_reduced(&self, rules: &Rules) -> bool {
        let too_deep = self
            .tokens
            .iter()
            .tuple_windows()
            .any(|(left, right)| left.pairs_with(right) && left.depth > rules.explode_depth);
        let too_large = self
            .tokens
            .iter()
            .any(|token| token.value >= rules.split_threshold);
        !too_deep && !too_large
    }

    /// The value token `j` would hold after taking in `amount`.
    fn absorb(&self, j: usize, amount: u64) -> Result<u64> {
        self.tokens[j]
            .value
            .checked_add(amount)
            .ok_or_else(|| self.overflow("explode", j))
    }

    /// Decides whether a token about to replace the pair at `i..=i + 1`
    /// is itself a right child, by looking at the neighbours at `depth`.
    ///
    /// A left sibling just before the pair makes it a right child; a right
    /// sibling just after makes it a left child. Both at once cannot happen
    /// in a well-formed sequence.
    pub(crate) fn merged_role(
        &self,
        i: usize,
        depth: usize,
        operation: &'static str,
    ) -> Result<bool> {
        let after_left_sibling = i
            .checked_sub(1)
            .and_then(|j| self.tokens.get(j))
            .is_some_and(|token| token.depth == depth && !token.is_right);
        let before_right_sibling = self
            .tokens
            .get(i + 2)
            .is_some_and(|token| token.depth == depth && token.is_right);

        if after_left_sibling && before_right_sibling {
            return Err(self.violation(operation, i));
        }
        Ok(after_left_sibling)
    }
}
