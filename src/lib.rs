//! Snailfish numbers: binary trees of small integers, kept as a flat list of
//! depth-tagged leaves, with addition, reduction and magnitude.

pub mod arith;
pub mod error;
pub mod number;
pub mod rewrite;
pub mod search;

pub use crate::{
    error::{Error, Malformed, Result},
    number::{parser::parse_number, Sequence, Token},
    rewrite::{ReduceStats, Rules},
    search::{
        best_pair, best_pair_magnitude, parse_homework, solve, sum, Answers, BestPair, Options,
        Strategy,
    },
};
