//! Drivers over whole homework lists: the running sum and the search for
//! the ordered pair with the largest magnitude.

use itertools::iproduct;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    number::{parser::parse_number, Sequence},
    rewrite::Rules,
};

/// How the pairwise search is scheduled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Sequential,
    /// Spread pair evaluations over the rayon thread pool.
    Parallel,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub rules: Rules,
    pub strategy: Strategy,
}

/// The ordered pair `list[left] + list[right]` and its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestPair {
    pub left: usize,
    pub right: usize,
    pub magnitude: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub sum: Sequence,
    pub sum_magnitude: u64,
    pub best_pair: Option<BestPair>,
}

/// Parses one number per line. Blank lines are skipped; the first bad line
/// fails the whole list.
pub fn parse_homework(text: &str) -> Result<Vec<Sequence>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_number(line).map_err(|err| err.at_line(i + 1)))
        .collect()
}

/// Adds every number in order, reducing after each addition.
pub fn sum(list: &[Sequence], rules: &Rules) -> Result<Sequence> {
    let (first, rest) = list.split_first().ok_or(Error::EmptyHomework)?;
    rest.iter()
        .try_fold(first.clone(), |acc, next| acc.add_reduced(next, rules))
}

/// Finds the ordered pair of distinct numbers whose reduced sum has the
/// largest magnitude. Both orders of every pair are tried, since snailfish
/// addition does not commute.
///
/// Returns `None` when the list holds fewer than two numbers.
pub fn best_pair(list: &[Sequence], options: &Options) -> Result<Option<BestPair>> {
    let n = list.len();
    let evaluate = |(left, right): (usize, usize)| -> Result<BestPair> {
        let magnitude = list[left]
            .add_reduced(&list[right], &options.rules)?
            .magnitude()?;
        Ok(BestPair {
            left,
            right,
            magnitude,
        })
    };

    debug!(
        numbers = n,
        pairs = n * n.saturating_sub(1),
        strategy = ?options.strategy,
        "pair search"
    );
    match options.strategy {
        Strategy::Sequential => iproduct!(0..n, 0..n)
            .filter(|(left, right)| left != right)
            .map(evaluate)
            .try_fold(None, |best, pair| {
                let pair = pair?;
                Ok(Some(best.map_or(pair, |best| larger(best, pair))))
            }),
        Strategy::Parallel => (0..n)
            .into_par_iter()
            .flat_map_iter(|left| {
                (0..n)
                    .filter(move |&right| right != left)
                    .map(move |right| (left, right))
            })
            .map(evaluate)
            .try_reduce_with(|a, b| Ok(larger(a, b)))
            .transpose(),
    }
}

/// Later pairs win ties.
fn larger(a: BestPair, b: BestPair) -> BestPair {
    if b.magnitude >= a.magnitude {
        b
    } else {
        a
    }
}

/// Largest magnitude over all ordered pairs; 0 for fewer than two numbers.
pub fn best_pair_magnitude(list: &[Sequence], options: &Options) -> Result<u64> {
    Ok(best_pair(list, options)?.map_or(0, |pair| pair.magnitude))
}

/// Computes both answers for a homework text.
pub fn solve(text: &str, options: &Options) -> Result<Answers> {
    let list = parse_homework(text)?;
    info!(numbers = list.len(), "parsed homework");

    let sum = sum(&list, &options.rules)?;
    let sum_magnitude = sum.magnitude()?;
    let best_pair = best_pair(&list, options)?;

    Ok(Answers {
        sum,
        sum_magnitude,
        best_pair,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Malformed;

    #[test]
    fn test_sum_of_small_pairs() {
        let list = parse_homework("[1,1]\n[2,2]\n[3,3]\n[4,4]\n").unwrap();
        let total = sum(&list, &Rules::default()).unwrap();
        assert_eq!(total.to_string(), "[[[[1,1],[2,2]],[3,3]],[4,4]]");

        let list = parse_homework("[1,1]\n[2,2]\n[3,3]\n[4,4]\n[5,5]\n[6,6]").unwrap();
        let total = sum(&list, &Rules::default()).unwrap();
        assert_eq!(total.to_string(), "[[[[5,0],[7,4]],[5,5]],[6,6]]");
        assert_eq!(total.magnitude(), Ok(1137));
    }

    #[test]
    fn test_sum_single_and_empty() {
        let list = parse_homework("[9,1]").unwrap();
        assert_eq!(sum(&list, &Rules::default()).unwrap(), list[0]);
        assert_eq!(sum(&[], &Rules::default()), Err(Error::EmptyHomework));
    }

    #[test]
    fn test_parse_homework_reports_line() {
        let err = parse_homework("[1,2]\n\n[3,x]\n").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedInput {
                position: 3,
                reason: Malformed::UnexpectedCharacter('x'),
            }
            .at_line(3)
        );
    }

    #[test]
    fn test_addition_does_not_commute() {
        let list = parse_homework("[[[[4,3],4],4],[7,[[8,4],9]]]\n[1,1]").unwrap();
        let rules = Rules::default();
        let forward = list[0].add_reduced(&list[1], &rules).unwrap().magnitude().unwrap();
        let backward = list[1].add_reduced(&list[0], &rules).unwrap().magnitude().unwrap();
        assert_eq!(forward, 1384);
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_best_pair_checks_both_orders() {
        // [9,9] + [1,1] beats [1,1] + [9,9].
        let list = parse_homework("[1,1]\n[9,9]").unwrap();
        let best = best_pair(&list, &Options::default()).unwrap().unwrap();
        assert_eq!(
            best,
            BestPair {
                left: 1,
                right: 0,
                magnitude: 3 * 45 + 2 * 5,
            }
        );
    }

    #[test]
    fn test_best_pair_strategies_agree() {
        let list = parse_homework(
            "[[[0,[5,8]],[[1,7],[9,6]]],[[4,[1,2]],[[1,4],2]]]\n\
             [[[5,[2,8]],4],[5,[[9,9],0]]]\n\
             [6,[[[6,2],[5,6]],[[7,6],[4,7]]]]\n\
             [[[6,[0,7]],[0,9]],[4,[9,[9,0]]]]",
        )
        .unwrap();
        let sequential = best_pair_magnitude(&list, &Options::default()).unwrap();
        let parallel = best_pair_magnitude(
            &list,
            &Options {
                strategy: Strategy::Parallel,
                ..Options::default()
            },
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_best_pair_ties_go_to_the_later_pair() {
        let list = parse_homework("[1,1]\n[1,1]").unwrap();
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let options = Options {
                strategy,
                ..Options::default()
            };
            let best = best_pair(&list, &options).unwrap().unwrap();
            assert_eq!((best.left, best.right, best.magnitude), (1, 0, 25));
        }
    }

    #[test]
    fn test_best_pair_propagates_errors() {
        let list = parse_homework("[1,1]\n[2,2]").unwrap();
        for strategy in [Strategy::Sequential, Strategy::Parallel] {
            let options = Options {
                rules: Rules {
                    step_limit: Some(0),
                    ..Rules::default()
                },
                strategy,
            };
            assert!(matches!(
                best_pair(&list, &options),
                Err(Error::StepLimitExceeded { limit: 0, .. })
            ));
        }
    }

    #[test]
    fn test_best_pair_needs_two_numbers() {
        let list = parse_homework("[1,2]").unwrap();
        assert_eq!(best_pair(&list, &Options::default()), Ok(None));
        assert_eq!(best_pair_magnitude(&list, &Options::default()), Ok(0));
    }
}
