use std::ops::Add;

use itertools::Itertools;

use crate::{
    error::Result,
    number::{Sequence, Token},
    rewrite::Rules,
};

/// Joins two numbers into a new pair without reducing it.
impl Add for &Sequence {
    type Output = Sequence;

    fn add(self, rhs: &Sequence) -> Sequence {
        let tokens = self
            .tokens
            .iter()
            .chain(&rhs.tokens)
            .map(|token| Token {
                depth: token.depth + 1,
                ..*token
            })
            .collect();
        Sequence { tokens }
    }
}

impl Add for Sequence {
    type Output = Sequence;

    fn add(self, rhs: Sequence) -> Sequence {
        &self + &rhs
    }
}

impl Sequence {
    /// Snailfish addition: the pair of both numbers, reduced.
    pub fn add_reduced(&self, rhs: &Sequence, rules: &Rules) -> Result<Sequence> {
        (self + rhs).reduced(rules)
    }

    /// Collapses the tree bottom-up, each pair becoming `3 * left + 2 * right`.
    pub fn magnitude(&self) -> Result<u64> {
        let mut collapsed = self.clone();

        while collapsed.len() > 1 {
            let i = collapsed
                .tokens
                .iter()
                .tuple_windows()
                .position(|(left, right)| left.pairs_with(right))
                .ok_or_else(|| collapsed.violation("magnitude", 0))?;

            let (left, right) = (collapsed.tokens[i], collapsed.tokens[i + 1]);
            let depth = right.depth.saturating_sub(1);
            let is_right = collapsed.merged_role(i, depth, "magnitude")?;
            let value = left
                .value
                .checked_mul(3)
                .zip(right.value.checked_mul(2))
                .and_then(|(left, right)| left.checked_add(right))
                .ok_or_else(|| collapsed.overflow("magnitude", i))?;
            collapsed.tokens[i] = Token {
                value,
                is_right,
                depth,
            };
            collapsed.tokens.remove(i + 1);
        }

        collapsed
            .tokens
            .first()
            .map(|token| token.value)
            .ok_or_else(|| collapsed.violation("magnitude", 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, number::parser::parse_number};

    #[test]
    fn test_add() {
        let a = parse_number("[1,2]").unwrap();
        let b = parse_number("[[3,4],5]").unwrap();
        assert_eq!((&a + &b).to_string(), "[[1,2],[[3,4],5]]");
        assert_eq!((b + a).to_string(), "[[[3,4],5],[1,2]]");
    }

    #[test]
    fn test_add_does_not_reduce() {
        let a = parse_number("[[[[4,3],4],4],[7,[[8,4],9]]]").unwrap();
        let b = parse_number("[1,1]").unwrap();
        let sum = &a + &b;
        assert_eq!(sum.to_string(), "[[[[[4,3],4],4],[7,[[8,4],9]]],[1,1]]");
        assert!(!sum.is_reduced(&Rules::default()));
    }

    #[test]
    fn test_add_reduced() {
        let a = parse_number("[[[[4,3],4],4],[7,[[8,4],9]]]").unwrap();
        let b = parse_number("[1,1]").unwrap();
        let sum = a.add_reduced(&b, &Rules::default()).unwrap();
        assert_eq!(sum.to_string(), "[[[[0,7],4],[[7,8],[6,0]]],[8,1]]");
    }

    #[test]
    fn test_magnitude() {
        let cases = [
            ("[9,1]", 29),
            ("[[9,1],[1,9]]", 129),
            ("[[1,2],[[3,4],5]]", 143),
            ("[[[[0,7],4],[[7,8],[6,0]]],[8,1]]", 1384),
            ("[[[[1,1],[2,2]],[3,3]],[4,4]]", 445),
            ("[[[[3,0],[5,3]],[4,4]],[5,5]]", 791),
            ("[[[[5,0],[7,4]],[5,5]],[6,6]]", 1137),
            ("[[[[8,7],[7,7]],[[8,6],[7,7]]],[[[0,7],[6,6]],[8,7]]]", 3488),
            ("8", 8),
        ];
        for (input, expected) in cases {
            let sequence = parse_number(input).unwrap();
            assert_eq!(sequence.magnitude(), Ok(expected), "{input}");
        }
    }

    #[test]
    fn test_magnitude_leaves_input_alone() {
        let sequence = parse_number("[[1,2],3]").unwrap();
        let before = sequence.clone();
        sequence.magnitude().unwrap();
        assert_eq!(sequence, before);
    }

    #[test]
    fn test_magnitude_overflow() {
        // [[[...[9,9],9]...],9] nested 45 deep: 9 * 5^45 does not fit in a u64.
        let depth = 45;
        let text = format!("{}9,9]{}", "[".repeat(depth), ",9]".repeat(depth - 1));
        let sequence = parse_number(&text).unwrap();
        assert_eq!(sequence.max_depth(), depth);
        assert!(matches!(
            sequence.magnitude(),
            Err(Error::Overflow {
                operation: "magnitude",
                ..
            })
        ));
    }

    #[test]
    fn test_magnitude_rejects_broken_sequences() {
        let no_pair = Sequence {
            tokens: vec![Token::left(1, 1), Token::left(2, 1)],
        };
        assert!(matches!(
            no_pair.magnitude(),
            Err(Error::StructuralInvariantViolation {
                operation: "magnitude",
                ..
            })
        ));

        let empty = Sequence { tokens: vec![] };
        assert!(empty.magnitude().is_err());
    }
}
