//! Arithmetic operators for combining factors and blending them into scores
//!
//! The same closed set serves both roles: `score_operator` folds the factors
//! of several prefixes into one, `boost_operator` applies that combined
//! factor to the document's score.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Closed set of operators accepted in `score_operator` / `boost_operator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatorKind {
    /// `acc + value`
    #[default]
    Add,
    /// `acc * value`
    Multiply,
    /// `acc - value`
    Subtract,
    /// `value` (last one wins)
    Set,
}

impl OperatorKind {
    /// All operators, in declaration order
    pub const ALL: [OperatorKind; 4] = [
        OperatorKind::Add,
        OperatorKind::Multiply,
        OperatorKind::Subtract,
        OperatorKind::Set,
    ];

    /// Apply the operator with `acc` on the left
    pub fn apply(self, acc: f32, value: f32) -> f32 {
        match self {
            OperatorKind::Add => acc + value,
            OperatorKind::Multiply => acc * value,
            OperatorKind::Subtract => acc - value,
            OperatorKind::Set => value,
        }
    }

    /// Fold a sequence seeded with its first element
    ///
    /// The operator only runs from the second element on, so a MULTIPLY fold
    /// never starts from an implicit zero. Returns `None` for an empty input.
    pub fn fold<I>(self, values: I) -> Option<f32>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut iter = values.into_iter();
        let seed = iter.next()?;
        Some(iter.fold(seed, |acc, v| self.apply(acc, v)))
    }

    /// Name as written in rescorer options
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Add => "ADD",
            OperatorKind::Multiply => "MULTIPLY",
            OperatorKind::Subtract => "SUBTRACT",
            OperatorKind::Set => "SET",
        }
    }
}

impl FromStr for OperatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADD" => Ok(OperatorKind::Add),
            "MULTIPLY" => Ok(OperatorKind::Multiply),
            "SUBTRACT" => Ok(OperatorKind::Subtract),
            "SET" => Ok(OperatorKind::Set),
            other => Err(ConfigError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_all_operators() {
        for op in OperatorKind::ALL {
            assert_eq!(op.as_str().parse::<OperatorKind>().unwrap(), op);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "add".parse::<OperatorKind>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidOperator("add".to_string()));
        assert!("DIVIDE".parse::<OperatorKind>().is_err());
    }

    #[test]
    fn test_default_is_add() {
        assert_eq!(OperatorKind::default(), OperatorKind::Add);
    }

    #[test]
    fn test_apply() {
        assert_eq!(OperatorKind::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(OperatorKind::Multiply.apply(2.0, 3.0), 6.0);
        assert_eq!(OperatorKind::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(OperatorKind::Set.apply(2.0, 3.0), 3.0);
    }

    #[test]
    fn test_multiply_fold_seeds_with_first() {
        // Starting from 0 would zero the product; the seed is the first factor.
        assert_eq!(OperatorKind::Multiply.fold([2.0, 3.0, 4.0]), Some(24.0));
    }

    #[test]
    fn test_fold_empty() {
        assert_eq!(OperatorKind::Add.fold(std::iter::empty()), None);
    }

    fn factors() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-100.0f32..100.0, 1..8)
    }

    proptest! {
        #[test]
        fn prop_add_fold_is_sum(values in factors()) {
            let expected = values[1..].iter().fold(values[0], |acc, v| acc + v);
            prop_assert_eq!(OperatorKind::Add.fold(values.clone()), Some(expected));
        }

        #[test]
        fn prop_subtract_fold(values in factors()) {
            let expected = values[1..].iter().fold(values[0], |acc, v| acc - v);
            prop_assert_eq!(OperatorKind::Subtract.fold(values.clone()), Some(expected));
        }

        #[test]
        fn prop_multiply_fold_is_product(values in factors()) {
            let expected = values[1..].iter().fold(values[0], |acc, v| acc * v);
            prop_assert_eq!(OperatorKind::Multiply.fold(values.clone()), Some(expected));
        }

        #[test]
        fn prop_set_fold_is_last(values in factors()) {
            prop_assert_eq!(OperatorKind::Set.fold(values.clone()), values.last().copied());
        }
    }
}
