//! Score function expressions
//!
//! A configured score function such as `pow(_,2)` is parsed with the raw
//! factor injected for `_` and then evaluated against the fixed registry.

pub mod functions;
pub mod parser;

pub use functions::{evaluate, lookup, ScoreFunction, REGISTRY};
pub use parser::{parse, ParsedFunction, PLACEHOLDER};

use rescore_core::ExpressionError;

/// Parse `expression` with `replacement` injected and evaluate it
pub fn apply(expression: &str, replacement: &str) -> Result<f32, ExpressionError> {
    let call = parse(expression, replacement)?;
    evaluate(&call)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_pow() {
        assert_eq!(apply("pow(_,2)", "3.0").unwrap(), 9.0);
    }

    #[test]
    fn test_apply_propagates_parse_error() {
        assert!(matches!(
            apply("pow", "3.0"),
            Err(ExpressionError::Parse { .. })
        ));
    }

    #[test]
    fn test_apply_unknown_function_fails_loudly() {
        assert!(matches!(
            apply("log(_)", "3.0"),
            Err(ExpressionError::UnknownFunction(_))
        ));
    }
}
