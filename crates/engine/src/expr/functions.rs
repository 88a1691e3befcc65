//! Registry of score functions
//!
//! A fixed, immutable table. Functions take numeric arguments and return
//! the transformed factor. Arithmetic runs in `f64` and is narrowed to the
//! score type at the end, so `pow` matches the platform power function for
//! negative bases and fractional exponents without special cases.

use super::parser::ParsedFunction;
use rescore_core::ExpressionError;

/// A registered function
#[derive(Debug, Clone, Copy)]
pub struct ScoreFunction {
    /// Name used in expressions
    pub name: &'static str,
    /// Exact number of arguments
    pub arity: usize,
    eval: fn(&[f64]) -> f64,
}

fn pow(args: &[f64]) -> f64 {
    args[0].powf(args[1])
}

/// All known functions
pub static REGISTRY: &[ScoreFunction] = &[ScoreFunction {
    name: "pow",
    arity: 2,
    eval: pow,
}];

/// Find a function by name
pub fn lookup(name: &str) -> Option<&'static ScoreFunction> {
    REGISTRY.iter().find(|f| f.name == name)
}

/// Evaluate a parsed call
///
/// # Errors
///
/// - [`ExpressionError::UnknownFunction`] if the name is not registered
/// - [`ExpressionError::Argument`] on wrong arity or non-numeric arguments
pub fn evaluate(call: &ParsedFunction) -> Result<f32, ExpressionError> {
    let function =
        lookup(&call.name).ok_or_else(|| ExpressionError::UnknownFunction(call.name.clone()))?;

    if call.args.len() != function.arity {
        return Err(ExpressionError::Argument {
            function: call.name.clone(),
            reason: format!(
                "expected {} arguments, got {}",
                function.arity,
                call.args.len()
            ),
        });
    }

    let args = call
        .args
        .iter()
        .map(|arg| {
            arg.trim()
                .parse::<f32>()
                .map(f64::from)
                .map_err(|_| ExpressionError::Argument {
                    function: call.name.clone(),
                    reason: format!("'{}' is not a number", arg),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok((function.eval)(&args) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[&str]) -> ParsedFunction {
        ParsedFunction {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_pow() {
        assert_eq!(evaluate(&call("pow", &["3.0", "2"])).unwrap(), 9.0);
        let root = evaluate(&call("pow", &["2", "0.5"])).unwrap();
        assert!((root - std::f32::consts::SQRT_2).abs() < 1e-6);
        assert_eq!(evaluate(&call("pow", &["-2", "3"])).unwrap(), -8.0);
    }

    #[test]
    fn test_pow_negative_base_fractional_exponent_is_nan() {
        assert!(evaluate(&call("pow", &["-8", "0.5"])).unwrap().is_nan());
    }

    #[test]
    fn test_unknown_function() {
        let err = evaluate(&call("sqrt", &["4"])).unwrap_err();
        assert_eq!(err, ExpressionError::UnknownFunction("sqrt".to_string()));
    }

    #[test]
    fn test_wrong_arity() {
        let err = evaluate(&call("pow", &["4"])).unwrap_err();
        assert!(matches!(err, ExpressionError::Argument { .. }));
    }

    #[test]
    fn test_non_numeric_argument() {
        let err = evaluate(&call("pow", &["x", "2"])).unwrap_err();
        match err {
            ExpressionError::Argument { function, reason } => {
                assert_eq!(function, "pow");
                assert!(reason.contains("'x'"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_lookup() {
        assert!(lookup("pow").is_some());
        assert!(lookup("POW").is_none());
    }
}
