//! Score function expression parser
//!
//! Grammar is a single flat call: `name(arg1,arg2,...)`. No nesting, quoting
//! or escaping. Every `_` inside the argument list is replaced by the
//! injected value as it is scanned, so `pow(_,2)` with `3.0` becomes
//! `pow` with arguments `["3.0", "2"]`.

use rescore_core::ExpressionError;

/// Placeholder substituted with the raw factor
pub const PLACEHOLDER: char = '_';

/// A parsed call, placeholders already substituted
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFunction {
    /// Function name
    pub name: String,
    /// Arguments in order, whitespace-trimmed
    pub args: Vec<String>,
}

fn parse_error(expression: &str, reason: &str) -> ExpressionError {
    ExpressionError::Parse {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse `expression`, substituting `replacement` for each `_`
///
/// # Errors
///
/// Returns [`ExpressionError::Parse`] if the expression is empty, has no
/// `(`, has no function name, is not closed by `)`, or has trailing input
/// after the closing parenthesis.
pub fn parse(expression: &str, replacement: &str) -> Result<ParsedFunction, ExpressionError> {
    if expression.trim().is_empty() {
        return Err(parse_error(expression, "empty expression"));
    }

    let mut chars = expression.chars();
    let mut name = String::new();
    let mut opened = false;
    for c in chars.by_ref() {
        if c == '(' {
            opened = true;
            break;
        }
        name.push(c);
    }
    if !opened {
        return Err(parse_error(expression, "missing '('"));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(parse_error(expression, "missing function name"));
    }

    let mut args = Vec::new();
    let mut token = String::new();
    let mut closed = false;
    for c in chars.by_ref() {
        match c {
            ',' => args.push(std::mem::take(&mut token)),
            ')' => {
                args.push(std::mem::take(&mut token));
                closed = true;
                break;
            }
            PLACEHOLDER => token.push_str(replacement),
            other => token.push(other),
        }
    }
    if !closed {
        return Err(parse_error(expression, "missing ')'"));
    }
    if chars.any(|c| !c.is_whitespace()) {
        return Err(parse_error(expression, "unexpected input after ')'"));
    }

    let mut args: Vec<String> = args.into_iter().map(|a| a.trim().to_string()).collect();
    // `name()` has no arguments rather than one empty one
    if args.len() == 1 && args[0].is_empty() {
        args.clear();
    }

    Ok(ParsedFunction {
        name: name.to_string(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_substitutes_placeholder() {
        let f = parse("pow(_,2)", "3.0").unwrap();
        assert_eq!(f.name, "pow");
        assert_eq!(f.args, vec!["3.0", "2"]);
    }

    #[test]
    fn test_parse_placeholder_in_any_position() {
        let f = parse("pow(2,_)", "0.5").unwrap();
        assert_eq!(f.args, vec!["2", "0.5"]);
    }

    #[test]
    fn test_parse_placeholder_inside_token() {
        let f = parse("pow(-_,3)", "2.0").unwrap();
        assert_eq!(f.args, vec!["-2.0", "3"]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let f = parse("  pow ( _ , 2 ) ", "1.5").unwrap();
        assert_eq!(f.name, "pow");
        assert_eq!(f.args, vec!["1.5", "2"]);
    }

    #[test]
    fn test_parse_no_args() {
        let f = parse("now()", "1.0").unwrap();
        assert_eq!(f.name, "now");
        assert!(f.args.is_empty());
    }

    #[test]
    fn test_parse_keeps_empty_args_between_commas() {
        let f = parse("f(,)", "1.0").unwrap();
        assert_eq!(f.args, vec!["", ""]);
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(matches!(parse("", "1.0"), Err(ExpressionError::Parse { .. })));
        assert!(matches!(parse("   ", "1.0"), Err(ExpressionError::Parse { .. })));
    }

    #[test]
    fn test_parse_without_paren_fails() {
        let err = parse("pow", "1.0").unwrap_err();
        match err {
            ExpressionError::Parse { expression, reason } => {
                assert_eq!(expression, "pow");
                assert!(reason.contains("'('"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unclosed_fails() {
        assert!(parse("pow(_,2", "1.0").is_err());
    }

    #[test]
    fn test_parse_missing_name_fails() {
        assert!(parse("(_,2)", "1.0").is_err());
    }

    #[test]
    fn test_parse_trailing_input_fails() {
        assert!(parse("pow(_,2)x", "1.0").is_err());
        assert!(parse("pow(_,2)  ", "1.0").is_ok());
    }

    #[test]
    fn test_nested_parens_are_not_calls() {
        // The first ')' closes the call and leaves ",2)" dangling.
        assert!(parse("pow(pow(_,2),2)", "3.0").is_err());
    }
}
