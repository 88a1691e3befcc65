//! Error types for factor rescoring
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Lookup misses and unparsable stored factors are not errors: the resolver
//! absorbs them into a neutral factor. Everything here is surfaced to the caller.

use crate::types::DocId;
use thiserror::Error;

/// Result type alias for rescore operations
pub type RescoreResult<T> = std::result::Result<T, RescoreError>;

/// Top-level error returned by `rescore` and `explain`
#[derive(Debug, Error)]
pub enum RescoreError {
    /// The rescorer definition was rejected at build time
    #[error("Invalid rescore configuration: {0}")]
    Config(#[from] ConfigError),

    /// A numeric key field has no value for a document in the window
    #[error("document [{doc}] does not have the field [{field}]")]
    MissingField {
        /// Top-level document id
        doc: DocId,
        /// Configured key field
        field: String,
    },

    /// A numeric key field has more than one value for a document
    #[error("document [{doc}] has more than one value for [{field}]")]
    MultiValuedField {
        /// Top-level document id
        doc: DocId,
        /// Configured key field
        field: String,
    },

    /// A configured score function could not be parsed or evaluated
    #[error("Bad function body: {expression}: {source}")]
    ScoreFunction {
        /// The offending expression, as written in the configuration
        expression: String,
        /// What went wrong
        #[source]
        source: ExpressionError,
    },

    /// The external factor store failed (not a miss)
    #[error("Factor store error: {0}")]
    Store(#[from] StoreError),

    /// A document id is beyond the last segment of the index
    #[error("document [{doc}] is out of range (max doc {max_doc})")]
    DocOutOfRange {
        /// Top-level document id
        doc: DocId,
        /// Total documents across all segments
        max_doc: DocId,
    },
}

/// Configuration validation and loading errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Two mutually exclusive options were both set
    #[error("only one of the following fields may be set: '{first}', '{second}'")]
    PrefixesOverlap {
        /// First option name
        first: &'static str,
        /// Second option name
        second: &'static str,
    },

    /// Operator outside of ADD, MULTIPLY, SUBTRACT, SET
    #[error("wrong type operator: {0}")]
    InvalidOperator(String),

    /// `key_field` is empty
    #[error("[key_field] must be set")]
    MissingKeyField,

    /// Malformed JSON or TOML option body
    #[error("failed to parse rescore options: {0}")]
    Parse(String),

    /// Configuration file could not be read
    #[error("failed to read config file '{path}': {message}")]
    Io {
        /// File path as given
        path: String,
        /// Underlying I/O error message
        message: String,
    },
}

/// Errors from parsing or evaluating a score function expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Expression does not have the `name(args)` shape
    #[error("cannot parse '{expression}': {reason}")]
    Parse {
        /// Input expression
        expression: String,
        /// What is wrong with it
        reason: String,
    },

    /// Function name is not in the registry
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Arguments do not fit the function's signature
    #[error("bad arguments for '{function}': {reason}")]
    Argument {
        /// Function name
        function: String,
        /// What is wrong with the arguments
        reason: String,
    },
}

/// Failure of the external key-value store itself
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("connection failed: {0}")]
    Connection(String),

    /// The store answered with something other than a value or a miss
    #[error("unexpected reply: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_prefixes_overlap() {
        let err = ConfigError::PrefixesOverlap {
            first: "key_prefix",
            second: "key_prefixes",
        };
        let msg = err.to_string();
        assert!(msg.contains("'key_prefix'"));
        assert!(msg.contains("'key_prefixes'"));
    }

    #[test]
    fn test_error_display_invalid_operator() {
        let err = RescoreError::from(ConfigError::InvalidOperator("DIVIDE".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("Invalid rescore configuration"));
        assert!(msg.contains("wrong type operator: DIVIDE"));
    }

    #[test]
    fn test_error_display_missing_field() {
        let err = RescoreError::MissingField {
            doc: 7,
            field: "productId".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "document [7] does not have the field [productId]"
        );
    }

    #[test]
    fn test_error_display_multi_valued_field() {
        let err = RescoreError::MultiValuedField {
            doc: 3,
            field: "sku".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "document [3] has more than one value for [sku]"
        );
    }

    #[test]
    fn test_score_function_error_names_expression() {
        let err = RescoreError::ScoreFunction {
            expression: "sqrt(_)".to_string(),
            source: ExpressionError::UnknownFunction("sqrt".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("sqrt(_)"));
        assert!(msg.contains("unknown function 'sqrt'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_store_error_converts() {
        let err: RescoreError = StoreError::Connection("refused".to_string()).into();
        assert!(matches!(err, RescoreError::Store(_)));
        assert!(err.to_string().contains("refused"));
    }
}
