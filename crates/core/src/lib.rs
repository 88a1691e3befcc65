//! Core types and traits for factor rescoring
//!
//! This crate defines the foundational types used throughout the system:
//! - DocId / ScoredResult: the result list handed over by the host engine
//! - OperatorKind: ADD / MULTIPLY / SUBTRACT / SET
//! - RescoreConfig: validated rescorer definition
//! - Explanation: diagnostic score tree
//! - Error: error type hierarchy
//! - Traits: collaborator seams (FactorStore, IndexReader, LeafReader, doc values)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod operator;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use config::{KeyPrefixes, RescoreConfig, RescoreConfigBuilder, RescoreOptions, NO_FUNCTION};
pub use error::{ConfigError, ExpressionError, RescoreError, RescoreResult, StoreError};
pub use operator::OperatorKind;
pub use traits::{
    DocValues, FactorStore, IndexReader, LeafContext, LeafReader, SortedNumericDocValues,
    SortedSetDocValues,
};
pub use types::{DocId, Explanation, ScoredResult};
