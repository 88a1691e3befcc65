//! Rescoring engine
//!
//! This crate provides:
//! - Expression parser and function registry for score functions
//! - FactorResolver: store lookup, neutral defaults, transform, weighting
//! - FieldValueExtractor: forward-only key field reads across segments
//! - Rescorer trait and FactorRescorer orchestration
//! - Explain path for diagnostics
//!
//! # Usage
//!
//! ```ignore
//! use rescore_engine::{FactorRescorer, Rescorer};
//!
//! let rescorer = FactorRescorer::new(config, store);
//! let results = rescorer.rescore(results, window_size, &reader)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod explain;
pub mod expr;
pub mod extractor;
pub mod rescorer;
pub mod resolver;

// Re-export commonly used types
pub use explain::explain_doc;
pub use expr::{ParsedFunction, ScoreFunction};
pub use extractor::FieldValueExtractor;
pub use rescorer::{sort_results, FactorRescorer, Rescorer};
pub use resolver::{full_key, FactorResolver, NEUTRAL_FACTOR};
