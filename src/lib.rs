//! Factor rescoring
//!
//! Re-ranks the top results of a search by blending each result's score with
//! numeric factors looked up in an external key-value store, keyed by a
//! document field value.
//!
//! # Quick Start
//!
//! ```ignore
//! use factor_rescore::{FactorRescorer, InMemoryFactorStore, RescoreConfig, Rescorer};
//! use std::sync::Arc;
//!
//! let config = RescoreConfig::from_json(r#"{"key_field": "productId", "key_prefix": "mystore-"}"#)?;
//! let store = InMemoryFactorStore::new();
//! store.put("mystore-foo", "4.0");
//!
//! let rescorer = FactorRescorer::new(Arc::new(config), Arc::new(store));
//! let results = rescorer.rescore(results, 10, &index)?;
//! ```
//!
//! # Architecture
//!
//! - `rescore-core`: configuration, errors, shared types, collaborator traits
//! - `rescore-storage`: in-memory factor store and segmented index
//! - `rescore-engine`: expression functions, resolver, extractor, rescorer

pub use rescore_core::*;
pub use rescore_engine::*;
pub use rescore_storage::*;
