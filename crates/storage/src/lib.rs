//! Storage layer for factor rescoring
//!
//! This crate implements the collaborators the rescorer reads from:
//! - InMemoryFactorStore: DashMap-backed key → factor string store
//! - MemoryIndex: segmented index with keyword (sorted-set ordinals) and
//!   long (sorted-numeric) doc values
//!
//! Both are complete implementations of the `rescore-core` traits and are
//! what the engine tests run against.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod factor_store;
pub mod memory_index;

pub use factor_store::InMemoryFactorStore;
pub use memory_index::{FieldValues, IndexBuildError, MemoryIndex, MemorySegment, SegmentBuilder};
