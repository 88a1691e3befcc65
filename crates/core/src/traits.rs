//! Collaborator traits
//!
//! The rescorer talks to two things it does not own: the external factor
//! store and the host engine's segmented index. Both sit behind traits so
//! concrete clients and in-memory doubles can be swapped freely.
//!
//! Thread safety: stores and readers must be safe to share across
//! concurrent rescore invocations (requires Send + Sync). Doc-values cursors
//! are per-invocation and only need to be used from one thread.

use crate::error::StoreError;
use crate::types::DocId;

// ============================================================================
// FactorStore
// ============================================================================

/// Opaque synchronous key → string lookup
///
/// One call per (document, prefix) pair inside the window. No batching or
/// caching is expected from callers. Implementations decide their own
/// timeouts; a blocking implementation blocks the rescore.
pub trait FactorStore: Send + Sync {
    /// Fetch the raw value stored under `key`
    ///
    /// Returns `Ok(None)` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself failed.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

// ============================================================================
// Index access
// ============================================================================

/// A segment together with where its documents start in the index
#[derive(Clone, Copy)]
pub struct LeafContext<'a> {
    /// Top-level id of the segment's first document
    pub doc_base: DocId,
    /// The segment
    pub reader: &'a dyn LeafReader,
}

impl<'a> LeafContext<'a> {
    /// One past the last top-level doc id in this segment
    pub fn end_doc(&self) -> DocId {
        self.doc_base + self.reader.max_doc()
    }
}

/// Point-in-time view over all segments of an index
pub trait IndexReader: Send + Sync {
    /// Segments in increasing `doc_base` order
    fn leaves(&self) -> Vec<LeafContext<'_>>;

    /// Total documents across all segments
    fn max_doc(&self) -> DocId {
        self.leaves().last().map(|leaf| leaf.end_doc()).unwrap_or(0)
    }
}

/// A single segment
pub trait LeafReader: Send + Sync {
    /// Number of documents in the segment
    fn max_doc(&self) -> DocId;

    /// Per-document values for `field`, or `None` if the segment has none
    fn doc_values(&self, field: &str) -> Option<DocValues<'_>>;
}

/// Doc values of a field, by storage kind
pub enum DocValues<'a> {
    /// Keyword-like field: per-document sets of term ordinals
    SortedSet(Box<dyn SortedSetDocValues + 'a>),
    /// Numeric field: per-document sorted longs
    SortedNumeric(Box<dyn SortedNumericDocValues + 'a>),
}

/// Forward-only cursor over a keyword field
///
/// Segment-local doc ids passed to `advance_exact` must not decrease.
pub trait SortedSetDocValues {
    /// Position on `doc`; returns whether it has at least one value
    fn advance_exact(&mut self, doc: DocId) -> bool;

    /// Next ordinal of the current document, lowest first
    fn next_ord(&mut self) -> Option<u64>;

    /// Term for an ordinal
    fn lookup_ord(&self, ord: u64) -> Option<&str>;
}

/// Forward-only cursor over a numeric field
///
/// Segment-local doc ids passed to `advance_exact` must not decrease.
pub trait SortedNumericDocValues {
    /// Position on `doc`; returns whether it has at least one value
    fn advance_exact(&mut self, doc: DocId) -> bool;

    /// Number of values of the current document
    fn doc_value_count(&self) -> usize;

    /// Next value of the current document, smallest first
    fn next_value(&mut self) -> Option<i64>;
}
