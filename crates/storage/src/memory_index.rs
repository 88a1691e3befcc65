//! Segmented in-memory index
//!
//! Models the host engine's per-segment doc values closely enough for the
//! rescorer to run against it unchanged:
//!
//! - Keyword fields are stored as a sorted, deduplicated term dictionary per
//!   segment plus, per document, the sorted set of term ordinals.
//! - Long fields are stored as the sorted list of values per document.
//!
//! Segments are laid out back to back; a segment's `doc_base` is the sum of
//! `max_doc` of all segments before it.

use rescore_core::{
    DocId, DocValues, IndexReader, LeafContext, LeafReader, SortedNumericDocValues,
    SortedSetDocValues,
};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Errors raised while assembling a segment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexBuildError {
    /// One field was given keyword values in one document and longs in another
    #[error("field [{field}] mixes keyword and long values")]
    FieldTypeConflict {
        /// Field name
        field: String,
    },
}

/// Values of one field in one document
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    /// String terms
    Keyword(Vec<String>),
    /// Numeric values
    Long(Vec<i64>),
}

// ============================================================================
// Columns
// ============================================================================

#[derive(Debug, Clone)]
enum Column {
    Keyword {
        terms: Vec<String>,
        doc_ords: Vec<Vec<u64>>,
    },
    Long {
        doc_values: Vec<Vec<i64>>,
    },
}

// ============================================================================
// Segment
// ============================================================================

/// Builder for a single segment; documents get consecutive local ids from 0
#[derive(Debug, Clone, Default)]
pub struct SegmentBuilder {
    docs: Vec<Vec<(String, FieldValues)>>,
}

impl SegmentBuilder {
    /// Create an empty segment builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with arbitrary fields
    pub fn doc<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldValues)>,
        S: Into<String>,
    {
        self.docs
            .push(fields.into_iter().map(|(f, v)| (f.into(), v)).collect());
        self
    }

    /// Add a document with one keyword field
    pub fn keyword_doc<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.doc([(field, FieldValues::Keyword(values))])
    }

    /// Add a document with one long field
    pub fn long_doc(self, field: &str, values: impl IntoIterator<Item = i64>) -> Self {
        self.doc([(field, FieldValues::Long(values.into_iter().collect()))])
    }

    /// Add a document without any field
    pub fn empty_doc(mut self) -> Self {
        self.docs.push(Vec::new());
        self
    }

    /// Encode the columns
    ///
    /// # Errors
    ///
    /// Returns [`IndexBuildError::FieldTypeConflict`] if a field is keyword
    /// in one document and long in another.
    pub fn build(self) -> Result<MemorySegment, IndexBuildError> {
        let max_doc = self.docs.len();
        let mut keyword: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        let mut long: HashMap<String, Vec<Vec<i64>>> = HashMap::new();

        for (doc, fields) in self.docs.into_iter().enumerate() {
            for (field, values) in fields {
                match values {
                    FieldValues::Keyword(terms) => {
                        if long.contains_key(&field) {
                            return Err(IndexBuildError::FieldTypeConflict { field });
                        }
                        let column = keyword
                            .entry(field)
                            .or_insert_with(|| vec![Vec::new(); max_doc]);
                        column[doc].extend(terms);
                    }
                    FieldValues::Long(values) => {
                        if keyword.contains_key(&field) {
                            return Err(IndexBuildError::FieldTypeConflict { field });
                        }
                        let column = long
                            .entry(field)
                            .or_insert_with(|| vec![Vec::new(); max_doc]);
                        column[doc].extend(values);
                    }
                }
            }
        }

        let mut columns = HashMap::new();
        for (field, per_doc) in keyword {
            columns.insert(field, encode_keyword(per_doc));
        }
        for (field, mut doc_values) in long {
            for values in &mut doc_values {
                values.sort_unstable();
            }
            columns.insert(field, Column::Long { doc_values });
        }

        Ok(MemorySegment {
            max_doc: max_doc as DocId,
            columns,
        })
    }
}

fn encode_keyword(per_doc: Vec<Vec<String>>) -> Column {
    let terms: Vec<String> = per_doc
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let doc_ords = per_doc
        .iter()
        .map(|values| {
            let ords: BTreeSet<u64> = values
                .iter()
                .filter_map(|v| terms.binary_search(v).ok())
                .map(|ord| ord as u64)
                .collect();
            ords.into_iter().collect()
        })
        .collect();

    Column::Keyword { terms, doc_ords }
}

/// An immutable segment
#[derive(Debug, Clone)]
pub struct MemorySegment {
    max_doc: DocId,
    columns: HashMap<String, Column>,
}

impl LeafReader for MemorySegment {
    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn doc_values(&self, field: &str) -> Option<DocValues<'_>> {
        match self.columns.get(field)? {
            Column::Keyword { terms, doc_ords } => {
                Some(DocValues::SortedSet(Box::new(MemorySortedSet {
                    terms,
                    doc_ords,
                    current: None,
                    pos: 0,
                })))
            }
            Column::Long { doc_values } => {
                Some(DocValues::SortedNumeric(Box::new(MemorySortedNumeric {
                    doc_values,
                    current: None,
                    pos: 0,
                })))
            }
        }
    }
}

// ============================================================================
// Cursors
// ============================================================================

struct MemorySortedSet<'a> {
    terms: &'a [String],
    doc_ords: &'a [Vec<u64>],
    current: Option<usize>,
    pos: usize,
}

impl SortedSetDocValues for MemorySortedSet<'_> {
    fn advance_exact(&mut self, doc: DocId) -> bool {
        let doc = doc as usize;
        debug_assert!(self.current.map_or(true, |c| c <= doc), "cursor moved backwards");
        self.current = Some(doc);
        self.pos = 0;
        self.doc_ords.get(doc).map_or(false, |ords| !ords.is_empty())
    }

    fn next_ord(&mut self) -> Option<u64> {
        let ords = self.doc_ords.get(self.current?)?;
        let ord = ords.get(self.pos).copied()?;
        self.pos += 1;
        Some(ord)
    }

    fn lookup_ord(&self, ord: u64) -> Option<&str> {
        self.terms.get(ord as usize).map(String::as_str)
    }
}

struct MemorySortedNumeric<'a> {
    doc_values: &'a [Vec<i64>],
    current: Option<usize>,
    pos: usize,
}

impl SortedNumericDocValues for MemorySortedNumeric<'_> {
    fn advance_exact(&mut self, doc: DocId) -> bool {
        let doc = doc as usize;
        debug_assert!(self.current.map_or(true, |c| c <= doc), "cursor moved backwards");
        self.current = Some(doc);
        self.pos = 0;
        self.doc_values.get(doc).map_or(false, |v| !v.is_empty())
    }

    fn doc_value_count(&self) -> usize {
        self.current
            .and_then(|doc| self.doc_values.get(doc))
            .map_or(0, Vec::len)
    }

    fn next_value(&mut self) -> Option<i64> {
        let values = self.doc_values.get(self.current?)?;
        let value = values.get(self.pos).copied()?;
        self.pos += 1;
        Some(value)
    }
}

// ============================================================================
// Index
// ============================================================================

/// Ordered collection of segments
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    segments: Vec<MemorySegment>,
    doc_bases: Vec<DocId>,
}

impl MemoryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment after all existing ones
    pub fn push_segment(&mut self, segment: MemorySegment) {
        let base = self.max_doc_total();
        self.doc_bases.push(base);
        self.segments.push(segment);
    }

    /// Builder: append a segment
    pub fn with_segment(mut self, segment: MemorySegment) -> Self {
        self.push_segment(segment);
        self
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn max_doc_total(&self) -> DocId {
        match (self.doc_bases.last(), self.segments.last()) {
            (Some(base), Some(seg)) => base + seg.max_doc,
            _ => 0,
        }
    }
}

impl IndexReader for MemoryIndex {
    fn leaves(&self) -> Vec<LeafContext<'_>> {
        self.segments
            .iter()
            .zip(&self.doc_bases)
            .map(|(segment, &doc_base)| LeafContext {
                doc_base,
                reader: segment as &dyn LeafReader,
            })
            .collect()
    }

    fn max_doc(&self) -> DocId {
        self.max_doc_total()
    }
}
