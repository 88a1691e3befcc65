//! Key field value extraction
//!
//! Reads the configured key field for a document out of the segment's doc
//! values. Documents are expected in increasing doc id order, which is the
//! order they sit in on disk: the extractor walks segments forward and keeps
//! one forward-only cursor per segment. A lower doc id than the last one read
//! reopens the cursor instead of moving it backwards.
//!
//! Keyword fields: a document without a value yields `None`; with several
//! values the lowest-ordinal term is used.
//! Numeric fields: a document must have exactly one value.

use rescore_core::{
    DocId, DocValues, IndexReader, LeafContext, LeafReader, RescoreError, RescoreResult,
};
use std::vec::IntoIter;

/// Read the key field value of segment-local `local_doc` from `values`
///
/// `doc` is the top-level id, used in error messages only.
pub(crate) fn read_value(
    values: Option<&mut DocValues<'_>>,
    local_doc: DocId,
    doc: DocId,
    field: &str,
) -> RescoreResult<Option<String>> {
    match values {
        // Segment has no values for the field at all
        None => Ok(None),
        Some(DocValues::SortedSet(dv)) => {
            if !dv.advance_exact(local_doc) {
                return Ok(None);
            }
            Ok(dv
                .next_ord()
                .and_then(|ord| dv.lookup_ord(ord))
                .map(str::to_string))
        }
        Some(DocValues::SortedNumeric(dv)) => {
            if !dv.advance_exact(local_doc) {
                return Err(RescoreError::MissingField {
                    doc,
                    field: field.to_string(),
                });
            }
            if dv.doc_value_count() > 1 {
                return Err(RescoreError::MultiValuedField {
                    doc,
                    field: field.to_string(),
                });
            }
            match dv.next_value() {
                Some(value) => Ok(Some(value.to_string())),
                None => Err(RescoreError::MissingField {
                    doc,
                    field: field.to_string(),
                }),
            }
        }
    }
}

struct LeafCursor<'r> {
    reader: &'r dyn LeafReader,
    doc_base: DocId,
    end_doc: DocId,
    values: Option<DocValues<'r>>,
    // Segment-local doc the cursor was last advanced to
    last_doc: Option<DocId>,
}

/// Forward-walking field value reader over an index
pub struct FieldValueExtractor<'r> {
    reader: &'r dyn IndexReader,
    field: &'r str,
    leaves: IntoIter<LeafContext<'r>>,
    current: Option<LeafCursor<'r>>,
}

impl<'r> FieldValueExtractor<'r> {
    /// Create an extractor for `field` positioned before the first segment
    pub fn new(reader: &'r dyn IndexReader, field: &'r str) -> Self {
        FieldValueExtractor {
            reader,
            field,
            leaves: reader.leaves().into_iter(),
            current: None,
        }
    }

    /// Key field value of top-level document `doc`
    ///
    /// # Errors
    ///
    /// - [`RescoreError::DocOutOfRange`] if `doc` is past the last segment
    /// - [`RescoreError::MissingField`] / [`RescoreError::MultiValuedField`]
    ///   for numeric fields without exactly one value
    pub fn extract(&mut self, doc: DocId) -> RescoreResult<Option<String>> {
        let needs_move = match &self.current {
            Some(leaf) => doc < leaf.doc_base || doc >= leaf.end_doc,
            None => true,
        };
        if needs_move {
            self.seek(doc)?;
        }

        let field = self.field;
        if let Some(leaf) = self.current.as_mut() {
            let local_doc = doc - leaf.doc_base;
            if leaf.last_doc.map_or(false, |last| local_doc < last) {
                let reader = leaf.reader;
                leaf.values = reader.doc_values(field);
            }
            leaf.last_doc = Some(local_doc);
            return read_value(leaf.values.as_mut(), local_doc, doc, field);
        }
        Err(self.out_of_range(doc))
    }

    fn seek(&mut self, doc: DocId) -> RescoreResult<()> {
        // Out-of-order input: restart rather than read backwards
        if matches!(&self.current, Some(leaf) if doc < leaf.doc_base) {
            self.leaves = self.reader.leaves().into_iter();
        }

        for leaf in self.leaves.by_ref() {
            if doc < leaf.end_doc() {
                self.current = Some(LeafCursor {
                    reader: leaf.reader,
                    doc_base: leaf.doc_base,
                    end_doc: leaf.end_doc(),
                    values: leaf.reader.doc_values(self.field),
                    last_doc: None,
                });
                return Ok(());
            }
        }

        self.current = None;
        Err(self.out_of_range(doc))
    }

    fn out_of_range(&self, doc: DocId) -> RescoreError {
        RescoreError::DocOutOfRange {
            doc,
            max_doc: self.reader.max_doc(),
        }
    }
}
