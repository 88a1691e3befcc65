//! Explain path
//!
//! Rare diagnostic call, so the owning segment is found by a plain linear
//! scan. Only the single `key_prefix` with weight 1.0 is reflected: in
//! multi-prefix mode the bare field value is looked up, and neither prefix
//! combination nor score functions show up in explanations.

use crate::extractor::read_value;
use crate::resolver::FactorResolver;
use rescore_core::{
    DocId, Explanation, FactorStore, IndexReader, RescoreConfig, RescoreError, RescoreResult,
};
use tracing::debug;

/// Explain the factor applied to top-level document `doc`
///
/// Returns a matching node carrying the resolved factor, or a non-matching
/// node if the document has no key field value. Either way `source` is the
/// single detail.
///
/// # Errors
///
/// Same conditions as extraction and resolution during `rescore`.
pub fn explain_doc(
    doc: DocId,
    reader: &dyn IndexReader,
    config: &RescoreConfig,
    store: &dyn FactorStore,
    source: Explanation,
) -> RescoreResult<Explanation> {
    let field = config.key_field();
    let leaf = reader
        .leaves()
        .into_iter()
        .find(|leaf| doc < leaf.end_doc())
        .ok_or_else(|| RescoreError::DocOutOfRange {
            doc,
            max_doc: reader.max_doc(),
        })?;

    let mut values = leaf.reader.doc_values(field);
    let value = read_value(values.as_mut(), doc - leaf.doc_base, doc, field)?;

    match value {
        Some(value) => {
            let factor =
                FactorResolver::new(store).resolve(&value, config.single_prefix(), 1.0, None)?;
            debug!(target: "rescore::explain", doc, factor, "explained document");
            Ok(Explanation::matched(factor, field, vec![source]))
        }
        None => Ok(Explanation::no_match(field, vec![source])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescore_core::OperatorKind;
    use rescore_storage::{InMemoryFactorStore, MemoryIndex, SegmentBuilder};

    fn index() -> MemoryIndex {
        MemoryIndex::new()
            .with_segment(
                SegmentBuilder::new()
                    .keyword_doc("productId", ["foo"])
                    .build()
                    .unwrap(),
            )
            .with_segment(
                SegmentBuilder::new()
                    .keyword_doc("productId", ["bar"])
                    .empty_doc()
                    .build()
                    .unwrap(),
            )
    }

    fn store() -> InMemoryFactorStore {
        [("s-foo", "4.0"), ("s-bar", "6.0"), ("a-bar", "2.0"), ("bar", "7.0")]
            .into_iter()
            .collect()
    }

    fn base() -> Explanation {
        Explanation::matched(1.5, "first pass", vec![])
    }

    #[test]
    fn test_explain_match_wraps_source() {
        let config = RescoreConfig::builder("productId")
            .with_key_prefix("s-")
            .build()
            .unwrap();
        let e = explain_doc(1, &index(), &config, &store(), base()).unwrap();
        assert!(e.matched);
        assert_eq!(e.value, 6.0);
        assert_eq!(e.description, "productId");
        assert_eq!(e.details, vec![base()]);
    }

    #[test]
    fn test_explain_no_value() {
        let config = RescoreConfig::builder("productId").build().unwrap();
        let e = explain_doc(2, &index(), &config, &store(), base()).unwrap();
        assert!(!e.matched);
        assert_eq!(e.details.len(), 1);
    }

    #[test]
    fn test_explain_ignores_weights_and_functions() {
        let config = RescoreConfig::builder("productId")
            .with_key_prefixes(["a-", "s-"])
            .with_score_operator(OperatorKind::Add)
            .with_score_weights([10.0, 10.0])
            .with_score_functions([Some("pow(_,2)"), None])
            .build()
            .unwrap();
        let e = explain_doc(1, &index(), &config, &store(), base()).unwrap();
        // bare value "bar", weight 1.0, no transform
        assert_eq!(e.value, 7.0);
    }

    #[test]
    fn test_explain_out_of_range() {
        let config = RescoreConfig::builder("productId").build().unwrap();
        let err = explain_doc(3, &index(), &config, &store(), base()).unwrap_err();
        assert!(matches!(err, RescoreError::DocOutOfRange { doc: 3, max_doc: 3 }));
    }
}
