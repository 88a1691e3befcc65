//! Rescore orchestration
//!
//! For each of the top `window_size` results:
//!
//! ```text
//! doc ──extract──▶ field value ──resolve per prefix──▶ factors
//!     ──score_operator fold──▶ combined factor
//!     score × boost_weight ──boost_operator── combined factor ──▶ new score
//! ```
//!
//! Then the whole list (window or not) is sorted by score descending, doc
//! id ascending. The pass is synchronous and single-threaded; one rescorer
//! can serve concurrent invocations because it only holds shared state.

use crate::explain::explain_doc;
use crate::extractor::FieldValueExtractor;
use crate::resolver::FactorResolver;
use rescore_core::{
    DocId, Explanation, FactorStore, IndexReader, KeyPrefixes, RescoreConfig, RescoreResult,
    ScoredResult,
};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Rescorer Trait
// ============================================================================

/// Second-pass scoring interface
///
/// # Thread Safety
///
/// Rescorers must be Send + Sync so the host engine can run them for
/// independent queries and shards concurrently.
pub trait Rescorer: Send + Sync {
    /// Rescore the top `window_size` results and return the re-sorted list
    fn rescore(
        &self,
        results: Vec<ScoredResult>,
        window_size: usize,
        reader: &dyn IndexReader,
    ) -> RescoreResult<Vec<ScoredResult>>;

    /// Explain how `doc` was rescored, wrapping the first-pass explanation
    fn explain(
        &self,
        doc: DocId,
        reader: &dyn IndexReader,
        source: Explanation,
    ) -> RescoreResult<Explanation>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// Ordering
// ============================================================================

/// Descending score; NaN after every number; -0.0 equals 0.0
fn score_order(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Sort by score descending, then doc id ascending
pub fn sort_results(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| score_order(a.score, b.score).then_with(|| a.doc.cmp(&b.doc)));
}

// ============================================================================
// FactorRescorer
// ============================================================================

/// Rescorer blending externally stored factors into scores
pub struct FactorRescorer {
    config: Arc<RescoreConfig>,
    store: Arc<dyn FactorStore>,
}

impl FactorRescorer {
    /// Name under which the rescorer is registered
    pub const NAME: &'static str = "factor";

    /// Create a rescorer for `config` reading factors from `store`
    pub fn new(config: Arc<RescoreConfig>, store: Arc<dyn FactorStore>) -> Self {
        FactorRescorer { config, store }
    }

    /// The rescorer definition
    pub fn config(&self) -> &RescoreConfig {
        &self.config
    }

    /// Combined factor for one field value, across all configured prefixes
    pub fn combined_factor(&self, resolver: &FactorResolver<'_>, value: &str) -> RescoreResult<f32> {
        let config = &*self.config;
        match config.prefixes() {
            KeyPrefixes::Single(prefix) => {
                resolver.resolve(value, prefix.as_deref(), config.weight_at(0), None)
            }
            KeyPrefixes::Multi(prefixes) => {
                let factors = prefixes
                    .iter()
                    .enumerate()
                    .map(|(i, prefix)| {
                        resolver.resolve(
                            value,
                            prefix.as_deref(),
                            config.weight_at(i),
                            config.function_at(i),
                        )
                    })
                    .collect::<RescoreResult<Vec<f32>>>()?;
                // Seeded with the first factor; the operator runs from the second on
                Ok(config.score_operator().fold(factors).unwrap_or(0.0))
            }
        }
    }
}

impl Rescorer for FactorRescorer {
    fn rescore(
        &self,
        mut results: Vec<ScoredResult>,
        window_size: usize,
        reader: &dyn IndexReader,
    ) -> RescoreResult<Vec<ScoredResult>> {
        let end = results.len().min(window_size);
        let config = &*self.config;

        // Visit the window in doc id order so segment cursors only move forward
        let window = &mut results[..end];
        window.sort_by_key(|r| r.doc);

        let resolver = FactorResolver::new(&*self.store);
        let mut extractor = FieldValueExtractor::new(reader, config.key_field());
        let mut matched = 0usize;

        for result in window.iter_mut() {
            let factor = match extractor.extract(result.doc)? {
                Some(value) => {
                    matched += 1;
                    self.combined_factor(&resolver, &value)?
                }
                None => 0.0,
            };
            result.score *= config.boost_weight();
            result.score = config.boost_operator().apply(result.score, factor);
        }

        sort_results(&mut results);

        debug!(
            target: "rescore::rescorer",
            window = end,
            matched,
            total = results.len(),
            "rescored window"
        );
        Ok(results)
    }

    fn explain(
        &self,
        doc: DocId,
        reader: &dyn IndexReader,
        source: Explanation,
    ) -> RescoreResult<Explanation> {
        explain_doc(doc, reader, &self.config, &*self.store, source)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
