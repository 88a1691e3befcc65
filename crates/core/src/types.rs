//! Shared value types
//!
//! - DocId: top-level document ordinal across all segments
//! - ScoredResult: one entry of the caller-owned result list
//! - Explanation: diagnostic tree returned by `explain`

use std::fmt;

/// Top-level document ordinal (segment `doc_base` + segment-local id)
pub type DocId = u32;

// ============================================================================
// ScoredResult
// ============================================================================

/// A search hit as handed to the rescorer by the host engine
///
/// The rescorer rewrites `score` in place and reorders the list, but never
/// changes `doc`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResult {
    /// Top-level document id
    pub doc: DocId,
    /// Relevance score
    pub score: f32,
}

impl ScoredResult {
    /// Create a new result
    pub fn new(doc: DocId, score: f32) -> Self {
        ScoredResult { doc, score }
    }
}

impl From<(DocId, f32)> for ScoredResult {
    fn from((doc, score): (DocId, f32)) -> Self {
        ScoredResult::new(doc, score)
    }
}

// ============================================================================
// Explanation
// ============================================================================

/// Score explanation node
///
/// Mirrors the host engine's explanation trees: a value, a human readable
/// description and nested details. A non-matching node carries value `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Whether the node contributed to the score
    pub matched: bool,
    /// Contributed value
    pub value: f32,
    /// What the value is
    pub description: String,
    /// Child explanations
    pub details: Vec<Explanation>,
}

impl Explanation {
    /// A node that contributed `value`
    pub fn matched(value: f32, description: impl Into<String>, details: Vec<Explanation>) -> Self {
        Explanation {
            matched: true,
            value,
            description: description.into(),
            details,
        }
    }

    /// A node that did not contribute
    pub fn no_match(description: impl Into<String>, details: Vec<Explanation>) -> Self {
        Explanation {
            matched: false,
            value: 0.0,
            description: description.into(),
            details,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let marker = if self.matched { "" } else { "no match: " };
        writeln!(
            f,
            "{:indent$}{} = {}{}",
            "",
            self.value,
            marker,
            self.description,
            indent = depth * 2
        )?;
        for detail in &self.details {
            detail.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
