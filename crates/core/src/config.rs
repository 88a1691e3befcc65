//! Rescorer definition
//!
//! A `RescoreConfig` is built once per query definition, validated at that
//! point and immutable afterwards. It can be built in code through
//! [`RescoreConfig::builder`] or parsed from the rescorer's option body:
//!
//! ```json
//! {
//!   "key_field": "productId",
//!   "key_prefixes": ["popularity-", "margin-"],
//!   "score_operator": "MULTIPLY",
//!   "boost_operator": "ADD",
//!   "boost_weight": 1.0,
//!   "score_weights": [1.0, 0.5],
//!   "score_functions": ["pow(_,2)", "null"]
//! }
//! ```
//!
//! `key_prefix` and `key_prefixes` are mutually exclusive.

use crate::error::ConfigError;
use crate::operator::OperatorKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sentinel accepted in `score_functions` meaning "no transform"
pub const NO_FUNCTION: &str = "null";

/// Factor used when a weight index is not configured
pub const DEFAULT_WEIGHT: f32 = 1.0;

// ============================================================================
// Option body
// ============================================================================

/// Rescorer options exactly as they appear in a query body
///
/// Operators stay strings here so that an unknown operator surfaces as
/// [`ConfigError::InvalidOperator`] rather than a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RescoreOptions {
    /// Field whose value forms the lookup key
    pub key_field: String,
    /// Single prefix prepended to the field value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
    /// Several prefixes, one factor lookup each
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefixes: Option<Vec<Option<String>>>,
    /// Combines the factors of several prefixes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_operator: Option<String>,
    /// Blends the combined factor into the score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_operator: Option<String>,
    /// Multiplier applied to the original score before blending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_weight: Option<f32>,
    /// Per-prefix weights, by index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_weights: Option<Vec<Option<f32>>>,
    /// Per-prefix transform expressions, by index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_functions: Option<Vec<Option<String>>>,
}

// ============================================================================
// KeyPrefixes
// ============================================================================

/// How lookup keys are formed from the field value
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPrefixes {
    /// One lookup, optionally prefixed
    Single(Option<String>),
    /// One lookup per prefix, combined with the score operator
    Multi(Vec<Option<String>>),
}

// ============================================================================
// RescoreConfig
// ============================================================================

/// Validated, immutable rescorer definition
#[derive(Debug, Clone, PartialEq)]
pub struct RescoreConfig {
    key_field: String,
    prefixes: KeyPrefixes,
    score_operator: OperatorKind,
    boost_operator: OperatorKind,
    boost_weight: f32,
    score_weights: Vec<Option<f32>>,
    score_functions: Vec<Option<String>>,
}

impl RescoreConfig {
    /// Start building a definition for `key_field`
    pub fn builder(key_field: impl Into<String>) -> RescoreConfigBuilder {
        RescoreConfigBuilder::new(key_field)
    }

    /// Validate an option body
    pub fn from_options(options: RescoreOptions) -> Result<Self, ConfigError> {
        let mut builder = RescoreConfigBuilder::new(options.key_field);
        builder.key_prefix = options.key_prefix;
        builder.key_prefixes = options.key_prefixes;
        if let Some(op) = options.score_operator {
            builder.score_operator = op.parse()?;
        }
        if let Some(op) = options.boost_operator {
            builder.boost_operator = op.parse()?;
        }
        if let Some(weight) = options.boost_weight {
            builder.boost_weight = weight;
        }
        builder.score_weights = options.score_weights.unwrap_or_default();
        builder.score_functions = options.score_functions.unwrap_or_default();
        builder.build()
    }

    /// Parse and validate a JSON option body
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: RescoreOptions =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_options(options)
    }

    /// Parse and validate a TOML option body
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: RescoreOptions =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_options(options)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Option body equivalent to this definition
    pub fn to_options(&self) -> RescoreOptions {
        let (key_prefix, key_prefixes) = match &self.prefixes {
            KeyPrefixes::Single(prefix) => (prefix.clone(), None),
            KeyPrefixes::Multi(prefixes) => (None, Some(prefixes.clone())),
        };
        RescoreOptions {
            key_field: self.key_field.clone(),
            key_prefix,
            key_prefixes,
            score_operator: Some(self.score_operator.to_string()),
            boost_operator: Some(self.boost_operator.to_string()),
            boost_weight: Some(self.boost_weight),
            score_weights: (!self.score_weights.is_empty()).then(|| self.score_weights.clone()),
            score_functions: (!self.score_functions.is_empty())
                .then(|| self.score_functions.clone()),
        }
    }

    /// Serialize back to a JSON option body
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.to_options()).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Field whose value forms the lookup key
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Prefix mode
    pub fn prefixes(&self) -> &KeyPrefixes {
        &self.prefixes
    }

    /// The single `key_prefix`; `None` in multi-prefix mode
    pub fn single_prefix(&self) -> Option<&str> {
        match &self.prefixes {
            KeyPrefixes::Single(prefix) => prefix.as_deref(),
            KeyPrefixes::Multi(_) => None,
        }
    }

    /// Operator combining per-prefix factors
    pub fn score_operator(&self) -> OperatorKind {
        self.score_operator
    }

    /// Operator blending the combined factor into the score
    pub fn boost_operator(&self) -> OperatorKind {
        self.boost_operator
    }

    /// Multiplier applied to the original score before blending
    pub fn boost_weight(&self) -> f32 {
        self.boost_weight
    }

    /// Weight for prefix `index`, defaulting to 1.0
    pub fn weight_at(&self, index: usize) -> f32 {
        self.score_weights
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// Transform for prefix `index`, if any
    ///
    /// Both a missing entry and the `"null"` sentinel mean no transform.
    pub fn function_at(&self, index: usize) -> Option<&str> {
        self.score_functions
            .get(index)
            .and_then(|f| f.as_deref())
            .filter(|f| *f != NO_FUNCTION)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for [`RescoreConfig`]; validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct RescoreConfigBuilder {
    key_field: String,
    key_prefix: Option<String>,
    key_prefixes: Option<Vec<Option<String>>>,
    score_operator: OperatorKind,
    boost_operator: OperatorKind,
    boost_weight: f32,
    score_weights: Vec<Option<f32>>,
    score_functions: Vec<Option<String>>,
}

impl RescoreConfigBuilder {
    fn new(key_field: impl Into<String>) -> Self {
        RescoreConfigBuilder {
            key_field: key_field.into(),
            key_prefix: None,
            key_prefixes: None,
            score_operator: OperatorKind::Add,
            boost_operator: OperatorKind::Add,
            boost_weight: 1.0,
            score_weights: Vec::new(),
            score_functions: Vec::new(),
        }
    }

    /// Builder: set the single key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Builder: set several key prefixes
    pub fn with_key_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_prefixes = Some(prefixes.into_iter().map(|p| Some(p.into())).collect());
        self
    }

    /// Builder: set the score operator
    pub fn with_score_operator(mut self, op: OperatorKind) -> Self {
        self.score_operator = op;
        self
    }

    /// Builder: set the boost operator
    pub fn with_boost_operator(mut self, op: OperatorKind) -> Self {
        self.boost_operator = op;
        self
    }

    /// Builder: set the boost weight
    pub fn with_boost_weight(mut self, weight: f32) -> Self {
        self.boost_weight = weight;
        self
    }

    /// Builder: set per-prefix weights
    pub fn with_score_weights(mut self, weights: impl IntoIterator<Item = f32>) -> Self {
        self.score_weights = weights.into_iter().map(Some).collect();
        self
    }

    /// Builder: set per-prefix transforms (`None` or `"null"` for no transform)
    pub fn with_score_functions<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.score_functions = functions.into_iter().map(|f| f.map(Into::into)).collect();
        self
    }

    /// Validate and freeze
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingKeyField`] if the key field is empty
    /// - [`ConfigError::PrefixesOverlap`] if both prefix options are set
    pub fn build(self) -> Result<RescoreConfig, ConfigError> {
        if self.key_field.is_empty() {
            return Err(ConfigError::MissingKeyField);
        }

        // An empty list carries no prefixes at all
        let key_prefixes = self.key_prefixes.filter(|p| !p.is_empty());

        let prefixes = match (self.key_prefix, key_prefixes) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::PrefixesOverlap {
                    first: "key_prefix",
                    second: "key_prefixes",
                })
            }
            (prefix, None) => KeyPrefixes::Single(prefix),
            (None, Some(prefixes)) => KeyPrefixes::Multi(prefixes),
        };

        Ok(RescoreConfig {
            key_field: self.key_field,
            prefixes,
            score_operator: self.score_operator,
            boost_operator: self.boost_operator,
            boost_weight: self.boost_weight,
            score_weights: self.score_weights,
            score_functions: self.score_functions,
        })
    }
}
