//! Factor resolution
//!
//! Turns a lookup key into a weighted factor:
//!
//! ```text
//! prefix + key ──get──▶ raw string ──parse──▶ factor ──[score function]──▶ × weight
//! ```
//!
//! A miss or an unparsable value yields the neutral factor `1.0` and the
//! request carries on. The score function receives the raw factor; the
//! weight is applied exactly once, after any transform.

use crate::expr;
use rescore_core::{FactorStore, RescoreError, RescoreResult, NO_FUNCTION};
use tracing::{debug, warn};

/// Factor used when nothing usable is stored for a key
pub const NEUTRAL_FACTOR: f32 = 1.0;

/// Key sent to the store: plain concatenation, no delimiter
pub fn full_key(key: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{}{}", prefix, key),
        None => key.to_string(),
    }
}

/// Resolves factors against an injected store
#[derive(Clone, Copy)]
pub struct FactorResolver<'a> {
    store: &'a dyn FactorStore,
}

impl<'a> FactorResolver<'a> {
    /// Create a resolver reading from `store`
    pub fn new(store: &'a dyn FactorStore) -> Self {
        FactorResolver { store }
    }

    /// Raw factor stored under `prefix + key`, or the neutral factor
    ///
    /// # Errors
    ///
    /// Only a failing store is an error.
    pub fn raw_factor(&self, key: &str, prefix: Option<&str>) -> RescoreResult<f32> {
        let full_key = full_key(key, prefix);
        let Some(value) = self.store.get(&full_key)? else {
            debug!(target: "rescore::resolver", key = %full_key, "factor missing, using neutral factor");
            return Ok(NEUTRAL_FACTOR);
        };

        match value.trim().parse::<f32>() {
            Ok(factor) => Ok(factor),
            Err(_) => {
                warn!(
                    target: "rescore::resolver",
                    key = %full_key,
                    value = %value,
                    "stored factor is not a number, using neutral factor"
                );
                Ok(NEUTRAL_FACTOR)
            }
        }
    }

    /// Weighted, optionally transformed factor for `prefix + key`
    ///
    /// `score_function` of `None` or `"null"` means no transform.
    ///
    /// # Errors
    ///
    /// - [`RescoreError::ScoreFunction`] if the function cannot be parsed or evaluated
    /// - [`RescoreError::Store`] if the store fails
    pub fn resolve(
        &self,
        key: &str,
        prefix: Option<&str>,
        weight: f32,
        score_function: Option<&str>,
    ) -> RescoreResult<f32> {
        let factor = self.raw_factor(key, prefix)?;

        let transformed = match score_function.filter(|f| *f != NO_FUNCTION) {
            None => factor,
            Some(expression) => {
                // `{:?}` keeps the fractional part ("3.0"), which is what
                // users write in expressions.
                let replacement = format!("{:?}", factor);
                expr::apply(expression, &replacement).map_err(|source| {
                    RescoreError::ScoreFunction {
                        expression: expression.to_string(),
                        source,
                    }
                })?
            }
        };

        Ok(transformed * weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescore_core::{ExpressionError, StoreError};
    use rescore_storage::InMemoryFactorStore;

    struct DownStore;

    impl FactorStore for DownStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Connection("connection refused".to_string()))
        }
    }

    fn store() -> InMemoryFactorStore {
        [
            ("mystore-foo", "4.0"),
            ("foo", "2.5"),
            ("mystore-three", "3.0"),
            ("mystore-junk", "not-a-number"),
            ("mystore-padded", " 7.5 "),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_full_key() {
        assert_eq!(full_key("foo", Some("mystore-")), "mystore-foo");
        assert_eq!(full_key("foo", None), "foo");
        assert_eq!(full_key("foo", Some("")), "foo");
    }

    #[test]
    fn test_resolve_without_function_is_factor_times_weight() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        assert_eq!(resolver.resolve("foo", Some("mystore-"), 1.0, None).unwrap(), 4.0);
        assert_eq!(resolver.resolve("foo", Some("mystore-"), 0.5, None).unwrap(), 2.0);
        assert_eq!(resolver.resolve("foo", None, 2.0, None).unwrap(), 5.0);
    }

    #[test]
    fn test_missing_key_is_neutral() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        assert_eq!(resolver.resolve("baz", Some("mystore-"), 1.0, None).unwrap(), 1.0);
        assert_eq!(resolver.resolve("baz", None, 1.0, None).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_key_is_still_weighted() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        assert_eq!(resolver.resolve("baz", None, 3.0, None).unwrap(), 3.0);
    }

    #[test]
    fn test_unparsable_value_is_neutral() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        assert_eq!(resolver.raw_factor("junk", Some("mystore-")).unwrap(), 1.0);
    }

    #[test]
    fn test_value_is_trimmed() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        assert_eq!(resolver.raw_factor("padded", Some("mystore-")).unwrap(), 7.5);
    }

    #[test]
    fn test_function_receives_raw_factor() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        let f = resolver
            .resolve("three", Some("mystore-"), 1.0, Some("pow(_,2)"))
            .unwrap();
        assert_eq!(f, 9.0);

        // (3^2) * 2, not (3*2)^2
        let f = resolver
            .resolve("three", Some("mystore-"), 2.0, Some("pow(_,2)"))
            .unwrap();
        assert_eq!(f, 18.0);
    }

    #[test]
    fn test_null_sentinel_means_no_function() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        let f = resolver
            .resolve("three", Some("mystore-"), 1.0, Some("null"))
            .unwrap();
        assert_eq!(f, 3.0);
    }

    #[test]
    fn test_function_applies_to_neutral_factor_on_miss() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        let f = resolver.resolve("baz", None, 1.0, Some("pow(2,_)")).unwrap();
        assert_eq!(f, 2.0);
    }

    #[test]
    fn test_bad_function_names_expression() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        let err = resolver
            .resolve("three", Some("mystore-"), 1.0, Some("pow(_,2"))
            .unwrap_err();
        match err {
            RescoreError::ScoreFunction { expression, .. } => assert_eq!(expression, "pow(_,2"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_function_is_error() {
        let store = store();
        let resolver = FactorResolver::new(&store);
        let err = resolver
            .resolve("three", Some("mystore-"), 1.0, Some("sqrt(_)"))
            .unwrap_err();
        assert!(matches!(
            err,
            RescoreError::ScoreFunction {
                source: ExpressionError::UnknownFunction(_),
                ..
            }
        ));
    }

    #[test]
    fn test_store_failure_propagates() {
        let resolver = FactorResolver::new(&DownStore);
        let err = resolver.resolve("foo", None, 1.0, None).unwrap_err();
        assert!(matches!(err, RescoreError::Store(_)));
    }
}
