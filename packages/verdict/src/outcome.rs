//! The canonical outcome type and its pure combinators.
//!
//! # Overview
//!
//! [`Outcome<T>`] is a tagged union with exactly two shapes: success with
//! a payload, or failure with a structured [`Failure`]. Exactly one of the
//! two payloads exists, always matching the tag — the wire codec enforces
//! this on the way in ([`MalformedOutcome`](crate::VerdictError) on
//! violation) and guarantees it on the way out.
//!
//! Outcomes are immutable values. Every combinator consumes its input and
//! produces a fresh outcome; nothing here is pooled, cached, or shared.
//!
//! # The Failure Boundary Rule
//!
//! > Failure payloads are structured errors, never bare strings.
//!
//! - [`Failure`] is the only failure payload inside the algebra
//! - `anyhow::Error` is the transport at the native boundary (convert with
//!   `Failure::from`)
//! - plain string messages exist only in the cross-boundary
//!   [`OutcomeLike`](crate::OutcomeLike) shape
//!
//! # Wire shape
//!
//! ```json
//! {"ok": true,  "value": 42}
//! {"ok": false, "error": {"message": "boom"}}
//! ```

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::classify::{self, Shape};
use crate::error::{MalformedReason, VerdictError};
use crate::resolve::MAX_RESOLVE_DEPTH;

/// Fixed message used when a failure is built from an absent payload.
pub const UNDEFINED_ERROR: &str = "undefined error";

// =============================================================================
// Failure
// =============================================================================

/// Structured failure payload carried by [`Outcome::Err`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl Failure {
    /// Create a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Best-effort extraction from an error payload that already sits in
    /// a failure-shaped value.
    ///
    /// A message-carrying object yields its message; a string yields
    /// itself; an absent payload yields [`UNDEFINED_ERROR`]; anything else
    /// yields its canonical JSON text.
    pub fn from_error_value(payload: &Value) -> Failure {
        match payload {
            Value::String(text) => Failure::new(text.clone()),
            Value::Object(map) => match map.get("message").and_then(Value::as_str) {
                Some(message) => Failure::new(message),
                None => Failure::new(payload.to_string()),
            },
            Value::Null => Failure::new(UNDEFINED_ERROR),
            other => Failure::new(other.to_string()),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Failure {}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the source chain in one line.
        Self {
            message: format!("{:#}", err),
        }
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// A two-variant outcome: success with a payload, or failure with a
/// structured error.
///
/// # Example
///
/// ```ignore
/// use verdict::{Failure, Outcome};
///
/// let doubled = Outcome::Ok(21).map(|n| n * 2);
/// assert_eq!(doubled, Outcome::Ok(42));
///
/// let recovered = Outcome::<i64>::Err(Failure::new("boom"))
///     .coalesce(|failure| failure.message.len() as i64, |n| n);
/// assert!(recovered.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation succeeded with a payload.
    Ok(T),
    /// The operation failed with a structured failure.
    Err(Failure),
}

impl<T> Outcome<T> {
    /// Build a success outcome.
    pub fn ok(value: T) -> Self {
        Outcome::Ok(value)
    }

    /// Build a failure outcome from anything message-like.
    pub fn err(failure: impl Into<Failure>) -> Self {
        Outcome::Err(failure.into())
    }

    /// Returns true for the success variant.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns true for the failure variant.
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// Apply `f` to a success payload and rewrap; pass failures through
    /// untouched.
    ///
    /// `f` must not itself produce an outcome — that case belongs to
    /// [`Outcome::map_flatten`]. Panics inside `f` propagate uncaught.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Err(failure) => Outcome::Err(failure),
        }
    }

    /// Apply `f` to a failure and rewrap; pass successes through
    /// untouched.
    pub fn map_err(self, f: impl FnOnce(Failure) -> Failure) -> Outcome<T> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(failure) => Outcome::Err(f(failure)),
        }
    }

    /// Apply exactly one of two functions depending on the variant. The
    /// variant category never changes.
    pub fn bimap<U>(
        self,
        on_err: impl FnOnce(Failure) -> Failure,
        on_ok: impl FnOnce(T) -> U,
    ) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(on_ok(value)),
            Outcome::Err(failure) => Outcome::Err(on_err(failure)),
        }
    }

    /// Fold both variants into a single success outcome: failures are
    /// recovered into values via `err_to_value`, never re-raised.
    ///
    /// For terminal consumers that want a single-variant return type.
    pub fn coalesce<U>(
        self,
        err_to_value: impl FnOnce(Failure) -> U,
        value_to_value: impl FnOnce(T) -> U,
    ) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value_to_value(value)),
            Outcome::Err(failure) => Outcome::Ok(err_to_value(failure)),
        }
    }

    /// Unwrap a success payload, or yield the supplied constant on
    /// failure. A success always wins; the fallback is ignored.
    pub fn value_or(self, default: T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => default,
        }
    }

    /// Unwrap a success payload, or compute a fallback from the failure.
    pub fn value_or_else(self, f: impl FnOnce(Failure) -> T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(failure) => f(failure),
        }
    }

    /// Case analysis: dispatch to one of two handlers depending on the
    /// variant, folding to an arbitrary type.
    pub fn cata<R>(self, on_err: impl FnOnce(Failure) -> R, on_ok: impl FnOnce(T) -> R) -> R {
        match self {
            Outcome::Ok(value) => on_ok(value),
            Outcome::Err(failure) => on_err(failure),
        }
    }

    /// The designated escape into `?`-based control flow: a success
    /// becomes `Ok`, a failure becomes `Err` carrying the [`Failure`].
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, Failure>> for Outcome<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(failure) => Outcome::Err(failure),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Failure> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}

// =============================================================================
// Dynamic entry points
// =============================================================================

impl Outcome<Value> {
    /// Strict parse of a candidate outcome value.
    ///
    /// This is the shared malformed-input guard for dynamic callers of the
    /// strict combinators: a value that passes the loose filter but lacks
    /// its complementary field fails fast, because structural corruption
    /// there is a programming defect upstream, not foreign noise.
    pub fn from_value(raw: &Value) -> Result<Outcome<Value>, VerdictError> {
        match Shape::of(raw) {
            Shape::Ok => {
                let value = raw.get("value").cloned().unwrap_or(Value::Null);
                Ok(Outcome::Ok(value))
            }
            Shape::Err => {
                let payload = raw.get("error").cloned().unwrap_or(Value::Null);
                Ok(Outcome::Err(Failure::from_error_value(&payload)))
            }
            Shape::Malformed(reason) => Err(VerdictError::MalformedOutcome { reason }),
            Shape::NotOutcome => Err(VerdictError::MalformedOutcome {
                reason: MalformedReason::MissingTag,
            }),
        }
    }

    /// Render back to the canonical wire shape.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Ok(value) => json!({ "ok": true, "value": value }),
            Outcome::Err(failure) => {
                json!({ "ok": false, "error": { "message": failure.message } })
            }
        }
    }

    /// Like [`Outcome::map`], but a mapped output that is itself
    /// outcome-shaped is adopted and flattened instead of double-wrapped.
    ///
    /// The mapping function is applied exactly once; any outcome layers it
    /// produced are then peeled until the success payload is no longer
    /// outcome-shaped. A nested failure becomes the result's failure.
    pub fn map_flatten<F>(self, f: F) -> Outcome<Value>
    where
        F: FnOnce(Value) -> Value,
    {
        let value = match self {
            Outcome::Err(failure) => return Outcome::Err(failure),
            Outcome::Ok(value) => value,
        };
        let mut mapped = f(value);
        for _ in 0..MAX_RESOLVE_DEPTH {
            if !classify::is_outcome_shaped(&mapped) {
                return Outcome::Ok(mapped);
            }
            match Outcome::from_value(&mapped) {
                Ok(Outcome::Ok(inner)) => mapped = inner,
                Ok(Outcome::Err(failure)) => return Outcome::Err(failure),
                // loosely shaped but malformed: a plain payload after all
                Err(_) => return Outcome::Ok(mapped),
            }
        }
        Outcome::Err(Failure::new(
            VerdictError::DepthExceeded {
                max: MAX_RESOLVE_DEPTH,
            }
            .to_string(),
        ))
    }
}

// =============================================================================
// Wire codec
// =============================================================================

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        match self {
            Outcome::Ok(value) => {
                let mut s = serializer.serialize_struct("Outcome", 2)?;
                s.serialize_field("ok", &true)?;
                s.serialize_field("value", value)?;
                s.end()
            }
            Outcome::Err(failure) => {
                let mut s = serializer.serialize_struct("Outcome", 2)?;
                s.serialize_field("ok", &false)?;
                s.serialize_field("error", failure)?;
                s.end()
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Outcome<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        match Outcome::from_value(&raw).map_err(D::Error::custom)? {
            Outcome::Ok(value) => T::deserialize(value)
                .map(Outcome::Ok)
                .map_err(D::Error::custom),
            Outcome::Err(failure) => Ok(Outcome::Err(failure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    // =========================================================================
    // Failure
    // =========================================================================

    #[test]
    fn test_failure_display_is_message() {
        let failure = Failure::new("boom");
        assert_eq!(failure.to_string(), "boom");
    }

    #[test]
    fn test_failure_from_anyhow_keeps_chain() {
        let err = anyhow!("root cause").context("while frobbing");
        let failure = Failure::from(err);
        assert!(failure.message.contains("while frobbing"));
        assert!(failure.message.contains("root cause"));
    }

    #[test]
    fn test_failure_from_error_value_table() {
        assert_eq!(
            Failure::from_error_value(&json!("boom")).message,
            "boom"
        );
        assert_eq!(
            Failure::from_error_value(&json!({"message": "x failed"})).message,
            "x failed"
        );
        assert_eq!(
            Failure::from_error_value(&json!({"code": 500})).message,
            r#"{"code":500}"#
        );
        assert_eq!(
            Failure::from_error_value(&Value::Null).message,
            UNDEFINED_ERROR
        );
        assert_eq!(Failure::from_error_value(&json!(7)).message, "7");
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    #[test]
    fn test_map_transforms_success() {
        let outcome = Outcome::Ok(21).map(|n| n * 2);
        assert_eq!(outcome, Outcome::Ok(42));
    }

    #[test]
    fn test_map_is_identity_on_failures() {
        let failure = Failure::new("boom");
        let outcome: Outcome<i64> = Outcome::Err(failure.clone());
        assert_eq!(outcome.map(|n| n * 2), Outcome::Err(failure));
    }

    #[test]
    fn test_map_composition_law() {
        let f = |n: i64| n + 1;
        let g = |n: i64| n * 3;

        let chained = Outcome::Ok(4).map(f).map(g);
        let composed = Outcome::Ok(4).map(|n| g(f(n)));
        assert_eq!(chained, composed);
    }

    #[test]
    fn test_map_err_transforms_failure_only() {
        let outcome: Outcome<i64> = Outcome::err("boom");
        let mapped = outcome.map_err(|f| Failure::new(format!("wrapped: {}", f.message)));
        assert_eq!(mapped, Outcome::Err(Failure::new("wrapped: boom")));

        let success = Outcome::Ok(1).map_err(|_| Failure::new("never"));
        assert_eq!(success, Outcome::Ok(1));
    }

    #[test]
    fn test_bimap_applies_exactly_one_side() {
        let ok = Outcome::Ok(2).bimap(|f| f, |n| n * 10);
        assert_eq!(ok, Outcome::Ok(20));

        let err: Outcome<i64> = Outcome::err("boom");
        let mapped = err.bimap(|f| Failure::new(f.message.to_uppercase()), |n| n);
        assert_eq!(mapped, Outcome::Err(Failure::new("BOOM")));
    }

    #[test]
    fn test_coalesce_folds_to_single_variant() {
        let recovered: Outcome<i64> =
            Outcome::<i64>::err("boom").coalesce(|f| f.message.len() as i64, |n| n);
        assert_eq!(recovered, Outcome::Ok(4));

        let passed = Outcome::Ok(7).coalesce(|_| 0, |n| n + 1);
        assert_eq!(passed, Outcome::Ok(8));
    }

    #[test]
    fn test_value_or_success_ignores_fallback() {
        assert_eq!(Outcome::Ok(5).value_or(99), 5);
        assert_eq!(Outcome::<i64>::err("boom").value_or(99), 99);
    }

    #[test]
    fn test_value_or_else_receives_the_failure() {
        let fallback = Outcome::<usize>::err("boom").value_or_else(|f| f.message.len());
        assert_eq!(fallback, 4);
        assert_eq!(Outcome::Ok(5).value_or_else(|_| 99), 5);
    }

    #[test]
    fn test_cata_folds_both_variants() {
        let on_ok = Outcome::Ok(3).cata(|_| "err".to_string(), |n| format!("ok {}", n));
        assert_eq!(on_ok, "ok 3");

        let on_err =
            Outcome::<i64>::err("boom").cata(|f| format!("err {}", f.message), |_| "ok".into());
        assert_eq!(on_err, "err boom");
    }

    #[test]
    fn test_into_result_escape_hatch() {
        assert_eq!(Outcome::Ok(1).into_result(), Ok(1));
        assert_eq!(
            Outcome::<i64>::err("boom").into_result(),
            Err(Failure::new("boom"))
        );
    }

    #[test]
    fn test_result_conversions_round_trip() {
        let outcome: Outcome<i64> = Ok(5).into();
        assert_eq!(outcome, Outcome::Ok(5));

        let back: Result<i64, Failure> = Outcome::Ok(5).into();
        assert_eq!(back, Ok(5));
    }

    // =========================================================================
    // Strict dynamic parse
    // =========================================================================

    #[test]
    fn test_from_value_parses_success() {
        let outcome = Outcome::from_value(&json!({"ok": true, "value": 42})).unwrap();
        assert_eq!(outcome, Outcome::Ok(json!(42)));
    }

    #[test]
    fn test_from_value_parses_failure_shapes() {
        let from_string = Outcome::from_value(&json!({"ok": false, "error": "boom"})).unwrap();
        assert_eq!(from_string, Outcome::Err(Failure::new("boom")));

        let from_object =
            Outcome::from_value(&json!({"ok": false, "error": {"message": "x failed"}})).unwrap();
        assert_eq!(from_object, Outcome::Err(Failure::new("x failed")));
    }

    #[test]
    fn test_from_value_rejects_missing_complement() {
        let missing_value = Outcome::from_value(&json!({"ok": true}));
        assert!(matches!(
            missing_value,
            Err(VerdictError::MalformedOutcome {
                reason: MalformedReason::MissingValue
            })
        ));

        let missing_error = Outcome::from_value(&json!({"ok": false}));
        assert!(matches!(
            missing_error,
            Err(VerdictError::MalformedOutcome {
                reason: MalformedReason::MissingError
            })
        ));
    }

    #[test]
    fn test_from_value_rejects_untagged_and_corrupt_tags() {
        assert!(matches!(
            Outcome::from_value(&json!({"value": 1})),
            Err(VerdictError::MalformedOutcome {
                reason: MalformedReason::MissingTag
            })
        ));
        assert!(matches!(
            Outcome::from_value(&json!({"ok": "yes", "value": 1})),
            Err(VerdictError::MalformedOutcome {
                reason: MalformedReason::NonBooleanTag
            })
        ));
    }

    #[test]
    fn test_into_value_round_trips_through_from_value() {
        let ok = Outcome::Ok(json!({"n": 1}));
        assert_eq!(Outcome::from_value(&ok.clone().into_value()).unwrap(), ok);

        let err: Outcome<Value> = Outcome::err("boom");
        assert_eq!(
            Outcome::from_value(&err.clone().into_value()).unwrap(),
            err
        );
    }

    // =========================================================================
    // map_flatten
    // =========================================================================

    #[test]
    fn test_map_flatten_plain_output_behaves_like_map() {
        let outcome = Outcome::Ok(json!(2)).map_flatten(|v| json!(v.as_i64().unwrap() * 2));
        assert_eq!(outcome, Outcome::Ok(json!(4)));
    }

    #[test]
    fn test_map_flatten_adopts_nested_outcome() {
        let outcome =
            Outcome::Ok(json!(1)).map_flatten(|_| json!({"ok": true, "value": "inner"}));
        assert_eq!(outcome, Outcome::Ok(json!("inner")));
    }

    #[test]
    fn test_map_flatten_never_leaves_outcome_shaped_success() {
        let outcome = Outcome::Ok(json!(1)).map_flatten(|_| {
            json!({"ok": true, "value": {"ok": true, "value": {"ok": true, "value": 9}}})
        });
        match outcome {
            Outcome::Ok(value) => {
                assert!(!classify::is_outcome_shaped(&value));
                assert_eq!(value, json!(9));
            }
            Outcome::Err(failure) => panic!("unexpected failure: {}", failure),
        }
    }

    #[test]
    fn test_map_flatten_surfaces_nested_failure() {
        let outcome =
            Outcome::Ok(json!(1)).map_flatten(|_| json!({"ok": false, "error": "inner boom"}));
        assert_eq!(outcome, Outcome::Err(Failure::new("inner boom")));
    }

    #[test]
    fn test_map_flatten_passes_failures_through() {
        let outcome = Outcome::<Value>::err("boom").map_flatten(|_| json!(1));
        assert_eq!(outcome, Outcome::Err(Failure::new("boom")));
    }

    #[test]
    fn test_map_flatten_keeps_malformed_output_as_payload() {
        // loosely shaped but missing the value field: a plain payload
        let outcome = Outcome::Ok(json!(1)).map_flatten(|_| json!({"ok": true, "tag": "x"}));
        assert_eq!(outcome, Outcome::Ok(json!({"ok": true, "tag": "x"})));
    }

    // =========================================================================
    // Wire codec
    // =========================================================================

    #[test]
    fn test_serialize_success_wire_shape() {
        let wire = serde_json::to_value(Outcome::Ok(42)).unwrap();
        assert_eq!(wire, json!({"ok": true, "value": 42}));
    }

    #[test]
    fn test_serialize_failure_wire_shape() {
        let wire = serde_json::to_value(Outcome::<i64>::err("boom")).unwrap();
        assert_eq!(wire, json!({"ok": false, "error": {"message": "boom"}}));
    }

    #[test]
    fn test_deserialize_both_variants() {
        let ok: Outcome<i64> = serde_json::from_value(json!({"ok": true, "value": 42})).unwrap();
        assert_eq!(ok, Outcome::Ok(42));

        let err: Outcome<i64> =
            serde_json::from_value(json!({"ok": false, "error": {"message": "boom"}})).unwrap();
        assert_eq!(err, Outcome::Err(Failure::new("boom")));
    }

    #[test]
    fn test_deserialize_accepts_string_error_payload() {
        let err: Outcome<i64> =
            serde_json::from_value(json!({"ok": false, "error": "boom"})).unwrap();
        assert_eq!(err, Outcome::Err(Failure::new("boom")));
    }

    #[test]
    fn test_deserialize_rejects_malformed_wire() {
        let missing_value = serde_json::from_value::<Outcome<i64>>(json!({"ok": true}));
        assert!(missing_value.is_err());
        assert!(missing_value
            .unwrap_err()
            .to_string()
            .contains("malformed outcome"));

        let bad_tag = serde_json::from_value::<Outcome<i64>>(json!({"ok": 1, "value": 2}));
        assert!(bad_tag.is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let original = Outcome::Ok(vec![1, 2, 3]);
        let wire = serde_json::to_string(&original).unwrap();
        let back: Outcome<Vec<i64>> = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, original);
    }
}
