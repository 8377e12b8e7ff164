//! Structural classification of foreign outcome shapes.
//!
//! Classification is two-tier:
//!
//! 1. **Loose filter** — [`is_outcome_shaped`] and friends are duck-typed
//!    presence checks, cheap enough to guard every other facet. Passing
//!    them proves nothing beyond "worth a closer look".
//! 2. **Strict shape check** — [`Shape::of`] classifies exhaustively and
//!    names exactly how a loose-passing value is corrupt. The strict
//!    combinators and the wire deserializer go through this tier.
//!
//! All predicates are pure and side-effect free. They inspect structure
//! only; a legitimate payload that happens to share the field names will
//! match (see the resolver docs for where that matters).

use serde_json::Value;

use crate::error::MalformedReason;

/// Loose duck test: an object with a present, non-null `ok` key.
///
/// This is a fast filter, not a validity check. Use [`Shape::of`] before
/// trusting the value.
pub fn is_outcome_shaped(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.get("ok").is_some_and(|tag| !tag.is_null()))
}

/// The tag claims success and the `value` field is present.
pub fn is_ok_shaped(value: &Value) -> bool {
    matches!(
        value,
        Value::Object(map)
            if map.get("ok") == Some(&Value::Bool(true)) && map.contains_key("value")
    )
}

/// The tag claims failure and the `error` field is present.
pub fn is_err_shaped(value: &Value) -> bool {
    matches!(
        value,
        Value::Object(map)
            if map.get("ok") == Some(&Value::Bool(false)) && map.contains_key("error")
    )
}

/// The string parses as a JSON object.
///
/// Primitives and arrays do not count: an encoded outcome is always an
/// object, and treating `"42"` as an encoding would swallow legitimate
/// string payloads.
pub fn is_json_encoded(text: &str) -> bool {
    serde_json::from_str::<Value>(text)
        .map(|parsed| parsed.is_object())
        .unwrap_or(false)
}

/// Foreign-shaped success: tag and `value` field both present.
///
/// Structurally indistinguishable from the canonical success shape; the
/// difference between the two families lives on the failure side.
pub fn is_outcome_like_ok(value: &Value) -> bool {
    is_ok_shaped(value)
}

/// Foreign-shaped failure: tag present and the `error` payload is a plain
/// string message (only a message survives transport).
pub fn is_outcome_like_err(value: &Value) -> bool {
    matches!(
        value,
        Value::Object(map)
            if map.get("ok") == Some(&Value::Bool(false))
                && map.get("error").is_some_and(Value::is_string)
    )
}

/// Foreign-shaped success whose payload is itself a JSON-encoded string:
/// one more unwrap step is pending.
pub fn is_outcome_like_ok_with_encoded_value(value: &Value) -> bool {
    is_outcome_like_ok(value)
        && value
            .get("value")
            .and_then(Value::as_str)
            .is_some_and(is_json_encoded)
}

/// Foreign-shaped failure whose message is itself a JSON-encoded string:
/// one more unwrap step is pending.
pub fn is_outcome_like_err_with_encoded_value(value: &Value) -> bool {
    is_outcome_like_err(value)
        && value
            .get("error")
            .and_then(Value::as_str)
            .is_some_and(is_json_encoded)
}

/// Strict shape classification of a candidate outcome value.
///
/// Exhaustive: every value falls into exactly one variant, so callers can
/// pattern-match without a fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Well-formed success: boolean `true` tag plus `value` field.
    Ok,
    /// Well-formed failure: boolean `false` tag plus `error` field.
    Err,
    /// Passed the loose filter but violates the strict shape.
    Malformed(MalformedReason),
    /// Not an outcome at all (no tag, or not an object).
    NotOutcome,
}

impl Shape {
    /// Classify a value.
    pub fn of(value: &Value) -> Shape {
        let Value::Object(map) = value else {
            return Shape::NotOutcome;
        };
        match map.get("ok") {
            None | Some(Value::Null) => Shape::NotOutcome,
            Some(Value::Bool(true)) => {
                if map.contains_key("value") {
                    Shape::Ok
                } else {
                    Shape::Malformed(MalformedReason::MissingValue)
                }
            }
            Some(Value::Bool(false)) => {
                if map.contains_key("error") {
                    Shape::Err
                } else {
                    Shape::Malformed(MalformedReason::MissingError)
                }
            }
            Some(_) => Shape::Malformed(MalformedReason::NonBooleanTag),
        }
    }

    /// Returns true for either well-formed variant.
    pub fn is_well_formed(&self) -> bool {
        matches!(self, Shape::Ok | Shape::Err)
    }
}
