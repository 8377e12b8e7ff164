//! Permissive construction at the trust boundary.
//!
//! Everything in this module accepts input the algebra does not control:
//! decoded foreign JSON, or a native error crossing over from a fallible
//! operation. [`RawValue`] keeps those two cases explicit, so "is this an
//! error?" is a variant test instead of runtime type inspection.
//!
//! The failure constructor is driven by [`ErrorCoercion`], an enumerated
//! decision table: one row per payload kind, each row exhaustively
//! testable.

use serde_json::Value;

use crate::error::VerdictError;
use crate::outcome::{Failure, Outcome, UNDEFINED_ERROR};

/// A value arriving at the algebra boundary.
#[derive(Debug)]
pub enum RawValue {
    /// Decoded JSON handed over by a foreign runtime or wire boundary.
    Json(Value),
    /// A native error crossing into the algebra.
    Error(anyhow::Error),
}

impl RawValue {
    /// Wrap a JSON payload.
    pub fn json(value: impl Into<Value>) -> Self {
        RawValue::Json(value.into())
    }

    /// Wrap a native error.
    pub fn error(err: impl Into<anyhow::Error>) -> Self {
        RawValue::Error(err.into())
    }

    /// Returns true for the native-error variant.
    pub fn is_error(&self) -> bool {
        matches!(self, RawValue::Error(_))
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        RawValue::Json(value)
    }
}

impl From<anyhow::Error> for RawValue {
    fn from(err: anyhow::Error) -> Self {
        RawValue::Error(err)
    }
}

/// JSON type name, for diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Error coercion table
// =============================================================================

/// How a raw payload is coerced into a failure message.
///
/// One row per input kind. [`ErrorCoercion::classify`] picks the row;
/// [`Failure::coerce`] applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCoercion {
    /// Native error: its message is kept unchanged.
    Native,
    /// JSON string: the message is the string itself.
    Text,
    /// JSON number: the message is the decimal rendering.
    Numeric,
    /// JSON object or array: the message is the canonical JSON text.
    Structural,
    /// JSON null: the fixed [`UNDEFINED_ERROR`] message.
    Absent,
    /// JSON boolean: not coercible, construction fails.
    Unsupported,
}

impl ErrorCoercion {
    /// Pick the coercion row for a raw payload.
    pub fn classify(raw: &RawValue) -> ErrorCoercion {
        match raw {
            RawValue::Error(_) => ErrorCoercion::Native,
            RawValue::Json(Value::String(_)) => ErrorCoercion::Text,
            RawValue::Json(Value::Number(_)) => ErrorCoercion::Numeric,
            RawValue::Json(Value::Object(_)) | RawValue::Json(Value::Array(_)) => {
                ErrorCoercion::Structural
            }
            RawValue::Json(Value::Null) => ErrorCoercion::Absent,
            RawValue::Json(Value::Bool(_)) => ErrorCoercion::Unsupported,
        }
    }
}

impl Failure {
    /// The failure constructor for boundary input.
    ///
    /// Applies the [`ErrorCoercion`] table. The only rejected row is a
    /// boolean payload, which carries no usable message.
    pub fn coerce(raw: RawValue) -> Result<Failure, VerdictError> {
        match raw {
            RawValue::Error(err) => Ok(Failure::from(err)),
            RawValue::Json(Value::String(text)) => Ok(Failure::new(text)),
            RawValue::Json(Value::Number(n)) => Ok(Failure::new(n.to_string())),
            RawValue::Json(value @ Value::Object(_)) | RawValue::Json(value @ Value::Array(_)) => {
                Ok(Failure::new(value.to_string()))
            }
            RawValue::Json(Value::Null) => Ok(Failure::new(UNDEFINED_ERROR)),
            RawValue::Json(value @ Value::Bool(_)) => Err(VerdictError::UnsupportedErrorPayload {
                type_name: json_type_name(&value),
            }),
        }
    }
}

// =============================================================================
// Boundary constructors
// =============================================================================

impl Outcome<Value> {
    /// Build a success outcome from boundary input.
    ///
    /// A native error fails fast: success values cannot be errors.
    pub fn try_ok(raw: RawValue) -> Result<Outcome<Value>, VerdictError> {
        match raw {
            RawValue::Error(_) => Err(VerdictError::ErrorAsSuccess),
            RawValue::Json(value) => Ok(Outcome::Ok(value)),
        }
    }

    /// Single-step lift from a maybe-failing boundary value: a native
    /// error becomes a failure, anything else a success.
    pub fn accept(raw: RawValue) -> Outcome<Value> {
        match raw {
            RawValue::Error(err) => Outcome::Err(Failure::from(err)),
            RawValue::Json(value) => Outcome::Ok(value),
        }
    }

    /// The most permissive constructor: produce a canonical outcome from
    /// anything.
    ///
    /// Decision order:
    /// 1. explicit `"ok": true` → success with the contained value
    /// 2. explicit `"ok": false` with a string or message-carrying error →
    ///    failure wrapping that message
    /// 3. native error → failure
    /// 4. object with an `"error"` key → failure coerced from that key
    /// 5. object with a `"value"` key → success from that key
    /// 6. anything else → success wrapping the input unchanged
    pub fn normalize(raw: RawValue) -> Outcome<Value> {
        let value = match raw {
            RawValue::Error(err) => return Outcome::Err(Failure::from(err)),
            RawValue::Json(value) => value,
        };

        if let Value::Object(map) = &value {
            match map.get("ok") {
                Some(Value::Bool(true)) => {
                    return Outcome::Ok(map.get("value").cloned().unwrap_or(Value::Null));
                }
                Some(Value::Bool(false)) => {
                    if let Some(message) = map.get("error").and_then(message_of) {
                        return Outcome::Err(Failure::new(message));
                    }
                }
                _ => {}
            }
            if let Some(err) = map.get("error") {
                let failure = Failure::coerce(RawValue::Json(err.clone()))
                    .unwrap_or_else(|_| Failure::new(err.to_string()));
                return Outcome::Err(failure);
            }
            if let Some(v) = map.get("value") {
                return Outcome::Ok(v.clone());
            }
        }

        Outcome::Ok(value)
    }
}

/// A plain string message, or the `message` field of an error object.
fn message_of(err: &Value) -> Option<String> {
    match err {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => map.get("message").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}
