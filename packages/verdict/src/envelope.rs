//! Foreign envelope shapes the resolver knows how to peel.
//!
//! An envelope is any wrapping layer standing between a caller and the
//! terminal payload: a JSON-encoded string, an outcome nested inside
//! another outcome, or one of the richer execution-context objects
//! produced by API-call and thunk dispatch. The set is closed —
//! [`EnvelopeKind`] enumerates every layer the resolver will remove.
//!
//! Detection is structural: a value that deserializes into a context
//! shape *is* that context, even if it was a legitimate payload that
//! happened to share the field names. Callers who need to transport such
//! payloads must wrap them one level deeper.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::outcome::{Failure, Outcome};

// =============================================================================
// OutcomeLike
// =============================================================================

/// Cross-boundary outcome whose failure payload is a plain string.
///
/// Used where a foreign runtime or serialized transport cannot carry a
/// structured [`Failure`] — only the message survives. Converts
/// losslessly into [`Outcome`]; the reverse direction keeps the message
/// and drops nothing else, because there is nothing else.
///
/// Wire shape: `{"ok":true,"value":…}` / `{"ok":false,"error":"…"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeLike<T> {
    /// Success with a payload.
    Ok(T),
    /// Failure carrying only a message.
    Err(String),
}

impl<T> OutcomeLike<T> {
    /// Returns true for the success variant.
    pub fn is_ok(&self) -> bool {
        matches!(self, OutcomeLike::Ok(_))
    }

    /// Returns true for the failure variant.
    pub fn is_err(&self) -> bool {
        matches!(self, OutcomeLike::Err(_))
    }
}

impl<T> From<OutcomeLike<T>> for Outcome<T> {
    fn from(like: OutcomeLike<T>) -> Self {
        match like {
            OutcomeLike::Ok(value) => Outcome::Ok(value),
            OutcomeLike::Err(message) => Outcome::Err(Failure::new(message)),
        }
    }
}

impl<T> From<Outcome<T>> for OutcomeLike<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Ok(value) => OutcomeLike::Ok(value),
            Outcome::Err(failure) => OutcomeLike::Err(failure.message),
        }
    }
}

impl<T: Serialize> Serialize for OutcomeLike<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        match self {
            OutcomeLike::Ok(value) => {
                let mut s = serializer.serialize_struct("OutcomeLike", 2)?;
                s.serialize_field("ok", &true)?;
                s.serialize_field("value", value)?;
                s.end()
            }
            OutcomeLike::Err(message) => {
                let mut s = serializer.serialize_struct("OutcomeLike", 2)?;
                s.serialize_field("ok", &false)?;
                s.serialize_field("error", message)?;
                s.end()
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OutcomeLike<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let Value::Object(map) = &raw else {
            return Err(D::Error::custom("outcome-like value must be an object"));
        };
        match map.get("ok") {
            Some(Value::Bool(true)) => match map.get("value") {
                Some(value) => T::deserialize(value.clone())
                    .map(OutcomeLike::Ok)
                    .map_err(D::Error::custom),
                None => Err(D::Error::custom("success outcome lacks a value field")),
            },
            Some(Value::Bool(false)) => match map.get("error").and_then(Value::as_str) {
                Some(message) => Ok(OutcomeLike::Err(message.to_owned())),
                None => Err(D::Error::custom(
                    "outcome-like failure requires a string error",
                )),
            },
            _ => Err(D::Error::custom("missing ok tag")),
        }
    }
}

// =============================================================================
// Execution contexts
// =============================================================================

/// Execution context produced by an API call.
///
/// The actual outcome lives under `json`: the endpoint's `ok` flag plus
/// whatever payload it returned under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallContext {
    /// Caller-assigned request key.
    pub key: String,
    /// Name of the invoked endpoint.
    pub name: String,
    /// The response envelope holding the real outcome.
    pub json: CallEnvelope,
}

/// Response envelope nested inside a [`CallContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEnvelope {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The returned payload; absent responses read as null.
    #[serde(default)]
    pub data: Value,
}

impl CallContext {
    /// Structural detection: any value deserializing into this shape
    /// counts.
    pub fn detect(value: &Value) -> Option<CallContext> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Re-frame the nested envelope as a fresh canonical outcome value.
    pub fn into_outcome_value(self) -> Value {
        if self.json.ok {
            json!({ "ok": true, "value": self.json.data })
        } else {
            json!({ "ok": false, "error": self.json.data })
        }
    }
}

/// Execution context produced by a thunk invocation, embedding its own
/// outcome under `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThunkContext {
    /// The dispatched action payload.
    pub action: Value,
    /// Caller-assigned request key.
    pub key: String,
    /// Name of the invoked thunk.
    pub name: String,
    /// The embedded outcome.
    pub result: Value,
}

impl ThunkContext {
    /// Structural detection: any value deserializing into this shape
    /// counts.
    pub fn detect(value: &Value) -> Option<ThunkContext> {
        serde_json::from_value(value.clone()).ok()
    }
}

// =============================================================================
// Envelope kinds
// =============================================================================

/// The closed set of wrapping layers the resolver can peel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// A JSON-encoded string decoding to an outcome shape.
    Encoded,
    /// An outcome layer peeled down to its contained payload.
    Nested,
    /// An API-call context re-framed through its `json` envelope.
    Call,
    /// A thunk context peeled to its embedded `result`.
    Thunk,
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeKind::Encoded => write!(f, "encoded"),
            EnvelopeKind::Nested => write!(f, "nested"),
            EnvelopeKind::Call => write!(f, "call"),
            EnvelopeKind::Thunk => write!(f, "thunk"),
        }
    }
}
