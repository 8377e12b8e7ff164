//! Normalization of heterogeneous outcome representations.
//!
//! # Overview
//!
//! A value arriving here may be a canonical outcome, a JSON-encoded
//! string of one, a foreign outcome-like object, an execution context
//! whose real outcome sits under a nested field, any nesting of those, or
//! a bare payload with no envelope at all. [`resolve`] reduces all of
//! them to exactly one terminal [`Resolved`]: an error message, or a
//! value.
//!
//! # Termination
//!
//! The peeling is an explicit loop, not self-recursion. Every iteration
//! removes one envelope layer from a finite input, and the loop refuses
//! to run past [`MAX_RESOLVE_DEPTH`] — adversarially deep nesting
//! degrades to a terminal error instead of unbounded recursion.
//!
//! # Trust
//!
//! Inputs originate from foreign serialization boundaries, so this path
//! never fails fast: unrecognized shapes degrade to best-effort terminal
//! errors, preserving the original content where it helps diagnosis. The
//! strict, fail-fast tier lives in [`crate::Outcome::from_value`].
//!
//! Context detection is unconditional: a success payload that
//! structurally matches [`CallContext`] or [`ThunkContext`] is unwrapped
//! as one, even if it was a legitimate payload sharing the field names.

use serde_json::Value;
use smallvec::SmallVec;
use tracing::debug;

use crate::boundary::RawValue;
use crate::classify;
use crate::envelope::{CallContext, EnvelopeKind, ThunkContext};
use crate::error::VerdictError;
use crate::outcome::Failure;

/// Upper bound on envelope peeling before the resolver gives up.
pub const MAX_RESOLVE_DEPTH: usize = 64;

/// The terminal form of an unpacked value: exactly one of an error
/// message or a value remains once every envelope is removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Terminal value (possibly null — absent input is not an error).
    Value(Value),
    /// Terminal error message.
    Error(String),
}

impl Resolved {
    /// Returns true for the value variant.
    pub fn is_value(&self) -> bool {
        matches!(self, Resolved::Value(_))
    }

    /// Returns true for the error variant.
    pub fn is_error(&self) -> bool {
        matches!(self, Resolved::Error(_))
    }

    /// The terminal value, if this resolved to one.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Error(_) => None,
        }
    }

    /// The terminal error message, if this resolved to one.
    pub fn error(&self) -> Option<&str> {
        match self {
            Resolved::Value(_) => None,
            Resolved::Error(message) => Some(message),
        }
    }

    /// View as an `(error, value)` pair; exactly one side is populated.
    pub fn into_pair(self) -> (Option<String>, Option<Value>) {
        match self {
            Resolved::Value(value) => (None, Some(value)),
            Resolved::Error(message) => (Some(message), None),
        }
    }
}

/// Resolve a boundary input to its terminal form.
///
/// A native error short-circuits to a terminal error carrying its
/// message; JSON goes through the full peeling loop.
pub fn resolve(input: RawValue) -> Resolved {
    match input {
        RawValue::Error(err) => Resolved::Error(Failure::from(err).message),
        RawValue::Json(value) => resolve_value(value),
    }
}

/// One step of peeling.
enum Peel {
    /// No more layers: the terminal payload.
    Terminal(Value),
    /// One layer removed; keep peeling.
    Continue(EnvelopeKind, Value),
    /// The failure branch was entered; from here on the payload is being
    /// normalized into a message.
    IntoError(Value),
}

/// Resolve a JSON value to its terminal form.
pub fn resolve_value(input: Value) -> Resolved {
    let mut current = input;
    let mut failing = false;
    let mut trace: SmallVec<[EnvelopeKind; 8]> = SmallVec::new();

    loop {
        if trace.len() >= MAX_RESOLVE_DEPTH {
            return Resolved::Error(
                VerdictError::DepthExceeded {
                    max: MAX_RESOLVE_DEPTH,
                }
                .to_string(),
            );
        }

        let step = if failing {
            peel_message(current)
        } else {
            peel_value(current)
        };

        match step {
            Peel::Terminal(terminal) => {
                if !trace.is_empty() {
                    debug!(layers = trace.len(), "resolved nested outcome");
                }
                return finish(terminal, failing);
            }
            Peel::Continue(kind, inner) => {
                debug!(envelope = %kind, "peeling outcome envelope");
                trace.push(kind);
                current = inner;
            }
            Peel::IntoError(payload) => {
                debug!(envelope = %EnvelopeKind::Nested, "entering failure branch");
                trace.push(EnvelopeKind::Nested);
                failing = true;
                current = payload;
            }
        }
    }
}

/// Peeling rules on the value path.
fn peel_value(current: Value) -> Peel {
    // absent input is a terminal value, not an error
    if current.is_null() {
        return Peel::Terminal(Value::Null);
    }

    // strings are opaque unless they decode to JSON
    if let Value::String(text) = &current {
        return match serde_json::from_str::<Value>(text) {
            Err(_) => Peel::Terminal(current),
            Ok(parsed) if classify::is_outcome_shaped(&parsed) => {
                Peel::Continue(EnvelopeKind::Encoded, parsed)
            }
            Ok(parsed) => Peel::Terminal(parsed),
        };
    }

    let tag = current.get("ok").cloned();
    match tag {
        Some(Value::Bool(false)) => {
            let payload = current.get("error").cloned().unwrap_or(Value::Null);
            Peel::IntoError(payload)
        }
        Some(Value::Bool(true)) => {
            let value = current.get("value").cloned().unwrap_or(Value::Null);
            peel_success_payload(value)
        }
        // not an object, or a corrupt/missing tag: the defensive path
        // degrades to a terminal value instead of failing fast
        _ => Peel::Terminal(current),
    }
}

/// Success payloads unwrap only through the recognized envelopes;
/// anything else is returned verbatim, not further unpacked.
fn peel_success_payload(value: Value) -> Peel {
    if let Some(ctx) = CallContext::detect(&value) {
        return Peel::Continue(EnvelopeKind::Call, ctx.into_outcome_value());
    }
    if let Some(ctx) = ThunkContext::detect(&value) {
        return Peel::Continue(EnvelopeKind::Thunk, ctx.result);
    }
    if let Value::String(text) = &value {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            if classify::is_outcome_shaped(&parsed) {
                return Peel::Continue(EnvelopeKind::Encoded, parsed);
            }
        }
    }
    Peel::Terminal(value)
}

/// Peeling rules once the failure branch has been entered: the payload is
/// normalized into a message.
fn peel_message(current: Value) -> Peel {
    if let Value::Object(map) = &current {
        // a message-carrying object yields its message for another pass
        if let Some(message) = map.get("message") {
            return Peel::Continue(EnvelopeKind::Nested, message.clone());
        }
        // a nested outcome inside an error payload keeps peeling; both
        // sides feed the message
        match map.get("ok") {
            Some(Value::Bool(false)) => {
                let payload = map.get("error").cloned().unwrap_or(Value::Null);
                return Peel::Continue(EnvelopeKind::Nested, payload);
            }
            Some(Value::Bool(true)) => {
                let value = map.get("value").cloned().unwrap_or(Value::Null);
                return Peel::Continue(EnvelopeKind::Nested, value);
            }
            _ => {}
        }
    }
    if let Value::String(text) = &current {
        if classify::is_json_encoded(text) {
            if let Ok(parsed) = serde_json::from_str::<Value>(text) {
                return Peel::Continue(EnvelopeKind::Encoded, parsed);
            }
        }
    }
    Peel::Terminal(current)
}

/// Convert the terminal payload to its final form.
fn finish(terminal: Value, failing: bool) -> Resolved {
    if !failing {
        return Resolved::Value(terminal);
    }

    // a mangled encoding is surfaced descriptively, content preserved
    if let Value::String(text) = &terminal {
        let trimmed = text.trim_start();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && serde_json::from_str::<Value>(text).is_err()
        {
            return Resolved::Error(
                VerdictError::UnknownEncoding {
                    content: text.clone(),
                }
                .to_string(),
            );
        }
    }

    match Failure::coerce(RawValue::Json(terminal.clone())) {
        Ok(failure) => Resolved::Error(failure.message),
        Err(_) => Resolved::Error(terminal.to_string()),
    }
}
