//! Fixture builders for nested outcome envelopes.
//!
//! These helpers construct the wrapped shapes the resolver is expected to
//! peel, so downstream tests can assert terminal forms without
//! hand-writing escaped JSON.
//!
//! # Feature Flag
//!
//! Available to dependents with the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! verdict = { version = "0.1", features = ["testing"] }
//! ```

use serde_json::{json, Value};

use crate::outcome::Outcome;

/// Wrap a canonical outcome wire value in `layers` JSON-encoded success
/// envelopes.
///
/// Zero layers returns the wire value unchanged.
pub fn encode_layers(outcome: Outcome<Value>, layers: usize) -> Value {
    let mut wire = outcome.into_value();
    for _ in 0..layers {
        wire = json!({ "ok": true, "value": wire.to_string() });
    }
    wire
}

/// A success outcome whose payload is an API-call context carrying
/// `data`; `ok` sets the nested envelope's flag.
pub fn call_context_value(ok: bool, data: Value) -> Value {
    json!({
        "ok": true,
        "value": {
            "key": "test-key",
            "name": "test_call",
            "json": { "ok": ok, "data": data }
        }
    })
}

/// A success outcome whose payload is a thunk context embedding `result`.
pub fn thunk_context_value(result: Value) -> Value {
    json!({
        "ok": true,
        "value": {
            "action": { "type": "test/dispatch" },
            "key": "test-key",
            "name": "test_thunk",
            "result": result
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve_value, Resolved};

    #[test]
    fn test_encode_layers_zero_is_the_wire_shape() {
        let wire = encode_layers(Outcome::Ok(json!(1)), 0);
        assert_eq!(wire, json!({"ok": true, "value": 1}));
    }

    #[test]
    fn test_encode_layers_round_trips_through_resolve() {
        let wire = encode_layers(Outcome::Ok(json!({"id": 4})), 3);
        assert_eq!(resolve_value(wire), Resolved::Value(json!({"id": 4})));
    }

    #[test]
    fn test_context_fixtures_resolve() {
        assert_eq!(
            resolve_value(call_context_value(true, json!(9))),
            Resolved::Value(json!(9))
        );
        assert_eq!(
            resolve_value(thunk_context_value(json!({"ok": false, "error": "boom"}))),
            Resolved::Error("boom".into())
        );
    }
}
