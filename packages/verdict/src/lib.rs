//! # Verdict
//!
//! A small algebra for operation outcomes: canonical success/failure
//! values, structural classification of foreign result shapes, and
//! recursive envelope unpacking for effect pipelines.
//!
//! ## Core Concepts
//!
//! Verdict separates **what an outcome is** from **how it arrived**:
//! - [`Outcome`] = the canonical two-variant value (success payload or
//!   structured [`Failure`])
//! - Envelopes = the wrapping layers a value picks up crossing runtime
//!   and serialization boundaries (JSON strings, foreign shapes,
//!   execution contexts)
//!
//! The key principle: **one terminal form per input**. However deeply a
//! result was nested, stringified, or re-encoded on its way here,
//! resolution produces exactly one error message or one value.
//!
//! ## Architecture
//!
//! ```text
//! raw / foreign value          native error
//!        │                          │
//!        ▼ classify (loose filter)  │
//!   is it outcome-shaped?           │
//!        │                          │
//!        ▼ construct                ▼
//!   Outcome<T>  ◄────────── Failure::from
//!        │
//!        ▼ transform (map / bimap / coalesce / value_or / cata)
//!   Outcome<U>
//!        │
//!        ▼ resolve (peel envelopes, bounded depth)
//!   Resolved ── value ──► caller
//!        │
//!        └── error ──► settle ──► ChannelSink ──► notify / console / terminal
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Exactly one payload** - a serialized outcome carries `value` or
//!    `error`, always matching its `ok` tag
//! 2. **Failures are structured** - bare string errors exist only in the
//!    cross-boundary [`OutcomeLike`] shape
//! 3. **Outcomes are immutable** - combinators produce fresh values,
//!    nothing is mutated in place
//! 4. **Strict where trusted, defensive where not** - construction and
//!    the strict combinators fail fast on corruption; resolution degrades
//!    to best-effort terminal errors
//! 5. **Resolution terminates** - peeling is a bounded loop over a closed
//!    set of envelope shapes, never unbounded recursion
//!
//! ## Example
//!
//! ```ignore
//! use verdict::{settle, ErrorDisposition, OutputChannel, RawValue, TracingSink};
//!
//! // A thunk handed us something: maybe a result, maybe a stringified
//! // result, maybe a whole call context. Settle it.
//! let settled = settle(
//!     RawValue::json(payload),
//!     &[OutputChannel::Terminal],
//!     ErrorDisposition::Raise,
//!     &TracingSink,
//! )?;
//! ```
//!
//! ## What This Is Not
//!
//! Verdict is **not**:
//! - An effects system or scheduler (the collaborating runtime owns that)
//! - A network client
//! - A persistence layer
//!
//! Verdict **is**:
//! > The one place heterogeneous representations of "it worked / it
//! > failed" become a single canonical value.

// Core modules
mod boundary;
mod classify;
mod dispatch;
mod envelope;
mod error;
mod outcome;
mod resolve;

// Test fixtures (feature-gated for dependents, always on for our tests)
#[cfg(any(test, feature = "testing"))]
pub mod testing;


// Re-export the canonical types
pub use crate::outcome::{Failure, Outcome, UNDEFINED_ERROR};

// Re-export boundary construction
pub use crate::boundary::{ErrorCoercion, RawValue};

// Re-export classification predicates
pub use crate::classify::{
    is_err_shaped, is_json_encoded, is_ok_shaped, is_outcome_like_err,
    is_outcome_like_err_with_encoded_value, is_outcome_like_ok,
    is_outcome_like_ok_with_encoded_value, is_outcome_shaped, Shape,
};

// Re-export envelope shapes
pub use crate::envelope::{CallContext, CallEnvelope, EnvelopeKind, OutcomeLike, ThunkContext};

// Re-export resolution
pub use crate::resolve::{resolve, resolve_value, Resolved, MAX_RESOLVE_DEPTH};

// Re-export the dispatcher facet
pub use crate::dispatch::{
    settle, ChannelSink, ErrorDisposition, NoOpSink, OutputChannel, TracingSink,
};

// Re-export error types
pub use crate::error::{MalformedReason, VerdictError};
