//! Structured error types for the outcome algebra.
//!
//! `VerdictError` provides pattern-matchable errors instead of generic
//! `anyhow::Error`. Two propagation regimes share this enum:
//!
//! - **Trusted construction paths** (strict parsing, the strict
//!   combinators reached through it) fail fast with an `Err`, because a
//!   malformed shape there indicates a programming defect upstream.
//! - **Unpacking paths** are defensive: their inputs originate from
//!   foreign serialization boundaries, so unrecognized shapes degrade to a
//!   best-effort terminal error message instead of surfacing an `Err`.
//!
//! # Example
//!
//! ```ignore
//! use verdict::{Outcome, VerdictError};
//!
//! match Outcome::from_value(&raw) {
//!     Ok(outcome) => handle(outcome),
//!     Err(VerdictError::MalformedOutcome { reason }) => {
//!         eprintln!("caller handed us a corrupt outcome: {}", reason);
//!     }
//!     Err(other) => eprintln!("construction failed: {}", other),
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Why a loose-passing value failed the strict shape check.
///
/// The loose filter ([`crate::is_outcome_shaped`]) only requires a present
/// `ok` key; the strict tier demands a boolean tag and the complementary
/// payload field. This enum names exactly which requirement was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The input is not an object, or carries no usable `ok` key.
    MissingTag,
    /// The `ok` key is present but not a boolean.
    NonBooleanTag,
    /// The tag claims success but no `value` field is present.
    MissingValue,
    /// The tag claims failure but no `error` field is present.
    MissingError,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingTag => write!(f, "missing ok tag"),
            MalformedReason::NonBooleanTag => write!(f, "ok tag is not a boolean"),
            MalformedReason::MissingValue => write!(f, "success outcome lacks a value field"),
            MalformedReason::MissingError => write!(f, "failure outcome lacks an error field"),
        }
    }
}

/// Structured error type for outcome algebra operations.
#[derive(Debug, Error)]
pub enum VerdictError {
    /// Invalid attempt to build a success outcome from an error value.
    #[error("success values cannot be errors")]
    ErrorAsSuccess,

    /// The failure constructor was handed a payload it cannot coerce into
    /// a message.
    #[error("unsupported error payload type: {type_name}")]
    UnsupportedErrorPayload {
        /// JSON type name of the rejected payload.
        type_name: &'static str,
    },

    /// An input passed the loose structural filter but fails the strict
    /// shape check.
    #[error("malformed outcome: {reason}")]
    MalformedOutcome {
        /// Which structural requirement was violated.
        reason: MalformedReason,
    },

    /// A string could be classified neither as JSON nor as a recognized
    /// outcome encoding during unpacking.
    ///
    /// The original content is preserved verbatim for diagnosis.
    #[error("unrecognized encoding: {content}")]
    UnknownEncoding {
        /// The string that defeated classification.
        content: String,
    },

    /// Envelope nesting exceeded the resolver's depth bound.
    #[error("envelope nesting exceeded {max} layers")]
    DepthExceeded {
        /// The bound that was hit.
        max: usize,
    },

    /// An output channel name did not match any recognized channel.
    #[error("unknown output channel: {name}")]
    UnknownChannel {
        /// The rejected name.
        name: String,
    },
}
