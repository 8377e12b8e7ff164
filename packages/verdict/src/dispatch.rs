//! The dispatcher facet: resolve an input, report failures, surface or
//! return them.
//!
//! [`settle`] is the caller-facing end of the algebra. It resolves any
//! boundary input to its terminal form and, when that form is an error,
//! reports it through the requested output channels before surfacing it
//! per an explicit caller-supplied disposition. There is no global
//! default for either the channels or the disposition — both arrive at
//! the call boundary.
//!
//! Delivery itself belongs to the collaborating I/O layer, reached
//! through [`ChannelSink`]. Sink failures are logged and never affect the
//! main flow; reporting is observation, not control.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::boundary::RawValue;
use crate::error::VerdictError;
use crate::outcome::Failure;
use crate::resolve::{resolve, Resolved};

// =============================================================================
// Output channels
// =============================================================================

/// Output channels an error report can be routed to.
///
/// The crate only selects among these; what delivery means is the sink
/// implementation's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    /// User-facing notification.
    Notify,
    /// Development console.
    Console,
    /// Operational log sink.
    Terminal,
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputChannel::Notify => write!(f, "notify"),
            OutputChannel::Console => write!(f, "console"),
            OutputChannel::Terminal => write!(f, "terminal"),
        }
    }
}

impl FromStr for OutputChannel {
    type Err = VerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notify" => Ok(OutputChannel::Notify),
            "console" => Ok(OutputChannel::Console),
            "terminal" => Ok(OutputChannel::Terminal),
            other => Err(VerdictError::UnknownChannel {
                name: other.to_owned(),
            }),
        }
    }
}

/// Whether a settled failure is surfaced as `Err` or handed back as a
/// terminal error.
///
/// Always caller-supplied; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Surface the failure as `Err`.
    Raise,
    /// Hand the terminal error back as an `Ok(Resolved::Error)`.
    Return,
}

// =============================================================================
// Sinks
// =============================================================================

/// Delivery collaborator for error reports.
///
/// Implement this to bridge to the real notification, console, and log
/// infrastructure. Implementations should be fire-and-forget; the
/// dispatcher logs delivery errors and moves on.
pub trait ChannelSink: Send + Sync {
    /// Deliver one message on one channel.
    fn deliver(&self, channel: OutputChannel, message: &str) -> anyhow::Result<()>;
}

/// Default sink mapping channels onto `tracing` levels.
pub struct TracingSink;

impl ChannelSink for TracingSink {
    fn deliver(&self, channel: OutputChannel, message: &str) -> anyhow::Result<()> {
        match channel {
            OutputChannel::Terminal => {
                tracing::error!(target: "verdict::terminal", %message, "operation failed")
            }
            OutputChannel::Console => {
                tracing::debug!(target: "verdict::console", %message, "operation failed")
            }
            OutputChannel::Notify => {
                tracing::info!(target: "verdict::notify", %message, "operation failed")
            }
        }
        Ok(())
    }
}

/// A sink that drops every report. Use when no reporting is wanted.
pub struct NoOpSink;

impl ChannelSink for NoOpSink {
    fn deliver(&self, _channel: OutputChannel, _message: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

// =============================================================================
// settle
// =============================================================================

/// Resolve a boundary input and surface or return the terminal form.
///
/// A terminal value comes back as-is — null input stays null, and no
/// channel is touched. A terminal error is first re-normalized: a fresh
/// canonical error value is built from the message and pushed through the
/// same resolution path, so whatever surfaces went through exactly one
/// pipeline. The normalized message is then delivered to every requested
/// channel and surfaced per the disposition.
pub fn settle(
    input: RawValue,
    channels: &[OutputChannel],
    disposition: ErrorDisposition,
    sink: &dyn ChannelSink,
) -> Result<Resolved, Failure> {
    match resolve(input) {
        Resolved::Value(value) => Ok(Resolved::Value(value)),
        Resolved::Error(message) => {
            let reentry = json!({ "ok": false, "error": { "message": message } });
            let message = match resolve(RawValue::Json(reentry)) {
                Resolved::Error(message) => message,
                Resolved::Value(value) => value.to_string(),
            };

            report(&message, channels, sink);

            let failure = Failure::new(message);
            error!(channels = channels.len(), %failure, "settled with failure");
            match disposition {
                ErrorDisposition::Raise => Err(failure),
                ErrorDisposition::Return => Ok(Resolved::Error(failure.message)),
            }
        }
    }
}

fn report(message: &str, channels: &[OutputChannel], sink: &dyn ChannelSink) {
    for channel in channels {
        if let Err(err) = sink.deliver(*channel, message) {
            warn!(%channel, error = %err, "channel delivery failed");
        }
    }
}
