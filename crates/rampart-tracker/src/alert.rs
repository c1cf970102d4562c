//! Escalation sinks for repeat offenders.

use tokio::sync::mpsc;
use tracing::warn;

/// Receives the one-shot escalation when a user crosses the alert threshold.
///
/// Implementations must not block: [`raise`](AlertSink::raise) runs inside
/// the tracker's check path. Hand the event off and return.
pub trait AlertSink: Send + Sync {
    /// Called once per user, at the moment their record count reaches the
    /// threshold.
    fn raise(&self, user_id: &str);
}

/// Default sink. Emits a structured warning and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlert;

impl AlertSink for TracingAlert {
    fn raise(&self, user_id: &str) {
        warn!(
            event = "attack_threshold",
            user = %user_id,
            "repeated blocked inputs from user"
        );
    }
}

/// Escalation payload delivered by [`ChannelAlert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    /// User that crossed the threshold.
    pub user_id: String,
}

/// Sink that forwards escalations over an unbounded channel, for callers
/// that handle them asynchronously (paging, ticketing, session teardown).
#[derive(Debug, Clone)]
pub struct ChannelAlert {
    tx: mpsc::UnboundedSender<AlertEvent>,
}

impl ChannelAlert {
    /// Creates the sink and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelAlert {
    fn raise(&self, user_id: &str) {
        let event = AlertEvent {
            user_id: user_id.to_string(),
        };
        if self.tx.send(event).is_err() {
            warn!(user = %user_id, "alert receiver dropped, escalation not delivered");
        }
    }
}
