//! Handoff to the third-party payment widget.
//!
//! The widget is a black box: it is opened with [`WidgetOptions`] and at
//! some later point either reports a signed [`PaymentResult`] through its
//! [`WidgetCompletion`] or is closed by the customer without reporting
//! anything. The completion is consumed on use, so the flow resumes at most
//! once per opening.

use std::sync::Arc;

use otpc_sdk::objects::{PaymentResult, WidgetOptions};
use tokio::sync::{oneshot, watch};

/// A payment widget the flow can hand an order to.
pub trait PaymentWidget: Send + Sync {
    /// Open the widget and return without waiting for the customer.
    ///
    /// The implementation reports the outcome later through `completion`,
    /// typically from a task it spawns. Dropping `completion` without
    /// calling [`WidgetCompletion::complete`] signals that the customer
    /// closed the widget.
    fn open(&self, options: WidgetOptions, completion: WidgetCompletion) -> Result<(), WidgetError>;
}

/// The widget could not be opened.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct WidgetError(String);

impl WidgetError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Single-use callback through which a widget reports its result.
#[derive(Debug)]
pub struct WidgetCompletion {
    tx: oneshot::Sender<PaymentResult>,
}

impl WidgetCompletion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<PaymentResult>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Report the gateway's result. Returns `false` when the flow stopped
    /// waiting (timed out or cancelled) and the result was discarded.
    pub fn complete(self, result: PaymentResult) -> bool {
        self.tx.send(result).is_ok()
    }

    /// Whether the flow is still waiting for this completion.
    pub fn is_waiting(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Resolves once the flow stops waiting for this completion.
    pub async fn closed(&mut self) {
        self.tx.closed().await;
    }
}

/// Handle that aborts a pending widget step.
///
/// Cancelling while no widget is open has no effect on later openings.
#[derive(Debug, Clone)]
pub struct PaymentCanceller {
    tx: Arc<watch::Sender<bool>>,
}

impl PaymentCanceller {
    pub(crate) fn new(tx: Arc<watch::Sender<bool>>) -> Self {
        Self { tx }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> PaymentResult {
        PaymentResult {
            razorpay_payment_id: "pay_1".to_string(),
            razorpay_order_id: "rp_1".to_string(),
            razorpay_signature: "00".to_string(),
        }
    }

    #[test]
    fn completion_delivers_once() {
        let (completion, mut rx) = WidgetCompletion::channel();
        assert!(completion.is_waiting());
        assert!(completion.complete(result()));
        assert_eq!(rx.try_recv().unwrap(), result());
    }

    #[test]
    fn completion_after_receiver_dropped_is_discarded() {
        let (completion, rx) = WidgetCompletion::channel();
        drop(rx);
        assert!(!completion.is_waiting());
        assert!(!completion.complete(result()));
    }

    #[tokio::test]
    async fn closed_resolves_when_flow_gives_up() {
        let (mut completion, rx) = WidgetCompletion::channel();
        drop(rx);
        completion.closed().await;
        assert!(!completion.is_waiting());
    }

    #[test]
    fn dropped_completion_closes_channel() {
        let (completion, mut rx) = WidgetCompletion::channel();
        drop(completion);
        assert!(rx.try_recv().is_err());
    }
}
