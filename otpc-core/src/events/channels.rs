//! Event channel factory and emitter.

use super::types::{FlowEvent, FlowStep};
use crate::error::CheckoutError;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default buffer size for the flow event channel.
///
/// A checkout emits a handful of events, so this only fills up when the
/// receiver stops reading.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Sender handle for FlowEvent events.
pub type FlowEventSender = mpsc::Sender<FlowEvent>;
/// Receiver handle for FlowEvent events.
pub type FlowEventReceiver = mpsc::Receiver<FlowEvent>;

/// Create a new FlowEvent channel.
pub fn flow_event_channel() -> (FlowEventSender, FlowEventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Non-blocking emitter used by the flow components.
///
/// Emitting never suspends a step: events are dropped (with a warning) when
/// nobody listens or the receiver has fallen behind.
#[derive(Debug, Clone, Default)]
pub struct FlowEvents {
    sender: Option<FlowEventSender>,
}

impl FlowEvents {
    pub fn new(sender: FlowEventSender) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// An emitter that discards every event.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, event: FlowEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(event = ?event, "flow event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("flow event receiver dropped");
            }
        }
    }

    /// Emit `StepFailed` for an error result and pass the result through.
    pub(crate) fn report<T>(
        &self,
        step: FlowStep,
        result: Result<T, CheckoutError>,
    ) -> Result<T, CheckoutError> {
        if let Err(e) = &result {
            tracing::warn!(step = %step, error = %e, "checkout step failed");
            self.emit(FlowEvent::StepFailed {
                step,
                message: e.to_string(),
            });
        }
        result
    }
}
