//! Ctrl-C handling.
//!
//! While the payment widget is open, Ctrl-C cancels that step and the
//! driver offers the customer a way out. Anywhere else it ends the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use otpc_core::PaymentCanceller;
use tokio::sync::Notify;

/// Marks the span during which Ctrl-C cancels the widget step.
#[derive(Debug, Clone, Default)]
pub struct WidgetStep {
    active: Arc<AtomicBool>,
}

impl WidgetStep {
    /// Mark the widget step active until the returned guard is dropped.
    pub fn enter(&self) -> WidgetStepGuard {
        self.active.store(true, Ordering::SeqCst);
        WidgetStepGuard {
            active: self.active.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct WidgetStepGuard {
    active: Arc<AtomicBool>,
}

impl Drop for WidgetStepGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Spawns a task that routes Ctrl-C to `canceller` while `step` is active.
///
/// Returns a Notify that stops the task.
pub fn spawn_interrupt_handler(canceller: PaymentCanceller, step: WidgetStep) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!("Failed to listen for Ctrl-C: {}", e);
                        break;
                    }
                    if step.is_active() {
                        tracing::info!("Received Ctrl-C, cancelling payment");
                        canceller.cancel();
                    } else {
                        eprintln!();
                        eprintln!("Interrupted.");
                        std::process::exit(130);
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Interrupt handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}
