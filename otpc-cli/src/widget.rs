//! Payment widgets the CLI can open.

use std::time::Duration;

use otpc_core::{PaymentWidget, WidgetCompletion, WidgetError};
use otpc_sdk::objects::payment::minor_to_major;
use otpc_sdk::objects::{PaymentResult, WidgetOptions};
use otpc_sdk::signature::sign_payment;
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::prompt::Prompt;

/// Shows the widget options and reads the gateway's three result fields
/// from the terminal. An empty payment id closes the widget.
pub struct TerminalWidget {
    prompt: Prompt,
}

impl TerminalWidget {
    pub fn new(prompt: Prompt) -> Self {
        Self { prompt }
    }
}

impl PaymentWidget for TerminalWidget {
    fn open(&self, options: WidgetOptions, mut completion: WidgetCompletion) -> Result<(), WidgetError> {
        eprintln!();
        eprintln!("== {} ({}) ==", options.name, options.description);
        eprintln!(
            "Pay {} {} for gateway order {}",
            minor_to_major(options.amount),
            options.currency,
            options.order_id
        );
        eprintln!("Key: {}", options.key);
        eprintln!(
            "Customer: {} <{}>{}",
            options.prefill.name,
            options.prefill.contact,
            options
                .prefill
                .email
                .as_deref()
                .map(|e| format!(" {e}"))
                .unwrap_or_default()
        );
        eprintln!("Complete the payment, then paste the gateway response.");

        let prompt = self.prompt.clone();
        tokio::spawn(async move {
            let read = tokio::select! {
                read = read_result(&prompt, &options.order_id) => read,
                () = completion.closed() => return,
            };
            match read {
                Ok(Some(result)) => {
                    if !completion.complete(result) {
                        tracing::debug!("Widget result arrived after the flow stopped waiting");
                    }
                }
                Ok(None) => tracing::debug!("Terminal widget closed without a payment"),
                Err(e) => tracing::warn!("Failed to read widget input: {}", e),
            }
        });
        Ok(())
    }
}

async fn read_result(
    prompt: &Prompt,
    gateway_order_id: &str,
) -> std::io::Result<Option<PaymentResult>> {
    let Some(payment_id) = prompt
        .line("razorpay_payment_id (blank to close): ")
        .await?
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };
    let order_id = prompt
        .line(&format!("razorpay_order_id [{gateway_order_id}]: "))
        .await?
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| gateway_order_id.to_owned());
    let Some(signature) = prompt
        .line("razorpay_signature: ")
        .await?
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };
    Ok(Some(PaymentResult {
        razorpay_payment_id: payment_id,
        razorpay_order_id: order_id,
        razorpay_signature: signature,
    }))
}

/// Completes every opening with a payment signed by the test key secret,
/// the way the gateway's test mode would.
pub struct SimulatedWidget {
    key_secret: Vec<u8>,
    delay: Duration,
}

impl SimulatedWidget {
    pub fn new(key_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            key_secret: key_secret.into(),
            delay: Duration::from_millis(500),
        }
    }
}

impl PaymentWidget for SimulatedWidget {
    fn open(&self, options: WidgetOptions, completion: WidgetCompletion) -> Result<(), WidgetError> {
        if options.order_id.is_empty() {
            return Err(WidgetError::new("order is missing a gateway order id"));
        }
        let result = simulated_payment(&options.order_id, &self.key_secret);
        tracing::info!(
            payment_id = %result.razorpay_payment_id,
            "Simulating payment of {} {}",
            minor_to_major(options.amount),
            options.currency
        );
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            completion.complete(result);
        });
        Ok(())
    }
}

fn simulated_payment(gateway_order_id: &str, key_secret: &[u8]) -> PaymentResult {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(14)
        .map(char::from)
        .collect();
    let payment_id = format!("pay_{suffix}");
    PaymentResult {
        razorpay_signature: sign_payment(gateway_order_id, &payment_id, key_secret),
        razorpay_payment_id: payment_id,
        razorpay_order_id: gateway_order_id.to_owned(),
    }
}
