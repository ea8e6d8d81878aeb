//! Interactive checkout: contact, code, then payment.

use anyhow::bail;
use otpc_core::events::FlowEventReceiver;
use otpc_core::{
    CheckoutApi, CheckoutError, CheckoutOtpFlow, ContactInfo, PaymentStage, PaymentWidget,
};
use otpc_sdk::objects::PaymentResult;

use crate::prompt::Prompt;
use crate::render::{OutputFormat, flush_events};
use crate::signals::WidgetStep;

/// How an interactive checkout ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Paid { payment_id: String, redirect: String },
    GaveUp,
}

pub struct Driver<'a> {
    pub prompt: &'a Prompt,
    pub events: FlowEventReceiver,
    pub format: OutputFormat,
    pub widget_step: WidgetStep,
}

impl Driver<'_> {
    pub async fn run<A: CheckoutApi, W: PaymentWidget>(
        &mut self,
        flow: &mut CheckoutOtpFlow<A, W>,
    ) -> anyhow::Result<Outcome> {
        self.collect_contact(flow).await?;
        self.collect_code(flow).await?;

        let name = self.ask("Full name: ").await?;
        let address = self.ask("Shipping address: ").await?;

        let mut unconfirmed = None;
        loop {
            let outcome = {
                let _active = self.widget_step.enter();
                pay(flow, &mut unconfirmed, &address, &name).await
            };
            self.flush();
            match outcome {
                Ok(result) => {
                    return Ok(Outcome::Paid {
                        payment_id: result.razorpay_payment_id,
                        redirect: flow.settings().redirect.clone(),
                    });
                }
                Err(CheckoutError::PaymentCancelled) => return Ok(Outcome::GaveUp),
                Err(e) => tracing::debug!("Payment attempt failed: {}", e),
            }
            let question = if unconfirmed.is_some() {
                "Retry confirming the payment? [y/N] "
            } else {
                "Try the payment again? [y/N] "
            };
            if !self.prompt.confirm(question).await? {
                return Ok(Outcome::GaveUp);
            }
        }
    }

    async fn collect_contact<A: CheckoutApi, W: PaymentWidget>(
        &mut self,
        flow: &mut CheckoutOtpFlow<A, W>,
    ) -> anyhow::Result<()> {
        loop {
            let phone = self.ask("Phone number (blank to skip): ").await?;
            let email = self.ask("Email (blank to skip): ").await?;
            let result = flow
                .request_otp(ContactInfo::new(Some(&phone), Some(&email)))
                .await;
            self.flush();
            match result {
                Ok(()) => return Ok(()),
                Err(CheckoutError::InvalidContact) => {
                    eprintln!("Please enter a phone number or an email address.");
                }
                Err(e) => tracing::debug!("Requesting OTP failed: {}", e),
            }
        }
    }

    async fn collect_code<A: CheckoutApi, W: PaymentWidget>(
        &mut self,
        flow: &mut CheckoutOtpFlow<A, W>,
    ) -> anyhow::Result<()> {
        loop {
            let input = self.ask("Enter OTP (or \"resend\"): ").await?;
            let result = if input.eq_ignore_ascii_case("resend") {
                flow.resend_otp().await.map(|()| false)
            } else {
                flow.verify_otp(&input).await.map(|()| true)
            };
            self.flush();
            match result {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => tracing::debug!("OTP step failed: {}", e),
            }
        }
    }

    async fn ask(&self, label: &str) -> anyhow::Result<String> {
        match self.prompt.line(label).await? {
            Some(line) => Ok(line),
            None => bail!("input closed"),
        }
    }

    fn flush(&mut self) {
        flush_events(&mut self.events, self.format);
    }
}

/// Run the payment step from wherever the last attempt stopped.
///
/// An order left by a closed or timed-out widget is reused. A payment the
/// widget already reported but the backend did not confirm is kept in
/// `unconfirmed` and only its confirmation is retried, so the customer is
/// never asked to pay twice.
async fn pay<A: CheckoutApi, W: PaymentWidget>(
    flow: &mut CheckoutOtpFlow<A, W>,
    unconfirmed: &mut Option<PaymentResult>,
    address: &str,
    name: &str,
) -> Result<PaymentResult, CheckoutError> {
    let stage = flow.session().payment_stage();
    let result = match unconfirmed.take() {
        Some(result) if stage == PaymentStage::AwaitingConfirmation => result,
        _ if matches!(
            stage,
            PaymentStage::OrderCreated | PaymentStage::AwaitingConfirmation
        ) =>
        {
            flow.collect_payment(name).await?
        }
        _ => {
            flow.create_order(address).await?;
            flow.collect_payment(name).await?
        }
    };
    if let Err(e) = flow.confirm_payment(&result).await {
        *unconfirmed = Some(result);
        return Err(e);
    }
    Ok(result)
}
