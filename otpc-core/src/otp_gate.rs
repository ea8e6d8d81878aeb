//! Gate that keeps the payment step locked until a contact is verified.
//!
//! State machine: `Idle -> AwaitingCode -> Verified`, with
//! `AwaitingCode -> AwaitingCode` on resend. Codes are always resent to the
//! contact captured by the first successful send, never to whatever the
//! form holds at the time of the resend.

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::api::CheckoutApi;
use crate::error::CheckoutError;
use crate::events::{FlowEvent, FlowEvents, FlowStep};
use crate::session::{CheckoutSession, ContactInfo, OtpSession, OtpState};

pub struct OtpGate<'a, A: CheckoutApi + ?Sized> {
    api: &'a A,
    events: &'a FlowEvents,
}

impl<'a, A: CheckoutApi + ?Sized> OtpGate<'a, A> {
    pub fn new(api: &'a A, events: &'a FlowEvents) -> Self {
        Self { api, events }
    }

    /// Send a code to `contact`.
    ///
    /// Fails with [`CheckoutError::InvalidContact`] before any request when
    /// both channels are empty. Calling this again with the same contact
    /// while a code is pending resends it; a different contact fails with
    /// [`CheckoutError::ContactLocked`].
    #[tracing::instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn request_otp(
        &self,
        session: &mut CheckoutSession,
        contact: ContactInfo,
    ) -> Result<(), CheckoutError> {
        let result = self.send_first(session, contact).await;
        self.events.report(FlowStep::SendOtp, result)
    }

    /// Send a fresh code to the contact captured by [`request_otp`](Self::request_otp).
    #[tracing::instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn resend_otp(&self, session: &mut CheckoutSession) -> Result<(), CheckoutError> {
        let result = self.resend(session).await;
        self.events.report(FlowStep::ResendOtp, result)
    }

    /// Verify `code` against the captured contact.
    ///
    /// The code is trimmed; an empty code fails with
    /// [`CheckoutError::InvalidCode`] before any request. A rejection by the
    /// backend leaves the gate in `AwaitingCode`.
    #[tracing::instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn verify_otp(
        &self,
        session: &mut CheckoutSession,
        code: &str,
    ) -> Result<(), CheckoutError> {
        let result = self.verify(session, code).await;
        self.events.report(FlowStep::VerifyOtp, result)
    }

    async fn send_first(
        &self,
        session: &mut CheckoutSession,
        contact: ContactInfo,
    ) -> Result<(), CheckoutError> {
        let contact = contact.validated()?;
        match session.otp_state() {
            OtpState::Idle => {}
            OtpState::AwaitingCode if session.contact() == Some(&contact) => {
                debug!("code already pending for this contact, resending");
                return self.resend(session).await;
            }
            OtpState::AwaitingCode => return Err(CheckoutError::ContactLocked),
            OtpState::Verified => return Err(CheckoutError::AlreadyVerified),
        }

        let response = self
            .api
            .send_otp(&contact.send_request())
            .await
            .map_err(|e| CheckoutError::from_client(e, CheckoutError::backend))?;

        info!(expires_at = ?response.expires_at, "OTP sent");
        session.otp = Some(OtpSession::new(contact, response.expires_at));
        self.events.emit(FlowEvent::OtpSent {
            expires_at: response.expires_at,
        });
        Ok(())
    }

    async fn resend(&self, session: &mut CheckoutSession) -> Result<(), CheckoutError> {
        let otp = match session.otp.as_mut() {
            None => return Err(CheckoutError::OtpNotRequested),
            Some(otp) if otp.verified => return Err(CheckoutError::AlreadyVerified),
            Some(otp) => otp,
        };

        let response = self
            .api
            .send_otp(&otp.contact.send_request())
            .await
            .map_err(|e| CheckoutError::from_client(e, CheckoutError::backend))?;

        otp.sends += 1;
        otp.expires_at = response.expires_at;
        info!(sends = otp.sends, "OTP resent");
        self.events.emit(FlowEvent::OtpResent { sends: otp.sends });
        Ok(())
    }

    async fn verify(&self, session: &mut CheckoutSession, code: &str) -> Result<(), CheckoutError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CheckoutError::InvalidCode("OTP is required".to_string()));
        }

        let otp = match session.otp.as_mut() {
            None => return Err(CheckoutError::OtpNotRequested),
            Some(otp) if otp.verified => return Err(CheckoutError::AlreadyVerified),
            Some(otp) => otp,
        };
        if otp.is_expired_at(OffsetDateTime::now_utc()) {
            return Err(CheckoutError::InvalidCode("OTP expired".to_string()));
        }

        self.api
            .verify_otp(&otp.contact.verify_request(code))
            .await
            .map_err(|e| CheckoutError::from_client(e, CheckoutError::InvalidCode))?;

        otp.verified = true;
        info!("OTP verified");
        self.events.emit(FlowEvent::OtpVerified);
        Ok(())
    }
}
