use super::booking::{Booking, BookingRequest};
use super::payment::{CapturedPayment, GatewayOutcome, PaymentOrder, VerifiedPayment};
use crate::error::BackendError;
use async_trait::async_trait;

/// Backend payment endpoints: order creation and authoritative verification.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
    /// Reserves a price for the requested room and issues a payment order.
    /// The backend may keep a pending order even when this call fails on the
    /// way back; duplicates from retries are the backend's to tolerate.
    async fn create_order(&self, request: &BookingRequest) -> Result<PaymentOrder, BackendError>;

    /// Asks the backend whether a claimed capture is genuine. An explicit
    /// rejection comes back as `Ok` with a failed status, not as an error.
    async fn verify_payment(
        &self,
        captured: &CapturedPayment,
    ) -> Result<VerifiedPayment, BackendError>;
}

/// Backend booking-creation endpoint.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Persists the booking, linking it to the captured payment. Only called
    /// after verification succeeded.
    async fn create_booking(
        &self,
        request: &BookingRequest,
        captured: &CapturedPayment,
    ) -> Result<Booking, BackendError>;
}

/// The user's answer to the payment prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Pay,
    Cancel,
}

/// Interactive confirm-or-cancel capability presented by the host UI.
///
/// The flow never renders anything itself; whoever embeds it decides how the
/// choice is presented (modal, terminal prompt, scripted answer in tests).
#[async_trait]
pub trait PaymentPrompt: Send + Sync {
    async fn choose(&self, order: &PaymentOrder) -> PromptChoice;
}

/// Source of the simulated settlement draw.
///
/// Injectable so tests can force either branch; production uses a
/// rand-backed implementation at the configured success rate.
pub trait OutcomeDraw: Send + Sync {
    /// True when the simulated settlement should succeed.
    fn settles(&self) -> bool;
}

/// External payment interaction: given an order, yields exactly one outcome.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn collect(&self, order: &PaymentOrder) -> GatewayOutcome;
}

pub type PaymentBackendBox = Box<dyn PaymentBackend>;
pub type BookingBackendBox = Box<dyn BookingBackend>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type PaymentPromptBox = Box<dyn PaymentPrompt>;
pub type OutcomeDrawBox = Box<dyn OutcomeDraw>;
