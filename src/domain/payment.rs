use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-issued handle representing an intent to pay.
///
/// Issued once per booking attempt and immutable afterwards; a retried
/// attempt always gets a fresh order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrder {
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Amount in minor currency units (paise).
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "roomId")]
    pub room_id: String,
    /// Nightly room price in major units, echoed by the backend.
    #[serde(rename = "roomPrice")]
    pub room_price: Decimal,
}

impl PaymentOrder {
    /// Amount in major units with two decimal places, for display.
    pub fn display_amount(&self) -> Decimal {
        Decimal::new(self.amount, 2)
    }
}

/// Why the simulated gateway did not capture a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayFailure {
    UserCancelled,
    InsufficientFunds,
}

impl fmt::Display for GatewayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayFailure::UserCancelled => write!(f, "payment was cancelled by the user"),
            GatewayFailure::InsufficientFunds => write!(f, "insufficient funds (simulated)"),
        }
    }
}

/// Identifiers fabricated by the gateway for a captured payment.
///
/// Ephemeral; lives only for the orchestration run that produced it and is
/// handed to the backend for authoritative verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPayment {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    pub signature: String,
}

/// Result of one gateway interaction. Exactly one of these is produced per
/// invocation; there is no silent-drop or double-fire path.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    Success(CapturedPayment),
    Failure(GatewayFailure),
}

/// Authoritative verdict on a claimed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Success,
    Failed,
}

/// Backend response to a verification request.
///
/// An explicit `Failed` status is a terminal, known state and is not an
/// error at the transport level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedPayment {
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifiedPayment {
    pub fn is_success(&self) -> bool {
        self.status == VerificationStatus::Success
    }
}
