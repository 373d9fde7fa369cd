use crate::domain::payment::GatewayFailure;
use thiserror::Error;

pub type Result<T, E = FlowError> = std::result::Result<T, E>;

/// Pipeline stage at which a booking attempt terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Validation,
    Order,
    Payment,
    Verification,
    Commit,
}

/// Terminal failure of one booking attempt.
///
/// Each variant maps onto the stage that produced it, so callers can report
/// validation problems, payment problems and the elevated paid-but-not-booked
/// state differently. None of these are retried internally; a retry is always
/// a fresh attempt started by the user.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("failed to create payment order: {0}")]
    OrderCreation(String),
    #[error("payment failed: {0}")]
    Gateway(GatewayFailure),
    #[error("could not reach payment verification: {0}")]
    VerificationUnreachable(String),
    #[error("payment verification rejected: {0}")]
    VerificationRejected(String),
    #[error(
        "payment {payment_id} was captured for order {order_id} but the booking could not be \
         created: {message}. Please contact support instead of retrying, so you are not charged \
         twice."
    )]
    PaidButNotBooked {
        order_id: String,
        payment_id: String,
        message: String,
    },
    #[error("a booking attempt is already in progress")]
    AttemptInFlight,
}

impl FlowError {
    /// The stage the attempt failed in. `AttemptInFlight` counts as a local
    /// pre-network refusal, like validation.
    pub fn stage(&self) -> FailureStage {
        match self {
            FlowError::Validation { .. } | FlowError::AttemptInFlight => FailureStage::Validation,
            FlowError::OrderCreation(_) => FailureStage::Order,
            FlowError::Gateway(_) => FailureStage::Payment,
            FlowError::VerificationUnreachable(_) | FlowError::VerificationRejected(_) => {
                FailureStage::Verification
            }
            FlowError::PaidButNotBooked { .. } => FailureStage::Commit,
        }
    }

    /// True when money was captured but no booking exists, which needs manual
    /// reconciliation rather than a retry.
    pub fn needs_support(&self) -> bool {
        matches!(self, FlowError::PaidButNotBooked { .. })
    }
}

/// Failure reported by a backend endpoint call.
///
/// `Transport` means the call itself failed and the outcome is unknown;
/// `Rejected` means the backend answered and said no, carrying its
/// human-readable message.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
}
