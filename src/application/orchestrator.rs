use crate::domain::booking::{Booking, BookingRequest};
use crate::domain::customer::CustomerInfo;
use crate::domain::payment::GatewayOutcome;
use crate::domain::ports::{BookingBackendBox, PaymentBackendBox, PaymentGatewayBox};
use crate::domain::receipt::{Receipt, build_receipt};
use crate::error::{FlowError, Result};
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// Stage of the booking-payment state machine. Stages are never re-entered;
/// a new attempt starts over from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    Idle,
    OrderRequested,
    AwaitingGateway,
    Verifying,
    Committing,
    Succeeded,
}

/// Messages the orchestrator publishes for a presentation layer.
///
/// The flow never touches UI state directly; whoever listens on the event
/// channel decides what to show.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    StageChanged(AttemptStage),
    OrderCreated { order_id: String, amount: i64 },
    PaymentCaptured { payment_id: String },
}

/// Terminal success of a booking attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub receipt: Receipt,
}

/// Drives one booking attempt through order creation, the gateway
/// interaction, verification and the booking commit, surfacing exactly one
/// terminal outcome.
///
/// Attempts are strictly serialized: while one is in flight, a second call
/// is refused with [`FlowError::AttemptInFlight`] before any validation or
/// network work happens.
pub struct BookingOrchestrator {
    payments: PaymentBackendBox,
    bookings: BookingBackendBox,
    gateway: PaymentGatewayBox,
    events: Option<UnboundedSender<FlowEvent>>,
    attempt_guard: Mutex<()>,
}

impl BookingOrchestrator {
    pub fn new(
        payments: PaymentBackendBox,
        bookings: BookingBackendBox,
        gateway: PaymentGatewayBox,
    ) -> Self {
        Self {
            payments,
            bookings,
            gateway,
            events: None,
            attempt_guard: Mutex::new(()),
        }
    }

    /// Publishes stage transitions and identifiers on `events`.
    pub fn with_events(mut self, events: UnboundedSender<FlowEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: FlowEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver just means nobody is watching.
            let _ = events.send(event);
        }
    }

    fn enter(&self, stage: AttemptStage) {
        tracing::debug!(?stage, "attempt stage changed");
        self.emit(FlowEvent::StageChanged(stage));
    }

    /// Runs one booking attempt end to end.
    ///
    /// Local validation happens before any network call; a request that
    /// fails it never creates an order. Cancellation is only possible at the
    /// gateway prompt; once verification starts the attempt runs to a
    /// terminal state. A commit failure after a verified payment comes back
    /// as the elevated [`FlowError::PaidButNotBooked`].
    pub async fn attempt_booking(
        &self,
        request: BookingRequest,
        customer: CustomerInfo,
    ) -> Result<BookingConfirmation> {
        let _guard = self
            .attempt_guard
            .try_lock()
            .map_err(|_| FlowError::AttemptInFlight)?;

        self.enter(AttemptStage::Idle);
        request.validate(Utc::now().date_naive())?;

        self.enter(AttemptStage::OrderRequested);
        tracing::info!(room = %request.room_id, user = request.user_id, "requesting payment order");
        let order = self
            .payments
            .create_order(&request)
            .await
            .map_err(|e| FlowError::OrderCreation(e.to_string()))?;
        self.emit(FlowEvent::OrderCreated {
            order_id: order.order_id.clone(),
            amount: order.amount,
        });

        self.enter(AttemptStage::AwaitingGateway);
        let captured = match self.gateway.collect(&order).await {
            GatewayOutcome::Success(captured) => captured,
            GatewayOutcome::Failure(reason) => {
                tracing::warn!(%reason, order = %order.order_id, "gateway reported failure");
                return Err(FlowError::Gateway(reason));
            }
        };
        self.emit(FlowEvent::PaymentCaptured {
            payment_id: captured.payment_id.clone(),
        });

        self.enter(AttemptStage::Verifying);
        let verdict = self
            .payments
            .verify_payment(&captured)
            .await
            .map_err(|e| FlowError::VerificationUnreachable(e.to_string()))?;
        if !verdict.is_success() {
            let message = verdict
                .message
                .unwrap_or_else(|| "payment verification failed".to_string());
            tracing::warn!(order = %captured.order_id, %message, "verification rejected");
            return Err(FlowError::VerificationRejected(message));
        }

        self.enter(AttemptStage::Committing);
        let booking = self
            .bookings
            .create_booking(&request, &captured)
            .await
            .map_err(|e| {
                tracing::error!(
                    order = %captured.order_id,
                    payment = %captured.payment_id,
                    "booking commit failed after verified payment"
                );
                FlowError::PaidButNotBooked {
                    order_id: captured.order_id.clone(),
                    payment_id: captured.payment_id.clone(),
                    message: e.to_string(),
                }
            })?;

        self.enter(AttemptStage::Succeeded);
        tracing::info!(booking = booking.booking_id, "booking confirmed");
        let receipt = build_receipt(&captured, &booking, &order, &customer, Utc::now());
        Ok(BookingConfirmation { booking, receipt })
    }
}
