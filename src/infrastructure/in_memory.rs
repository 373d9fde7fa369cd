use crate::domain::booking::{Booking, BookingRequest, BookingStatus};
use crate::domain::payment::{
    CapturedPayment, PaymentOrder, VerificationStatus, VerifiedPayment,
};
use crate::domain::ports::{BookingBackend, PaymentBackend};
use crate::error::BackendError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Room catalog entry held by the simulated backend.
#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: String,
    /// Nightly price in major units.
    pub price: Decimal,
    pub available: bool,
}

#[derive(Default)]
struct BackendState {
    rooms: HashMap<String, Room>,
    bookings: Vec<Booking>,
    issued_orders: HashSet<String>,
    next_order: u64,
    next_booking: u64,
    verification_calls: u64,
    commit_calls: u64,
    reject_verification: bool,
    verification_unreachable: bool,
}

/// In-memory stand-in for the hotel REST backend.
///
/// Backs the three endpoints the flow consumes: order creation, payment
/// verification and booking creation. Cloning shares the same state, so a
/// test can keep a handle while the orchestrator owns boxed copies.
#[derive(Default, Clone)]
pub struct InMemoryBackend {
    inner: Arc<RwLock<BackendState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_room(&self, room_id: impl Into<String>, price: Decimal) {
        let room_id = room_id.into();
        let mut state = self.inner.write().await;
        state.rooms.insert(
            room_id.clone(),
            Room {
                room_id,
                price,
                available: true,
            },
        );
    }

    /// Marks a room unavailable, as if someone else just booked it.
    pub async fn close_room(&self, room_id: &str) {
        let mut state = self.inner.write().await;
        if let Some(room) = state.rooms.get_mut(room_id) {
            room.available = false;
        }
    }

    /// Makes the verification endpoint reject every claimed payment.
    pub async fn set_reject_verification(&self, reject: bool) {
        self.inner.write().await.reject_verification = reject;
    }

    /// Makes the verification endpoint unreachable at the transport level.
    pub async fn set_verification_unreachable(&self, unreachable: bool) {
        self.inner.write().await.verification_unreachable = unreachable;
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.clone()
    }

    pub async fn verification_calls(&self) -> u64 {
        self.inner.read().await.verification_calls
    }

    pub async fn commit_calls(&self) -> u64 {
        self.inner.read().await.commit_calls
    }
}

#[async_trait]
impl PaymentBackend for InMemoryBackend {
    async fn create_order(&self, request: &BookingRequest) -> Result<PaymentOrder, BackendError> {
        let mut state = self.inner.write().await;

        let room = state
            .rooms
            .get(&request.room_id)
            .ok_or_else(|| BackendError::Rejected("Room not found".to_string()))?;
        if !room.available {
            return Err(BackendError::Rejected(format!(
                "Room {} is not available",
                request.room_id
            )));
        }

        let price = room.price.round_dp(2);
        let amount = (price * Decimal::from(100))
            .round()
            .to_i64()
            .ok_or_else(|| BackendError::Rejected("Room price out of range".to_string()))?;

        state.next_order += 1;
        let order_id = format!("order_{:010}", state.next_order);
        state.issued_orders.insert(order_id.clone());

        Ok(PaymentOrder {
            order_id,
            amount,
            currency: "INR".to_string(),
            room_id: request.room_id.clone(),
            room_price: price,
        })
    }

    async fn verify_payment(
        &self,
        captured: &CapturedPayment,
    ) -> Result<VerifiedPayment, BackendError> {
        let mut state = self.inner.write().await;
        state.verification_calls += 1;

        if state.verification_unreachable {
            return Err(BackendError::Transport(
                "payment verification endpoint unreachable".to_string(),
            ));
        }
        if state.reject_verification {
            return Ok(VerifiedPayment {
                status: VerificationStatus::Failed,
                message: Some("Payment verification failed".to_string()),
            });
        }
        // A stale or fabricated order id is an explicit rejection, not a
        // transport failure.
        if !state.issued_orders.contains(&captured.order_id) {
            return Ok(VerifiedPayment {
                status: VerificationStatus::Failed,
                message: Some(format!("Unknown order {}", captured.order_id)),
            });
        }

        Ok(VerifiedPayment {
            status: VerificationStatus::Success,
            message: Some("Payment verified successfully".to_string()),
        })
    }
}

#[async_trait]
impl BookingBackend for InMemoryBackend {
    async fn create_booking(
        &self,
        request: &BookingRequest,
        captured: &CapturedPayment,
    ) -> Result<Booking, BackendError> {
        let mut state = self.inner.write().await;
        state.commit_calls += 1;

        let room = state
            .rooms
            .get_mut(&request.room_id)
            .ok_or_else(|| BackendError::Rejected("Room not found".to_string()))?;
        if !room.available {
            return Err(BackendError::Rejected(format!(
                "Room {} is no longer available",
                request.room_id
            )));
        }
        room.available = false;

        state.next_booking += 1;
        let booking = Booking {
            booking_id: state.next_booking,
            room_id: request.room_id.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            special_requests: request.special_requests.clone(),
            status: BookingStatus::Confirmed,
            payment_id: captured.payment_id.clone(),
            order_id: captured.order_id.clone(),
        };
        state.bookings.push(booking.clone());
        Ok(booking)
    }
}
