use crate::error::{FlowError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound the booking form allows for the guest count.
pub const MAX_GUESTS: u8 = 10;

/// A guest's intent to book a room, as collected from the booking form.
///
/// A request is validated locally before any network call; a request that
/// fails validation never produces a payment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "checkInDate")]
    pub check_in: NaiveDate,
    #[serde(rename = "checkOutDate")]
    pub check_out: NaiveDate,
    #[serde(rename = "guestCount")]
    pub guests: u8,
    #[serde(rename = "specialRequests", skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl BookingRequest {
    /// Checks the request against `today` (date-only, time of day ignored).
    ///
    /// Errors name the offending form field so the caller can point at it.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.room_id.trim().is_empty() {
            return Err(FlowError::Validation {
                field: "roomId",
                message: "room id must not be empty".to_string(),
            });
        }
        if self.check_in < today {
            return Err(FlowError::Validation {
                field: "checkInDate",
                message: "check-in date cannot be in the past".to_string(),
            });
        }
        if self.check_out <= self.check_in {
            return Err(FlowError::Validation {
                field: "checkOutDate",
                message: "check-out date must be after check-in date".to_string(),
            });
        }
        if self.guests < 1 || self.guests > MAX_GUESTS {
            return Err(FlowError::Validation {
                field: "guests",
                message: format!("number of guests must be between 1 and {MAX_GUESTS}"),
            });
        }
        Ok(())
    }

    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Lifecycle status of a persisted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

/// Booking record as persisted by the backend.
///
/// Owned by the backend; this crate only ever receives one from the
/// booking-creation endpoint and treats it as opaque return data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "bookingId")]
    pub booking_id: u64,
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "checkInDate")]
    pub check_in: NaiveDate,
    #[serde(rename = "checkOutDate")]
    pub check_out: NaiveDate,
    #[serde(rename = "guestCount")]
    pub guests: u8,
    #[serde(rename = "specialRequests", skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
}
