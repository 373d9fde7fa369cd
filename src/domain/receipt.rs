use super::booking::{Booking, BookingStatus};
use super::customer::CustomerInfo;
use super::payment::{CapturedPayment, PaymentOrder};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Self-contained projection of a completed booking-payment transaction.
///
/// Built once when an attempt succeeds and rendered from then on; it has no
/// lifecycle of its own and can be rebuilt at will from the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(rename = "receiptNumber")]
    pub receipt_number: String,
    #[serde(rename = "issuedAt")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "checkInDate")]
    pub check_in: chrono::NaiveDate,
    #[serde(rename = "checkOutDate")]
    pub check_out: chrono::NaiveDate,
    #[serde(rename = "guestCount")]
    pub guests: u8,
    #[serde(rename = "specialRequests", skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(rename = "bookingId")]
    pub booking_id: u64,
    #[serde(rename = "bookingStatus")]
    pub booking_status: BookingStatus,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Amount paid, in minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub customer: CustomerInfo,
}

impl Receipt {
    /// Amount paid in major units with two decimal places.
    pub fn display_amount(&self) -> Decimal {
        Decimal::new(self.amount, 2)
    }
}

/// Assembles the receipt projection.
///
/// Pure: no I/O, no clock reads, no failure modes. The same inputs always
/// produce the same receipt, which is what lets download and print reuse one
/// build without re-running the pipeline.
pub fn build_receipt(
    captured: &CapturedPayment,
    booking: &Booking,
    order: &PaymentOrder,
    customer: &CustomerInfo,
    issued_at: DateTime<Utc>,
) -> Receipt {
    Receipt {
        receipt_number: format!("REC-{}-{}", booking.booking_id, issued_at.timestamp_millis()),
        issued_at,
        room_id: booking.room_id.clone(),
        check_in: booking.check_in,
        check_out: booking.check_out,
        guests: booking.guests,
        special_requests: booking.special_requests.clone(),
        booking_id: booking.booking_id,
        booking_status: booking.status,
        payment_id: captured.payment_id.clone(),
        order_id: captured.order_id.clone(),
        amount: order.amount,
        currency: order.currency.clone(),
        customer: customer.clone(),
    }
}
