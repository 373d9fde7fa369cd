use async_trait::async_trait;
use chrono::{Duration, Utc};
use lodgeflow::application::orchestrator::BookingOrchestrator;
use lodgeflow::domain::booking::BookingRequest;
use lodgeflow::domain::customer::CustomerInfo;
use lodgeflow::domain::payment::PaymentOrder;
use lodgeflow::domain::ports::{OutcomeDraw, PaymentPrompt, PaymentPromptBox, PromptChoice};
use lodgeflow::infrastructure::gateway::GatewaySimulator;
use lodgeflow::infrastructure::in_memory::InMemoryBackend;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::Notify;

/// Request for a stay starting tomorrow; always passes local validation.
pub fn future_request(room: &str) -> BookingRequest {
    let check_in = Utc::now().date_naive() + Duration::days(1);
    BookingRequest {
        room_id: room.to_string(),
        check_in,
        check_out: check_in + Duration::days(2),
        guests: 2,
        special_requests: None,
        user_id: 7,
    }
}

pub fn customer() -> CustomerInfo {
    CustomerInfo {
        user_id: 7,
        first_name: Some("Asha".to_string()),
        last_name: Some("Rao".to_string()),
        email: Some("asha@example.com".to_string()),
        phone: Some("+91 98765 43210".to_string()),
    }
}

pub async fn seeded_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend.add_room("101", dec!(2500.00)).await;
    backend.add_room("102", dec!(3200.00)).await;
    backend
}

pub struct FixedDraw(pub bool);

impl OutcomeDraw for FixedDraw {
    fn settles(&self) -> bool {
        self.0
    }
}

/// Prompt that answers immediately with a fixed choice.
pub struct ScriptedPrompt(pub PromptChoice);

#[async_trait]
impl PaymentPrompt for ScriptedPrompt {
    async fn choose(&self, _order: &PaymentOrder) -> PromptChoice {
        self.0
    }
}

/// Prompt that takes the room away right before confirming, so the commit
/// lands on an unavailable room after the payment was captured.
pub struct RoomClosingPrompt {
    pub backend: InMemoryBackend,
    pub room: String,
}

#[async_trait]
impl PaymentPrompt for RoomClosingPrompt {
    async fn choose(&self, _order: &PaymentOrder) -> PromptChoice {
        self.backend.close_room(&self.room).await;
        PromptChoice::Pay
    }
}

/// Prompt that parks until released, keeping the attempt in flight.
pub struct ParkedPrompt {
    pub release: Arc<Notify>,
}

#[async_trait]
impl PaymentPrompt for ParkedPrompt {
    async fn choose(&self, _order: &PaymentOrder) -> PromptChoice {
        self.release.notified().await;
        PromptChoice::Cancel
    }
}

/// Gateway with no settlement delay and a forced draw.
pub fn instant_gateway(prompt: PaymentPromptBox, settles: bool) -> GatewaySimulator {
    GatewaySimulator::with_draw(prompt, Box::new(FixedDraw(settles)), StdDuration::ZERO)
}

pub fn orchestrator(backend: &InMemoryBackend, gateway: GatewaySimulator) -> BookingOrchestrator {
    BookingOrchestrator::new(
        Box::new(backend.clone()),
        Box::new(backend.clone()),
        Box::new(gateway),
    )
}
