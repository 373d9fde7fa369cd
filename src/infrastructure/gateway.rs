use crate::domain::payment::{CapturedPayment, GatewayFailure, GatewayOutcome, PaymentOrder};
use crate::domain::ports::{
    OutcomeDraw, OutcomeDrawBox, PaymentGateway, PaymentPrompt, PaymentPromptBox, PromptChoice,
};
use async_trait::async_trait;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use std::time::Duration;

/// Tunables for the simulated gateway. Neither value is a business rule;
/// both exist so tests and deployments can pick their own.
#[derive(Debug, Clone, Copy)]
pub struct GatewayConfig {
    /// Probability that a confirmed payment settles.
    pub success_rate: f64,
    /// Simulated settlement latency after the user confirms.
    pub processing_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            processing_delay: Duration::from_secs(2),
        }
    }
}

/// Settlement draw backed by the thread rng.
pub struct RandomDraw {
    success_rate: f64,
}

impl RandomDraw {
    pub fn new(success_rate: f64) -> Self {
        Self { success_rate }
    }
}

impl OutcomeDraw for RandomDraw {
    fn settles(&self) -> bool {
        thread_rng().r#gen::<f64>() < self.success_rate
    }
}

/// Prompt that always answers the same way. Useful for non-interactive
/// embeddings like the demo CLI.
pub struct AutoPrompt {
    choice: PromptChoice,
}

impl AutoPrompt {
    pub fn new(choice: PromptChoice) -> Self {
        Self { choice }
    }
}

#[async_trait]
impl PaymentPrompt for AutoPrompt {
    async fn choose(&self, _order: &PaymentOrder) -> PromptChoice {
        self.choice
    }
}

/// Stand-in for a third-party payment widget.
///
/// Asks the prompt for a confirm-or-cancel choice, waits out the simulated
/// settlement latency on confirmation, then draws the outcome. The wait is a
/// plain `tokio::time::sleep`, so the host stays responsive during it, and
/// cancellation resolves immediately with no delay. Every invocation returns
/// exactly one outcome.
pub struct GatewaySimulator {
    prompt: PaymentPromptBox,
    draw: OutcomeDrawBox,
    processing_delay: Duration,
}

impl GatewaySimulator {
    pub fn new(prompt: PaymentPromptBox, config: GatewayConfig) -> Self {
        Self {
            prompt,
            draw: Box::new(RandomDraw::new(config.success_rate)),
            processing_delay: config.processing_delay,
        }
    }

    /// Replaces the random draw, so tests can force either branch.
    pub fn with_draw(
        prompt: PaymentPromptBox,
        draw: OutcomeDrawBox,
        processing_delay: Duration,
    ) -> Self {
        Self {
            prompt,
            draw,
            processing_delay,
        }
    }
}

#[async_trait]
impl PaymentGateway for GatewaySimulator {
    async fn collect(&self, order: &PaymentOrder) -> GatewayOutcome {
        match self.prompt.choose(order).await {
            PromptChoice::Cancel => {
                tracing::info!(order = %order.order_id, "user cancelled at the payment prompt");
                GatewayOutcome::Failure(GatewayFailure::UserCancelled)
            }
            PromptChoice::Pay => {
                tracing::debug!(order = %order.order_id, "processing simulated settlement");
                tokio::time::sleep(self.processing_delay).await;

                if self.draw.settles() {
                    GatewayOutcome::Success(CapturedPayment {
                        order_id: order.order_id.clone(),
                        payment_id: fabricate_payment_id(),
                        signature: fabricate_signature(),
                    })
                } else {
                    GatewayOutcome::Failure(GatewayFailure::InsufficientFunds)
                }
            }
        }
    }
}

fn fabricate_payment_id() -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(14)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("pay_{suffix}")
}

fn fabricate_signature() -> String {
    format!("sig_{}", Utc::now().timestamp_millis())
}
