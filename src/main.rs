use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use clap::Parser;
use lodgeflow::application::orchestrator::{BookingOrchestrator, FlowEvent};
use lodgeflow::domain::booking::BookingRequest;
use lodgeflow::domain::customer::CustomerInfo;
use lodgeflow::domain::ports::PromptChoice;
use lodgeflow::error::FlowError;
use lodgeflow::infrastructure::gateway::{AutoPrompt, GatewayConfig, GatewaySimulator};
use lodgeflow::infrastructure::in_memory::InMemoryBackend;
use lodgeflow::interfaces::receipt::renderer::{ReceiptWriter, download_file_name};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal_macros::dec;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Books a room against a simulated hotel backend, driving the full
/// order -> gateway -> verify -> commit -> receipt pipeline.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Room to book (the demo catalog has rooms 101, 102 and 103)
    #[arg(long, default_value = "101")]
    room: String,

    /// Check-in date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    check_in: Option<NaiveDate>,

    /// Number of nights to stay
    #[arg(long, default_value_t = 1)]
    nights: u32,

    /// Number of guests
    #[arg(long, default_value_t = 2)]
    guests: u8,

    /// Optional special request passed through to the booking
    #[arg(long)]
    special_request: Option<String>,

    /// Cancel at the payment prompt instead of paying
    #[arg(long)]
    cancel: bool,

    /// Probability that the simulated settlement succeeds
    #[arg(long, default_value_t = 0.9)]
    success_rate: f64,

    /// Simulated settlement delay in milliseconds
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,

    /// Write the receipt HTML to this file on success
    #[arg(long)]
    receipt_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lodgeflow=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let backend = InMemoryBackend::new();
    backend.add_room("101", dec!(2500.00)).await;
    backend.add_room("102", dec!(3200.00)).await;
    backend.add_room("103", dec!(4750.50)).await;

    let choice = if cli.cancel {
        PromptChoice::Cancel
    } else {
        PromptChoice::Pay
    };
    let gateway = GatewaySimulator::new(
        Box::new(AutoPrompt::new(choice)),
        GatewayConfig {
            success_rate: cli.success_rate,
            processing_delay: Duration::from_millis(cli.delay_ms),
        },
    );

    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<FlowEvent>();
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                FlowEvent::StageChanged(stage) => tracing::info!(?stage, "stage"),
                FlowEvent::OrderCreated { order_id, amount } => {
                    tracing::info!(%order_id, amount, "payment order created");
                }
                FlowEvent::PaymentCaptured { payment_id } => {
                    tracing::info!(%payment_id, "payment captured");
                }
            }
        }
    });

    let orchestrator = BookingOrchestrator::new(
        Box::new(backend.clone()),
        Box::new(backend),
        Box::new(gateway),
    )
    .with_events(events_tx);

    let check_in = cli.check_in.unwrap_or_else(|| Utc::now().date_naive());
    let request = BookingRequest {
        room_id: cli.room,
        check_in,
        check_out: check_in + ChronoDuration::days(i64::from(cli.nights)),
        guests: cli.guests,
        special_requests: cli.special_request,
        user_id: 7,
    };
    let customer = CustomerInfo {
        user_id: 7,
        first_name: Some("Demo".to_string()),
        last_name: Some("Guest".to_string()),
        email: Some("demo.guest@example.com".to_string()),
        phone: None,
    };

    match orchestrator.attempt_booking(request, customer).await {
        Ok(confirmation) => {
            println!(
                "Booking confirmed: booking #{} for room {} ({} -> {})",
                confirmation.booking.booking_id,
                confirmation.booking.room_id,
                confirmation.booking.check_in,
                confirmation.booking.check_out,
            );
            println!(
                "Paid \u{20b9}{} (payment {}, order {})",
                confirmation.receipt.display_amount(),
                confirmation.receipt.payment_id,
                confirmation.receipt.order_id,
            );
            println!("Receipt {}", confirmation.receipt.receipt_number);

            if let Some(path) = cli.receipt_out {
                let file = File::create(&path).into_diagnostic()?;
                ReceiptWriter::new(file)
                    .write_receipt(&confirmation.receipt)
                    .into_diagnostic()?;
                println!(
                    "Receipt written to {} (suggested name: {})",
                    path.display(),
                    download_file_name(&confirmation.receipt)
                );
            }
            Ok(())
        }
        Err(err) => {
            if err.needs_support() {
                eprintln!("Your payment went through but the booking was not created.");
                eprintln!("Do not retry; contact support with the identifiers below.");
            }
            if let FlowError::Validation { field, .. } = &err {
                eprintln!("Check the {field} field and try again.");
            }
            Err(miette!("{err}"))
        }
    }
}
