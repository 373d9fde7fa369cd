mod common;

use chrono::{Duration, Utc};
use common::{
    ParkedPrompt, RoomClosingPrompt, ScriptedPrompt, customer, future_request, instant_gateway,
    orchestrator, seeded_backend,
};
use lodgeflow::application::orchestrator::{AttemptStage, FlowEvent};
use lodgeflow::domain::booking::BookingStatus;
use lodgeflow::domain::payment::GatewayFailure;
use lodgeflow::domain::ports::PromptChoice;
use lodgeflow::error::{FailureStage, FlowError};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};

#[tokio::test]
async fn test_happy_path_confirms_booking_with_receipt() {
    let backend = seeded_backend().await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let orchestrator = orchestrator(&backend, gateway);

    let confirmation = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .expect("attempt should succeed");

    assert_eq!(confirmation.booking.status, BookingStatus::Confirmed);
    assert_eq!(confirmation.booking.room_id, "101");

    // The receipt references the persisted booking and the captured payment.
    assert_eq!(confirmation.receipt.booking_id, confirmation.booking.booking_id);
    assert_eq!(confirmation.receipt.payment_id, confirmation.booking.payment_id);
    assert_eq!(confirmation.receipt.order_id, confirmation.booking.order_id);
    assert_eq!(confirmation.receipt.amount, 250_000);

    let persisted = backend.bookings().await;
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0], confirmation.booking);
    assert_eq!(backend.verification_calls().await, 1);
    assert_eq!(backend.commit_calls().await, 1);
}

#[tokio::test]
async fn test_user_cancellation_never_reaches_verifier() {
    let backend = seeded_backend().await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Cancel)), true);
    let orchestrator = orchestrator(&backend, gateway);

    let err = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Gateway(GatewayFailure::UserCancelled)
    ));
    assert_eq!(err.stage(), FailureStage::Payment);
    assert_eq!(backend.verification_calls().await, 0);
    assert_eq!(backend.commit_calls().await, 0);
    assert!(backend.bookings().await.is_empty());
}

#[tokio::test]
async fn test_declined_settlement_never_reaches_verifier() {
    let backend = seeded_backend().await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), false);
    let orchestrator = orchestrator(&backend, gateway);

    let err = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Gateway(GatewayFailure::InsufficientFunds)
    ));
    assert_eq!(backend.verification_calls().await, 0);
}

#[tokio::test]
async fn test_verification_rejection_never_reaches_commit() {
    let backend = seeded_backend().await;
    backend.set_reject_verification(true).await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let orchestrator = orchestrator(&backend, gateway);

    let err = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap_err();

    match &err {
        FlowError::VerificationRejected(message) => {
            assert_eq!(message, "Payment verification failed");
        }
        other => panic!("expected verification rejection, got {other:?}"),
    }
    assert_eq!(err.stage(), FailureStage::Verification);
    assert_eq!(backend.verification_calls().await, 1);
    assert_eq!(backend.commit_calls().await, 0);
    assert!(backend.bookings().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_verifier_is_not_a_rejection() {
    let backend = seeded_backend().await;
    backend.set_verification_unreachable(true).await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let orchestrator = orchestrator(&backend, gateway);

    let err = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::VerificationUnreachable(_)));
    assert_eq!(err.stage(), FailureStage::Verification);
    assert_eq!(backend.commit_calls().await, 0);
}

#[tokio::test]
async fn test_room_lost_after_payment_is_paid_but_not_booked() {
    let backend = seeded_backend().await;
    let gateway = instant_gateway(
        Box::new(RoomClosingPrompt {
            backend: backend.clone(),
            room: "101".to_string(),
        }),
        true,
    );
    let orchestrator = orchestrator(&backend, gateway);

    let err = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap_err();

    match &err {
        FlowError::PaidButNotBooked { message, .. } => {
            assert!(message.contains("no longer available"));
        }
        other => panic!("expected paid-but-not-booked, got {other:?}"),
    }
    assert_eq!(err.stage(), FailureStage::Commit);
    assert!(err.needs_support());

    // Verification happened, the commit was attempted, no booking exists.
    assert_eq!(backend.verification_calls().await, 1);
    assert_eq!(backend.commit_calls().await, 1);
    assert!(backend.bookings().await.is_empty());
}

#[tokio::test]
async fn test_past_check_in_fails_before_any_network_call() {
    let backend = seeded_backend().await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let orchestrator = orchestrator(&backend, gateway);

    let mut request = future_request("101");
    request.check_in = Utc::now().date_naive() - Duration::days(1);

    let err = orchestrator
        .attempt_booking(request, customer())
        .await
        .unwrap_err();

    match &err {
        FlowError::Validation { field, .. } => assert_eq!(*field, "checkInDate"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(err.stage(), FailureStage::Validation);
    assert_eq!(backend.verification_calls().await, 0);
    assert!(backend.bookings().await.is_empty());
}

#[tokio::test]
async fn test_second_attempt_is_refused_while_one_is_in_flight() {
    let backend = seeded_backend().await;
    let release = Arc::new(Notify::new());
    let gateway = instant_gateway(
        Box::new(ParkedPrompt {
            release: release.clone(),
        }),
        true,
    );
    let orchestrator = Arc::new(orchestrator(&backend, gateway));

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .attempt_booking(future_request("101"), customer())
                .await
        })
    };

    // Let the first attempt reach the parked prompt.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let err = orchestrator
        .attempt_booking(future_request("102"), customer())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::AttemptInFlight));

    release.notify_one();
    let first = first.await.unwrap().unwrap_err();
    assert!(matches!(
        first,
        FlowError::Gateway(GatewayFailure::UserCancelled)
    ));

    // Once the first attempt terminated, a fresh one goes through.
    let backend2 = backend.clone();
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let orchestrator = common::orchestrator(&backend2, gateway);
    assert!(
        orchestrator
            .attempt_booking(future_request("102"), customer())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_event_stream_for_successful_attempt() {
    let backend = seeded_backend().await;
    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let orchestrator = common::orchestrator(&backend, gateway).with_events(events_tx);

    let confirmation = orchestrator
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap();
    drop(orchestrator);

    let mut events = Vec::new();
    while let Some(event) = events_rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            FlowEvent::StageChanged(AttemptStage::Idle),
            FlowEvent::StageChanged(AttemptStage::OrderRequested),
            FlowEvent::OrderCreated {
                order_id: confirmation.receipt.order_id.clone(),
                amount: 250_000,
            },
            FlowEvent::StageChanged(AttemptStage::AwaitingGateway),
            FlowEvent::PaymentCaptured {
                payment_id: confirmation.receipt.payment_id.clone(),
            },
            FlowEvent::StageChanged(AttemptStage::Verifying),
            FlowEvent::StageChanged(AttemptStage::Committing),
            FlowEvent::StageChanged(AttemptStage::Succeeded),
        ]
    );
}

#[tokio::test]
async fn test_each_attempt_gets_a_fresh_order() {
    let backend = seeded_backend().await;

    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), false);
    let first = orchestrator(&backend, gateway);
    let err = first
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Gateway(_)));

    let gateway = instant_gateway(Box::new(ScriptedPrompt(PromptChoice::Pay)), true);
    let second = orchestrator(&backend, gateway);
    let confirmation = second
        .attempt_booking(future_request("101"), customer())
        .await
        .unwrap();

    // The failed attempt's order was not reused.
    assert_ne!(confirmation.receipt.order_id, "order_0000000001");
    assert_eq!(confirmation.receipt.order_id, "order_0000000002");
}
