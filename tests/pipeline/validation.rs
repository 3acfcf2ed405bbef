use std::sync::Arc;
use std::time::Duration;

use mediator_rust::mediator::{DispatchError, LoggingBehavior, Mediator, Validators};
use mediator_rust::outcome::{DomainError, ValidationFailure};
use mediator_rust::CancellationToken;
use tokio::sync::Notify;

use crate::support::{
    Calls, Echo, EchoHandler, Fixed, Log, Rendezvous, Shout, ShoutHandler, Stalled,
};

#[tokio::test]
async fn no_validators_behaves_like_no_validation_behavior() {
    let plain = Mediator::builder()
        .behavior(LoggingBehavior)
        .handler::<Echo, _>(EchoHandler::new(Calls::default(), Log::default()))
        .build()
        .unwrap();
    let validated = Mediator::builder()
        .behavior(LoggingBehavior)
        .validation(Validators::new())
        .handler::<Echo, _>(EchoHandler::new(Calls::default(), Log::default()))
        .build()
        .unwrap();

    for text in ["", "hello", "  "] {
        let a = plain.send(Echo::new(text)).await.unwrap();
        let b = validated.send(Echo::new(text)).await.unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn failing_validator_short_circuits_outcome_response() {
    let calls = Calls::default();
    let mediator = Mediator::builder()
        .validation(
            Validators::new()
                .with::<Echo, _>(Fixed::passing())
                .with::<Echo, _>(Fixed::failing("text", "must not be empty")),
        )
        .handler::<Echo, _>(EchoHandler::new(calls.clone(), Log::default()))
        .build()
        .unwrap();

    let outcome = mediator.send(Echo::new("")).await.unwrap();

    let failure = outcome.unwrap_err();
    assert_eq!(failure.len(), 1);
    let DomainError::Validation(errors) = failure.first() else {
        panic!("expected a validation failure, got {failure}");
    };
    assert_eq!(
        errors.failures(),
        &[ValidationFailure::new("text", "must not be empty")]
    );
    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn response_without_failure_channel_raises_validation_error() {
    let calls = Calls::default();
    let mediator = Mediator::builder()
        .validation(
            Validators::new()
                .with::<Shout, _>(Fixed::passing())
                .with::<Shout, _>(Fixed::failing("text", "too quiet")),
        )
        .handler::<Shout, _>(ShoutHandler {
            calls: calls.clone(),
            log: Log::default(),
        })
        .build()
        .unwrap();

    let result = mediator.send(Shout { text: "hi".into() }).await;

    let Err(DispatchError::Validation(errors)) = result else {
        panic!("expected raised validation error");
    };
    assert_eq!(
        errors.failures(),
        &[ValidationFailure::new("text", "too quiet")]
    );
    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn failures_keep_registration_order_without_duplicates() {
    let mediator = Mediator::builder()
        .validation(
            Validators::new()
                .with::<Echo, _>(Fixed(vec![
                    ValidationFailure::new("a", "first"),
                    ValidationFailure::new("b", "second"),
                ]))
                .with::<Echo, _>(Fixed(vec![
                    ValidationFailure::new("c", "third"),
                    ValidationFailure::new("a", "first"),
                ])),
        )
        .handler::<Echo, _>(EchoHandler::new(Calls::default(), Log::default()))
        .build()
        .unwrap();

    let failure = mediator.send(Echo::new("x")).await.unwrap().unwrap_err();
    let errors = failure.first().as_validation().unwrap();

    let fields: Vec<&str> = errors.failures().iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn validators_run_concurrently() {
    // Each validator waits for the other; sequential execution would never finish.
    let barrier = Arc::new(tokio::sync::Barrier::new(2));
    let calls = Calls::default();
    let mediator = Mediator::builder()
        .validation(
            Validators::new()
                .with::<Echo, _>(Rendezvous(barrier.clone()))
                .with::<Echo, _>(Rendezvous(barrier)),
        )
        .handler::<Echo, _>(EchoHandler::new(calls.clone(), Log::default()))
        .build()
        .unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(5), mediator.send(Echo::new("ok")))
        .await
        .expect("validators should not run one after another")
        .unwrap();

    assert_eq!(outcome.unwrap(), "ok");
    assert_eq!(calls.count(), 1);
}

#[tokio::test]
async fn validation_only_applies_to_its_request_type() {
    let shout_calls = Calls::default();
    let mediator = Mediator::builder()
        .validation(Validators::new().with::<Echo, _>(Fixed::failing("text", "never")))
        .handler::<Echo, _>(EchoHandler::new(Calls::default(), Log::default()))
        .handler::<Shout, _>(ShoutHandler {
            calls: shout_calls.clone(),
            log: Log::default(),
        })
        .build()
        .unwrap();

    assert!(mediator.send(Echo::new("x")).await.unwrap().is_err());
    assert_eq!(mediator.send(Shout { text: "x".into() }).await.unwrap(), "X");
    assert_eq!(shout_calls.count(), 1);
}

#[tokio::test]
async fn cancellation_aborts_pending_validators() {
    let calls = Calls::default();
    let started = Arc::new(Notify::new());
    let mediator = Mediator::builder()
        .behavior(LoggingBehavior)
        .validation(
            Validators::new()
                .with::<Echo, _>(Fixed::passing())
                .with::<Echo, _>(Stalled(started.clone())),
        )
        .handler::<Echo, _>(EchoHandler::new(calls.clone(), Log::default()))
        .build()
        .unwrap();

    let token = CancellationToken::new();
    let dispatch = tokio::spawn({
        let token = token.clone();
        async move { mediator.send_with(Echo::new("stuck"), token).await }
    });

    tokio::time::timeout(Duration::from_secs(5), started.notified())
        .await
        .unwrap();
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), dispatch)
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(result, Err(DispatchError::Cancelled("Echo"))));
    assert_eq!(calls.count(), 0);
}
