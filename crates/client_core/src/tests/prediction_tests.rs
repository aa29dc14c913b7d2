use serde_json::json;
use shared::error::ErrorKind;

use super::*;
use crate::test_support::{closed_server_url, spawn_upload_server, RecordingView, Reply, ViewOp};

fn scan() -> FileHandle {
    FileHandle::new("scan.png", "image/png", b"\x89PNG".to_vec())
}

#[test]
fn maps_prediction_with_two_decimal_confidence() {
    let outcome = outcome_from_response(PredictResponse {
        error: None,
        prediction: Some("Potentially unhealthy".to_string()),
        confidence: Some(0.87654),
    });
    assert_eq!(
        outcome,
        PredictionOutcome::Prediction(PredictionDisplay {
            label: "Potentially unhealthy".to_string(),
            class: PredictionClass::Unhealthy,
            confidence_text: "Confidence: 87.65%".to_string(),
        })
    );
}

#[test]
fn error_wins_over_prediction_fields() {
    let outcome = outcome_from_response(PredictResponse {
        error: Some("No file selected".to_string()),
        prediction: Some("Healthy".to_string()),
        confidence: Some(1.0),
    });
    assert_eq!(
        outcome,
        PredictionOutcome::Error(FailureReport::server("No file selected"))
    );
}

#[test]
fn empty_error_does_not_hide_the_prediction() {
    let outcome = outcome_from_response(PredictResponse {
        error: Some(String::new()),
        prediction: Some("Healthy".to_string()),
        confidence: Some(0.5),
    });
    assert!(matches!(
        outcome,
        PredictionOutcome::Prediction(PredictionDisplay {
            class: PredictionClass::Healthy,
            ..
        })
    ));
}

#[test]
fn submit_is_enabled_only_with_a_file() {
    let view = Arc::new(RecordingView::default());
    let mut controller =
        PredictionController::new("http://127.0.0.1:5000", view.clone()).expect("controller");
    assert!(!controller.can_submit());

    controller.on_file_change(Some(scan()));
    assert!(controller.can_submit());
    controller.on_file_change(None);

    assert_eq!(
        view.ops(),
        vec![
            ViewOp::SubmitEnabled(false),
            ViewOp::SubmitEnabled(true),
            ViewOp::SubmitEnabled(false),
        ]
    );
}

#[tokio::test]
async fn submit_without_file_sends_nothing() {
    let (server_url, captured) = spawn_upload_server(Reply::Json(json!({}))).await;
    let view = Arc::new(RecordingView::default());
    let controller = PredictionController::new(&server_url, view).expect("controller");
    assert!(controller.submit().await.is_none());
    assert!(captured.lock().await.is_empty());
}

#[tokio::test]
async fn posts_the_file_field_and_renders_the_result() {
    let (server_url, captured) = spawn_upload_server(Reply::Json(
        json!({"prediction": "Healthy", "confidence": 0.9}),
    ))
    .await;
    let view = Arc::new(RecordingView::default());
    let mut controller = PredictionController::new(&server_url, view.clone()).expect("controller");
    controller.on_file_change(Some(scan()));

    let outcome = controller.submit().await.expect("submitted");
    let PredictionOutcome::Prediction(display) = outcome else {
        panic!("expected prediction");
    };
    assert_eq!(display.class, PredictionClass::Healthy);
    assert_eq!(display.confidence_text, "Confidence: 90.00%");
    assert!(view.ops().contains(&ViewOp::Prediction(display)));

    let fields = captured.lock().await.clone();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "file");
    assert_eq!(fields[0].file_name.as_deref(), Some("scan.png"));
}

#[tokio::test]
async fn unreachable_service_shows_prefixed_error() {
    let server_url = closed_server_url().await;
    let view = Arc::new(RecordingView::default());
    let mut controller = PredictionController::new(&server_url, view.clone()).expect("controller");
    controller.on_file_change(Some(scan()));

    let Some(PredictionOutcome::Error(failure)) = controller.submit().await else {
        panic!("expected error");
    };
    assert_eq!(failure.kind, ErrorKind::Transport);
    assert_eq!(view.errors(), vec![failure.message]);
}
