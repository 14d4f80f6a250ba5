//! Integration tests for `POST /api/v1/executions`.

mod common;

use axum::http::StatusCode;
use common::{body_json, lazy_pool, FakeExecutions, RecordingDispatch, TestApp, N8N_BASE_URL};
use productflow_api::config::OrchestratorMode;
use serde_json::json;

fn app(executions: FakeExecutions) -> TestApp {
    TestApp::with(
        lazy_pool(),
        RecordingDispatch::replying(200, json!({ "message": "Workflow was started" })),
        executions,
        OrchestratorMode::Live,
    )
}

#[tokio::test]
async fn stop_reports_success_with_a_warning_when_the_engine_fails() {
    let app = app(FakeExecutions {
        stop_fails: true,
        ..Default::default()
    });

    let response = app
        .post("/api/v1/executions", json!({ "action": "stop", "execution_id": "812" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["stopped"], false);
    assert!(body["warning"].is_string());
    assert_eq!(app.executions.calls(), vec!["stop:812"]);
}

#[tokio::test]
async fn stop_confirms_when_the_engine_accepts() {
    let app = app(FakeExecutions::default());

    let response = app
        .post("/api/v1/executions", json!({ "action": "stop", "execution_id": 812 }))
        .await;

    let body = body_json(response).await;
    assert_eq!(body["stopped"], true);
    assert!(body.get("warning").is_none());
    assert_eq!(body["data"]["status"], "canceled");
}

#[tokio::test]
async fn status_relays_engine_errors() {
    let app = app(FakeExecutions::default());

    let response = app
        .post("/api/v1/executions", json!({ "action": "status", "execution_id": "missing-1" }))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(body["details"]["message"], "Execution missing-1 not found");
}

#[tokio::test]
async fn resume_posts_the_product_to_the_resume_webhook() {
    let app = app(FakeExecutions::default());

    let response = app
        .post(
            "/api/v1/executions",
            json!({
                "action": "resume",
                "product_id": "p1",
                "product": { "id": "p1", "name": "Widget" }
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["message"], "Workflow was started");

    let calls = app.dispatch.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, format!("{N8N_BASE_URL}/webhook/generation-resume"));
    assert_eq!(calls[0].1["resume_from_checkpoint"], true);
    assert_eq!(calls[0].1["product"]["name"], "Widget");
    assert!(app.executions.calls().is_empty());
}

#[tokio::test]
async fn list_running_returns_data_and_count() {
    let app = app(FakeExecutions::default());

    let response = app
        .post("/api/v1/executions", json!({ "action": "list-running" }))
        .await;

    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(app.executions.calls(), vec!["list:20"]);
}

#[tokio::test]
async fn missing_parameters_are_named() {
    let app = app(FakeExecutions::default());

    let response = app
        .post("/api/v1/executions", json!({ "action": "status" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["missing"], json!(["execution_id"]));
    assert!(app.executions.calls().is_empty());
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let app = app(FakeExecutions::default());

    let response = app
        .post("/api/v1/executions", json!({ "action": "restart" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNKNOWN_ACTION");
    assert_eq!(body["error"], "Unknown action: restart");
    assert_eq!(
        body["supported"],
        json!(["stop", "status", "resume", "list-running"])
    );
}

#[tokio::test]
async fn execution_ids_that_would_leave_the_executions_path_are_rejected() {
    let app = app(FakeExecutions::default());

    for action in ["stop", "status"] {
        let response = app
            .post(
                "/api/v1/executions",
                json!({ "action": action, "execution_id": "../workflows/5/deactivate?x=" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
    assert!(app.executions.calls().is_empty());
}
