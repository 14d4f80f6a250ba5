//! Integration tests for products, automation runs and the webhook outbox.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, RecordingDispatch, TestApp};
use productflow_db::models::webhook_attempt::{AttemptOutcome, NewWebhookAttempt};
use productflow_db::repositories::WebhookAttemptRepo;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

async fn create(app: &TestApp, body: Value) -> Value {
    let response = app.post("/api/v1/products", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn widget() -> Value {
    json!({ "user_id": Uuid::new_v4(), "name": "Widget", "metadata": { "source": "manual" } })
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_to_new(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));
    let mut events = app.event_bus.subscribe();

    let product = create(&app, widget()).await;

    assert_eq!(product["status"], "new");
    assert_eq!(product["version"], 1);
    assert_eq!(product["metadata"]["source"], "manual");
    assert_eq!(events.recv().await.unwrap().event_type, "product.created");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_input(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));

    let response = app
        .post("/api/v1/products", json!({ "user_id": Uuid::new_v4(), "name": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = app
        .post(
            "/api/v1/products",
            json!({ "user_id": Uuid::new_v4(), "name": "Widget", "metadata": [1, 2] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/v1/products",
            json!({ "user_id": Uuid::new_v4(), "name": "Widget", "amazon_link": "not a url" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_and_list_products(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));
    let owner = Uuid::new_v4();
    let product = create(&app, json!({ "user_id": owner, "name": "A" })).await;
    create(&app, json!({ "user_id": owner, "name": "B" })).await;
    create(&app, widget()).await;

    let response = app.get(&format!("/api/v1/products/{}", product["id"].as_str().unwrap())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "A");

    let response = app.get(&format!("/api/v1/products?user_id={owner}")).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = app.get(&format!("/api/v1/products/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_merges_metadata_and_checks_version(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));
    let product = create(&app, widget()).await;
    let uri = format!("/api/v1/products/{}", product["id"].as_str().unwrap());

    let response = app
        .send(
            Method::PATCH,
            &uri,
            Some(json!({ "niche": "Kitchen", "metadata": { "note": "hi" }, "expected_version": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["niche"], "Kitchen");
    assert_eq!(updated["version"], 2);
    assert_eq!(updated["metadata"]["note"], "hi");
    assert_eq!(updated["metadata"]["source"], "manual");

    let response = app
        .send(Method::PATCH, &uri, Some(json!({ "niche": "Garden", "expected_version": 1 })))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .send(
            Method::PATCH,
            &format!("/api/v1/products/{}", Uuid::new_v4()),
            Some(json!({ "niche": "Garden", "expected_version": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_product(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));
    let product = create(&app, widget()).await;
    let uri = format!("/api/v1/products/{}", product["id"].as_str().unwrap());

    let response = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Automation runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_run_lifecycle(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));
    let product = create(&app, widget()).await;
    let base = format!(
        "/api/v1/products/{}/automation-runs",
        product["id"].as_str().unwrap()
    );

    let response = app.send(Method::PUT, &format!("{base}/research"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let run = body_json(response).await["data"].clone();
    assert_eq!(run["status"], "processing");
    assert_eq!(run["progress"], 0);

    let response = app
        .send(
            Method::PATCH,
            &format!("{base}/research"),
            Some(json!({ "progress": 60, "message": "Scraping reviews" })),
        )
        .await;
    let run = body_json(response).await["data"].clone();
    assert_eq!(run["progress"], 60);
    assert!(run["completed_at"].is_null());

    let response = app
        .send(
            Method::PATCH,
            &format!("{base}/research"),
            Some(json!({ "status": "completed", "progress": 100 })),
        )
        .await;
    let run = body_json(response).await["data"].clone();
    assert_eq!(run["status"], "completed");
    assert!(run["completed_at"].is_string());
    assert_eq!(run["message"], "Scraping reviews");

    let response = app.get(&base).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn automation_run_input_is_validated(pool: PgPool) {
    let app = TestApp::new(pool, RecordingDispatch::replying(200, json!({})));
    let product = create(&app, widget()).await;
    let base = format!(
        "/api/v1/products/{}/automation-runs",
        product["id"].as_str().unwrap()
    );
    app.send(Method::PUT, &format!("{base}/reviews"), None).await;

    let response = app
        .send(Method::PATCH, &format!("{base}/reviews"), Some(json!({ "progress": 101 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(Method::PATCH, &format!("{base}/reviews"), Some(json!({ "status": "running" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send(Method::PUT, &format!("{base}/tiktok"), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(Method::PATCH, &format!("{base}/ugc_scripts"), Some(json!({ "progress": 10 })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(
            Method::PUT,
            &format!("/api/v1/products/{}/automation-runs/research", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Webhook attempts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_attempt_can_be_retried(pool: PgPool) {
    let app = TestApp::new(pool.clone(), RecordingDispatch::replying(200, json!({ "ok": true })));
    let product = create(&app, widget()).await;
    let product_id: Uuid = product["id"].as_str().unwrap().parse().unwrap();

    let attempt = WebhookAttemptRepo::record(
        &pool,
        &NewWebhookAttempt {
            product_id,
            trigger_kind: "research".into(),
            url: "http://n8n.test/webhook/product-research".into(),
            payload: json!({ "product_id": product_id }),
            outcome: AttemptOutcome::unreachable("connection refused"),
        },
    )
    .await
    .unwrap();

    let response = app
        .post(&format!("/api/v1/webhook-attempts/{}/retry", attempt.id), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let retried = body_json(response).await["data"].clone();
    assert_eq!(retried["status"], "delivered");
    assert_eq!(retried["attempt_count"], 2);
    assert_eq!(retried["response_status_code"], 200);

    let calls = app.dispatch.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "http://n8n.test/webhook/product-research");
    assert_eq!(calls[0].1["product_id"], product_id.to_string());

    let response = app
        .get(&format!("/api/v1/products/{product_id}/webhook-attempts"))
        .await;
    assert_eq!(body_json(response).await["data"][0]["status"], "delivered");

    let response = app.post("/api/v1/webhook-attempts/999999/retry", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delivered_attempt_needs_force_to_resend(pool: PgPool) {
    let app = TestApp::new(pool.clone(), RecordingDispatch::replying(200, json!({ "ok": true })));
    let product = create(&app, widget()).await;
    let product_id: Uuid = product["id"].as_str().unwrap().parse().unwrap();

    let attempt = WebhookAttemptRepo::record(
        &pool,
        &NewWebhookAttempt {
            product_id,
            trigger_kind: "banner_generation".into(),
            url: "http://n8n.test/webhook/banner-generation".into(),
            payload: json!({ "product_id": product_id }),
            outcome: AttemptOutcome::from_response(200, &json!({ "ok": true })),
        },
    )
    .await
    .unwrap();
    let retry_uri = format!("/api/v1/webhook-attempts/{}/retry", attempt.id);

    let response = app.post(&retry_uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    assert!(app.dispatch.calls().is_empty());

    let response = app.post(&format!("{retry_uri}?force=true"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["attempt_count"], 2);
    assert_eq!(app.dispatch.calls().len(), 1);
}
