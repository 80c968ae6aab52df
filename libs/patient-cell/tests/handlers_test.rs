use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{method, path};

use patient_cell::handlers;
use patient_cell::models::CreatePatientRequest;
use shared_config::AppConfig;
use shared_models::error::AppError;

fn test_config(base_url: &str) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        supabase_url: base_url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
    })
}

fn patient_row(id: Uuid, name: &str, age: i32) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "age": age,
        "contact": "0871234567",
        "created_at": Utc::now().to_rfc3339()
    })
}

#[tokio::test]
async fn register_patient_returns_the_stored_record() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201)
            .set_body_json(json!([patient_row(id, "John Doyle", 30)])))
        .mount(&server)
        .await;

    let result = handlers::register_patient(
        State(test_config(&server.uri())),
        Json(CreatePatientRequest {
            name: "John Doyle".to_string(),
            age: 30,
            contact: "0871234567".to_string(),
        }),
    ).await;

    let Json(body) = result.expect("registration should succeed");
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["name"], "John Doyle");
}

#[tokio::test]
async fn register_patient_rejects_invalid_age_without_a_request() {
    // No mock mounted: validation must fail before any HTTP call is made.
    let server = MockServer::start().await;

    let result = handlers::register_patient(
        State(test_config(&server.uri())),
        Json(CreatePatientRequest {
            name: "John Doyle".to_string(),
            age: 121,
            contact: "0871234567".to_string(),
        }),
    ).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn get_patient_reports_not_found_for_unknown_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = handlers::get_patient(
        State(test_config(&server.uri())),
        Path(Uuid::new_v4()),
    ).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
