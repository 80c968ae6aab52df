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

use doctor_cell::handlers;
use doctor_cell::models::CreateDoctorRequest;
use shared_config::AppConfig;
use shared_models::error::AppError;

fn test_config(base_url: &str) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        supabase_url: base_url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
    })
}

fn doctor_row(id: Uuid, name: &str, specialization: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "specialization": specialization,
        "contact": "0871234567",
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339()
    })
}

#[tokio::test]
async fn register_doctor_returns_the_stored_record() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(201)
            .set_body_json(json!([doctor_row(id, "Alice Murphy", "Cardiology")])))
        .mount(&server)
        .await;

    let result = handlers::register_doctor(
        State(test_config(&server.uri())),
        Json(CreateDoctorRequest {
            name: "Alice Murphy".to_string(),
            specialization: "Cardiology".to_string(),
            contact: "0871234567".to_string(),
        }),
    ).await;

    let Json(body) = result.expect("registration should succeed");
    assert_eq!(body["name"], "Alice Murphy");
    assert_eq!(body["specialization"], "Cardiology");
}

#[tokio::test]
async fn register_doctor_rejects_bad_contact_without_a_request() {
    // No mock mounted: validation must fail before any HTTP call is made.
    let server = MockServer::start().await;

    let result = handlers::register_doctor(
        State(test_config(&server.uri())),
        Json(CreateDoctorRequest {
            name: "Alice Murphy".to_string(),
            specialization: "Cardiology".to_string(),
            contact: "12345".to_string(),
        }),
    ).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn list_doctors_wraps_records_in_an_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_row(Uuid::new_v4(), "Alice Murphy", "Cardiology"),
            doctor_row(Uuid::new_v4(), "Brian Walsh", "Dermatology"),
        ])))
        .mount(&server)
        .await;

    let result = handlers::list_doctors(State(test_config(&server.uri()))).await;

    let Json(body) = result.expect("listing should succeed");
    assert_eq!(body["total"], 2);
    assert_eq!(body["doctors"][1]["name"], "Brian Walsh");
}

#[tokio::test]
async fn doctor_options_carry_the_display_label() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([doctor_row(id, "Alice Murphy", "Cardiology")])))
        .mount(&server)
        .await;

    let result = handlers::list_doctor_options(State(test_config(&server.uri()))).await;

    let Json(body) = result.expect("options should succeed");
    assert_eq!(body["options"][0]["label"], "Alice Murphy (Cardiology)");
    assert_eq!(body["options"][0]["id"], json!(id));
}

#[tokio::test]
async fn get_doctor_reports_not_found_for_unknown_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = handlers::get_doctor(
        State(test_config(&server.uri())),
        Path(Uuid::new_v4()),
    ).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
