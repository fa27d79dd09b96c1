use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_cell::router::chat_routes;
use shared_config::AppConfig;

fn test_config(store_url: String, generator_url: String) -> AppConfig {
    AppConfig {
        store_url,
        store_api_key: "test-api-key".to_string(),
        generator_url,
        generator_api_key: "test-generator-key".to_string(),
        generator_model: "gemini-2.0-flash".to_string(),
        request_timeout_secs: 5,
        symptom_sufficiency_threshold: 2,
        strict_location_matching: false,
        booking_max_attempts: 3,
    }
}

fn roster_row(full_name: &str, specialty: &str, conditions: &[&str], location: &str, rating: f32) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "full_name": full_name,
        "specialty": specialty,
        "conditions": conditions,
        "location": location,
        "rating": rating,
        "availability_schedule": ["Mon 09:00"],
        "created_at": "2026-01-05T08:00:00Z",
        "updated_at": "2026-01-05T08:00:00Z"
    })
}

async fn create_session(app: &Router) -> Uuid {
    let request = Request::builder()
        .method("POST")
        .uri("/sessions")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json_response: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json_response["session_id"].as_str().unwrap().parse().unwrap()
}

async fn send_message(app: &Router, session_id: Uuid, content: &str, location: &str) -> serde_json::Value {
    let body = json!({ "content": content, "location": location });
    let request = Request::builder()
        .method("POST")
        .uri(format!("/sessions/{}/messages", session_id))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn second_symptom_turn_returns_ranked_doctors() {
    let mock_server = MockServer::start().await;
    let app = chat_routes(Arc::new(test_config(mock_server.uri(), mock_server.uri())));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            roster_row("Dr. Heart", "Cardiology", &["chest pain"], "Colombo", 4.5),
            roster_row("Dr. Family", "General Practitioner", &[], "Colombo", 4.0),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "That sounds worth a checkup." }] } }]
        })))
        .mount(&mock_server)
        .await;

    let session_id = create_session(&app).await;

    let first = send_message(&app, session_id, "I have chest pain", "Colombo").await;
    assert_eq!(first["phase"], "collecting");
    assert!(first["doctors"].as_array().unwrap().is_empty());

    let second = send_message(&app, session_id, "and shortness of breath", "Colombo").await;
    assert_eq!(second["phase"], "recommending");

    let doctors = second["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["full_name"], "Dr. Heart");
    assert!(doctors[0]["token"].as_str().unwrap().starts_with("[[doctor:"));
    assert!(second["message"].as_str().unwrap().contains("Dr. Heart"));
}

#[tokio::test]
async fn failed_generator_still_returns_the_deterministic_list() {
    let mock_server = MockServer::start().await;
    let app = chat_routes(Arc::new(test_config(mock_server.uri(), mock_server.uri())));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            roster_row("Dr. Heart", "Cardiology", &["chest pain"], "Colombo", 4.5),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("generator down"))
        .mount(&mock_server)
        .await;

    let session_id = create_session(&app).await;
    send_message(&app, session_id, "chest pain", "").await;
    let turn = send_message(&app, session_id, "heart palpitations too", "").await;

    let doctors = turn["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["full_name"], "Dr. Heart");
}

#[tokio::test]
async fn unavailable_roster_degrades_to_explicit_no_match() {
    let mock_server = MockServer::start().await;
    let app = chat_routes(Arc::new(test_config(mock_server.uri(), mock_server.uri())));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("roster down"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("generator down"))
        .mount(&mock_server)
        .await;

    let session_id = create_session(&app).await;
    let turn = send_message(&app, session_id, "I need a doctor", "").await;

    assert_eq!(turn["phase"], "recommending");
    assert!(turn["doctors"].as_array().unwrap().is_empty());
    assert!(turn["message"].as_str().unwrap().contains("couldn't find"));
}

#[tokio::test]
async fn more_doctors_rotates_the_suggestion() {
    let mock_server = MockServer::start().await;
    let app = chat_routes(Arc::new(test_config(mock_server.uri(), mock_server.uri())));

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            roster_row("Dr. First", "Dermatology", &["rash"], "", 4.9),
            roster_row("Dr. Second", "Dermatology", &["rash"], "", 4.5),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("generator down"))
        .mount(&mock_server)
        .await;

    let session_id = create_session(&app).await;
    send_message(&app, session_id, "itchy rash", "").await;
    let first = send_message(&app, session_id, "spreading on my arm", "").await;
    assert_eq!(first["doctors"][0]["full_name"], "Dr. First");

    let more = send_message(&app, session_id, "show me more doctors", "").await;
    assert_eq!(more["doctors"][0]["full_name"], "Dr. Second");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let mock_server = MockServer::start().await;
    let app = chat_routes(Arc::new(test_config(mock_server.uri(), mock_server.uri())));

    let body = json!({ "content": "hello" });
    let request = Request::builder()
        .method("POST")
        .uri(format!("/sessions/{}/messages", Uuid::new_v4()))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
