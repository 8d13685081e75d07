//! End-to-end tests for the portal variant (`/api/...` routes)

mod common;

use attachment_management::config::ApiVariant;
use attachment_management::storage::NewSlot;
use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app
        .post_json(
            "/api/register",
            json!({
                "name": "Dana Lee",
                "email": "dana@student.com",
                "password": "s3cret",
                "role": "student"
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user_id"], 7);

    let response = app
        .post_json("/api/login", json!({"email": "dana@student.com", "password": "s3cret"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], 7);
    assert_eq!(body["user"]["role"], "student");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app
        .post_json(
            "/api/register",
            json!({
                "name": "John Again",
                "email": "john@student.com",
                "password": "x",
                "role": "student"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["error"], "User with this email already exists");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app
        .post_json("/api/register", json!({"name": "No Email", "password": "x", "role": "student"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "All fields are required");

    let response = app
        .post_json(
            "/api/register",
            json!({"name": "Eve", "email": "eve@x.com", "password": "x", "role": "superuser"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Invalid role");

    let response = app.post_raw("/api/register", "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app
        .post_json("/api/login", json!({"email": "john@student.com", "password": "wrong"}))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "Invalid credentials");

    let response = app
        .post_json("/api/login", json!({"email": "nobody@student.com", "password": "password123"}))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.post_json("/api/login", json!({"email": "john@student.com"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Email and password are required");
}

#[tokio::test]
async fn test_list_slots() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app.get("/api/slots").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["total"], 5);
    assert_eq!(body["slots"][0]["date"], "2024-01-15");
    assert_eq!(body["slots"][0]["booked_count"], 1);
    assert_eq!(body["slots"][0]["max_capacity"], 5);
}

#[tokio::test]
async fn test_book_slot() {
    let app = spawn_app(ApiVariant::Portal).await;

    // Alice has no booking yet
    let response = app.post_json("/api/book", json!({"user_id": 4, "slot_id": 4})).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["message"], "Slot booked successfully");
    assert_eq!(body["slot_id"], 4);
    assert_eq!(body["date"], "2024-01-18");

    let slot = app.database.get_slot(4).await.unwrap().unwrap();
    assert_eq!(slot.booked_count, 1);
}

#[tokio::test]
async fn test_book_slot_failures() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app.post_json("/api/book", json!({"user_id": 4})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "User ID and slot ID are required");

    let response = app.post_json("/api/book", json!({"user_id": 99, "slot_id": 1})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "User not found");

    let response = app.post_json("/api/book", json!({"user_id": 4, "slot_id": 99})).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "Slot not found");

    // John already holds a booking
    let response = app.post_json("/api/book", json!({"user_id": 1, "slot_id": 2})).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["error"], "User already has a booking");
    assert_eq!(app.database.get_slot(2).await.unwrap().unwrap().booked_count, 1);
}

#[tokio::test]
async fn test_book_full_slot_conflicts() {
    let app = spawn_app(ApiVariant::Portal).await;
    let slot_id = app
        .database
        .create_slot(NewSlot {
            name: "Single Seat",
            date: "2024-02-01",
            time: "09:00-10:00",
            max_capacity: 1,
        })
        .await
        .unwrap();

    let response = app.post_json("/api/book", json!({"user_id": 4, "slot_id": slot_id})).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.post_json("/api/book", json!({"user_id": 5, "slot_id": slot_id})).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["error"], "Slot is full");

    // Full slots drop out of the listing
    let body = app.get("/api/slots").await.json();
    assert_eq!(body["total"], 5);
}

#[tokio::test]
async fn test_mark_attendance_once_per_day() {
    let app = spawn_app(ApiVariant::Portal).await;

    let request = json!({"user_id": 1, "slot_id": 1, "status": "late"});

    let response = app.post_json("/api/attendance", request.clone()).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["message"], "Attendance marked successfully");

    let response = app.post_json("/api/attendance", request).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    assert_eq!(app.database.count_attendance().await.unwrap(), 4);
}

#[tokio::test]
async fn test_mark_attendance_validation() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app
        .post_json("/api/attendance", json!({"user_id": 1, "slot_id": 1}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "User ID, slot ID, and status are required");

    let response = app
        .post_json("/api/attendance", json!({"user_id": 1, "slot_id": 1, "status": "sleeping"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Invalid status");

    let response = app
        .post_json("/api/attendance", json!({"user_id": 1, "slot_id": 42, "status": "present"}))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app.get("/api/reports").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["summary"]["total_users"], 6);
    assert_eq!(body["summary"]["total_slots"], 5);
    assert_eq!(body["summary"]["total_bookings"], 3);
    assert_eq!(body["summary"]["total_attendance"], 3);
    assert_eq!(body["summary"]["students"], 3);
    assert_eq!(body["summary"]["supervisors"], 2);
    assert_eq!(body["recent_bookings"].as_array().unwrap().len(), 3);
    assert_eq!(body["recent_attendance"][0]["date"], "2024-01-17");
}

#[tokio::test]
async fn test_admin_view_is_open() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app.get("/api/admin-view").await;
    assert_eq!(response.status, StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<h2>Users (6)</h2>"));
    assert!(html.contains("jane@student.com"));
}

#[tokio::test]
async fn test_pages_and_docs() {
    let app = spawn_app(ApiVariant::Portal).await;

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "<html>login.html</html>");

    let response = app.post_raw("/login", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "<html>login.html</html>");

    let response = app.get("/student").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "<html>dashboard.html</html>");

    // Sub-page template not present in this directory
    let response = app.get("/student/logbook").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get("/api-docs/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);
    let docs = response.json();
    assert!(docs["paths"].get("/api/book").is_some());
    assert!(docs["components"]["schemas"].get("ErrorResponse").is_some());
    assert_eq!(
        docs["paths"]["/api/book"]["post"]["responses"]["409"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/ErrorResponse"
    );
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app(ApiVariant::Portal).await;

    let body = app.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}
