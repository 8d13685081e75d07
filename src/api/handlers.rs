//! HTTP request handlers for the portal API (`/api/...`)

use crate::api::admin_view;
use crate::api::models::{
    AttendanceRequest, AttendanceResponse, BookRequest, BookResponse, HealthResponse,
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, ReportsResponse,
    SlotsResponse, UserSummary,
};
use crate::auth::{hash_password, verify_password};
use crate::error::{AppError, ErrorResponse, Result};
use crate::storage::{AttendanceMode, BookingOutcome, Database};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Today's date as stored in attendance records
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing field or invalid role", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(request) = payload?;
    let account = request.validate()?;

    let digest = hash_password(&account.password);
    let user_id = state
        .database
        .create_user(&account.name, &account.email, &digest, account.role)
        .await?;

    info!(user_id, role = %account.role, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

/// Check credentials and return the account
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = payload?;
    let (email, password) = request.validate()?;
    let user = authenticate(&state.database, &email, &password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

/// Look up the account and verify its password
pub(crate) async fn authenticate(db: &Database, email: &str, password: &str) -> Result<UserSummary> {
    let user = db
        .get_user_by_email(email)
        .await?
        .filter(|user| verify_password(password, &user.password));

    let Some(user) = user else {
        warn!("Rejected login attempt");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(UserSummary {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    })
}

/// List slots that still have room
#[utoipa::path(
    get,
    path = "/api/slots",
    tag = "Slots",
    responses((status = 200, description = "Available slots, earliest first", body = SlotsResponse))
)]
pub async fn list_slots(State(state): State<Arc<AppState>>) -> Result<Json<SlotsResponse>> {
    let slots = state.database.list_available_slots().await?;
    Ok(Json(SlotsResponse {
        total: slots.len(),
        slots,
    }))
}

/// Book a seat in a slot
#[utoipa::path(
    post,
    path = "/api/book",
    tag = "Slots",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Slot booked", body = BookResponse),
        (status = 400, description = "Missing user or slot id", body = ErrorResponse),
        (status = 404, description = "Unknown user or slot", body = ErrorResponse),
        (status = 409, description = "Slot full or user already booked", body = ErrorResponse),
    )
)]
pub async fn book_slot(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>)> {
    let Json(request) = payload?;
    let (user_id, slot_id) = request.validate()?;

    if state.database.get_user_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    match state.database.book_slot(user_id, slot_id).await? {
        BookingOutcome::Booked { booking_id, slot } => Ok((
            StatusCode::CREATED,
            Json(BookResponse {
                message: "Slot booked successfully".to_string(),
                booking_id,
                slot_id: slot.id,
                date: slot.date,
            }),
        )),
        BookingOutcome::SlotNotFound => Err(AppError::NotFound("Slot not found".to_string())),
        BookingOutcome::SlotFull => Err(AppError::Conflict("Slot is full".to_string())),
        BookingOutcome::AlreadyBooked => {
            Err(AppError::Conflict("User already has a booking".to_string()))
        }
    }
}

/// Mark attendance for today
#[utoipa::path(
    post,
    path = "/api/attendance",
    tag = "Attendance",
    request_body = AttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceResponse),
        (status = 400, description = "Missing field or invalid status", body = ErrorResponse),
        (status = 404, description = "Unknown user or slot", body = ErrorResponse),
        (status = 409, description = "Already marked today", body = ErrorResponse),
    )
)]
pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AttendanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AttendanceResponse>)> {
    let Json(request) = payload?;
    let (user_id, slot_id, status) = request.validate()?;

    if state.database.get_user_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    if state.database.get_slot(slot_id).await?.is_none() {
        return Err(AppError::NotFound("Slot not found".to_string()));
    }

    let date = today().format("%Y-%m-%d").to_string();
    let attendance_id = state
        .database
        .record_attendance(user_id, slot_id, &date, status, AttendanceMode::InsertOnly)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AttendanceResponse {
            message: "Attendance marked successfully".to_string(),
            attendance_id,
        }),
    ))
}

/// Aggregate counts plus the latest bookings and attendance
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    responses((status = 200, description = "Report", body = ReportsResponse))
)]
pub async fn reports(State(state): State<Arc<AppState>>) -> Result<Json<ReportsResponse>> {
    build_report(&state).await.map(Json)
}

pub(crate) async fn build_report(state: &AppState) -> Result<ReportsResponse> {
    let limit = state.settings.read().await.api.recent_limit;

    let summary = state.database.summary().await?;
    let recent_bookings = state.database.recent_bookings(limit).await?;
    let recent_attendance = state.database.recent_attendance(limit).await?;

    Ok(ReportsResponse {
        summary,
        recent_bookings,
        recent_attendance,
    })
}

/// HTML dump of every table
#[utoipa::path(
    get,
    path = "/api/admin-view",
    tag = "Reports",
    responses((status = 200, description = "HTML tables", content_type = "text/html", body = String))
)]
pub async fn admin_view(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    admin_view::render(&state.database).await.map(Html)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service status", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_ok = state.database.ping().await;

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "ok" } else { "unavailable" }.to_string(),
    })
}
