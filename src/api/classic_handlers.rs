//! HTTP request handlers for the classic API (root-level routes)

use crate::api::handlers::{self, authenticate, build_report, today};
use crate::api::admin_view;
use crate::api::models::{
    AdminViewQuery, BannerResponse, BookRequest, BookResponse, ClassicAttendanceRequest,
    ClassicAttendanceResponse, ClassicLoginResponse, ClassicSlot, ClassicSlotsResponse,
    LoginRequest, RegisterRequest, RegisterResponse, ReportsResponse,
};
use crate::auth::session_token;
use crate::error::{AppError, ErrorResponse, Result};
use crate::storage::{AttendanceMode, BookingOutcome, Role};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = BannerResponse))
)]
pub async fn home() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Attachment Management System API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing field or invalid role", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn register(
    state: State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    handlers::register(state, payload).await
}

/// Check credentials and hand out a session token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = ClassicLoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ClassicLoginResponse>> {
    let Json(request) = payload?;
    let (email, password) = request.validate()?;
    let user = authenticate(&state.database, &email, &password).await?;

    Ok(Json(ClassicLoginResponse {
        message: "Login successful".to_string(),
        user_id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        session_token: session_token(),
    }))
}

/// List slots that still have room
#[utoipa::path(
    get,
    path = "/slots",
    tag = "Slots",
    responses((status = 200, description = "Available slots, earliest first", body = ClassicSlotsResponse))
)]
pub async fn list_slots(State(state): State<Arc<AppState>>) -> Result<Json<ClassicSlotsResponse>> {
    let slots: Vec<ClassicSlot> = state
        .database
        .list_available_slots()
        .await?
        .into_iter()
        .map(ClassicSlot::from)
        .collect();

    Ok(Json(ClassicSlotsResponse {
        total: slots.len(),
        slots,
    }))
}

/// Book a slot, or the next open one when no slot is given
#[utoipa::path(
    post,
    path = "/book",
    tag = "Slots",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Slot booked", body = BookResponse),
        (status = 400, description = "Missing user id or slot fully booked", body = ErrorResponse),
        (status = 404, description = "Unknown user or slot, or nothing available", body = ErrorResponse),
    )
)]
pub async fn book_slot(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>)> {
    let Json(request) = payload?;
    let (user_id, slot_id) = request.validate_user()?;

    if state.database.get_user_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let slot_id = match slot_id {
        Some(slot_id) => slot_id,
        None => state
            .database
            .next_available_slot()
            .await?
            .map(|slot| slot.id)
            .ok_or_else(|| AppError::NotFound("No available slots".to_string()))?,
    };

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
        BookingOutcome::SlotFull => {
            Err(AppError::InvalidRequest("Slot is fully booked".to_string()))
        }
        BookingOutcome::AlreadyBooked => {
            Err(AppError::InvalidRequest("User already has a booking".to_string()))
        }
    }
}

/// Mark attendance for a student's booked slot, replacing any earlier mark
/// for the same date
#[utoipa::path(
    post,
    path = "/attendance",
    tag = "Attendance",
    request_body = ClassicAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = ClassicAttendanceResponse),
        (status = 400, description = "Invalid student, date or status", body = ErrorResponse),
        (status = 404, description = "Unknown student or no booking", body = ErrorResponse),
    )
)]
pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ClassicAttendanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClassicAttendanceResponse>)> {
    let Json(request) = payload?;
    let mark = request.validate(today())?;

    let student = state
        .database
        .get_user_by_id(mark.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    if student.role != Role::Student {
        return Err(AppError::InvalidRequest("User is not a student".to_string()));
    }

    let booking = state
        .database
        .get_booking_for_user(student.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No booking found for this student".to_string()))?;

    let date = mark.date.format("%Y-%m-%d").to_string();
    let attendance_id = state
        .database
        .record_attendance(student.id, booking.slot_id, &date, mark.status, AttendanceMode::Replace)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ClassicAttendanceResponse {
            message: "Attendance marked successfully".to_string(),
            attendance_id,
            student_name: student.name,
            date,
            status: mark.status,
        }),
    ))
}

/// Aggregate counts plus the latest bookings and attendance
#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    responses((status = 200, description = "Report", body = ReportsResponse))
)]
pub async fn reports(State(state): State<Arc<AppState>>) -> Result<Json<ReportsResponse>> {
    build_report(&state).await.map(Json)
}

/// HTML dump of every table, shown only when `email` is the admin email.
/// This is a convenience gate and does not authenticate anyone.
#[utoipa::path(
    get,
    path = "/admin-view",
    tag = "Reports",
    params(AdminViewQuery),
    responses(
        (status = 200, description = "HTML tables", content_type = "text/html", body = String),
        (status = 403, description = "Email missing or not the admin", body = ErrorResponse),
    )
)]
pub async fn admin_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminViewQuery>,
) -> Result<Html<String>> {
    let admin_email = state.settings.read().await.api.admin_email.clone();

    match query.email.as_deref().map(str::trim) {
        Some(email) if email.eq_ignore_ascii_case(&admin_email) => {
            info!("Admin view opened");
            admin_view::render(&state.database).await.map(Html)
        }
        Some(_) => {
            warn!("Admin view requested with a non-admin email");
            Err(AppError::Forbidden("Access denied".to_string()))
        }
        None => Err(AppError::Forbidden(
            "Access denied. Admin email required".to_string(),
        )),
    }
}
