//! API request and response models

use crate::error::{AppError, Result};
use crate::storage::{AttendanceDetail, AttendanceStatus, BookingDetail, ReportSummary, Role, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Treat absent and empty strings alike
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Treat absent and non-positive ids alike
fn present_id(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}

/// Registration request
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// One of student, industry_supervisor, school_supervisor, admin
    #[serde(default)]
    pub role: Option<String>,
}

/// A registration that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewAccount> {
        let (Some(name), Some(email), Some(password), Some(role)) = (
            present(self.name),
            present(self.email),
            present(self.password),
            present(self.role),
        ) else {
            return Err(AppError::InvalidRequest("All fields are required".to_string()));
        };

        let role = role
            .parse::<Role>()
            .map_err(|_| AppError::InvalidRequest("Invalid role".to_string()))?;

        Ok(NewAccount {
            name,
            email,
            password,
            role,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns (email, password)
    pub fn validate(self) -> Result<(String, String)> {
        match (present(self.email), present(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::InvalidRequest(
                "Email and password are required".to_string(),
            )),
        }
    }
}

/// Public view of an account
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Login response of the classic API
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ClassicLoginResponse {
    pub message: String,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub session_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SlotsResponse {
    pub slots: Vec<Slot>,
    pub total: usize,
}

/// Slot as listed by the classic API
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ClassicSlot {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub time: String,
    pub capacity: i64,
    pub booked_count: i64,
}

impl From<Slot> for ClassicSlot {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            name: slot.name,
            date: slot.date,
            time: slot.time,
            capacity: slot.max_capacity,
            booked_count: slot.booked_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ClassicSlotsResponse {
    pub slots: Vec<ClassicSlot>,
    pub total: usize,
}

/// Booking request. The classic API picks the next open slot when
/// `slot_id` is omitted; the portal API requires it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BookRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub slot_id: Option<i64>,
}

impl BookRequest {
    /// Returns (user_id, slot_id), both required
    pub fn validate(self) -> Result<(i64, i64)> {
        match (present_id(self.user_id), present_id(self.slot_id)) {
            (Some(user_id), Some(slot_id)) => Ok((user_id, slot_id)),
            _ => Err(AppError::InvalidRequest(
                "User ID and slot ID are required".to_string(),
            )),
        }
    }

    /// Returns (user_id, optional slot_id)
    pub fn validate_user(self) -> Result<(i64, Option<i64>)> {
        let user_id = present_id(self.user_id)
            .ok_or_else(|| AppError::InvalidRequest("User ID is required".to_string()))?;
        Ok((user_id, present_id(self.slot_id)))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub booking_id: i64,
    pub slot_id: i64,
    pub date: String,
}

fn parse_status(status: &str) -> Result<AttendanceStatus> {
    status
        .parse::<AttendanceStatus>()
        .map_err(|_| AppError::InvalidRequest("Invalid status".to_string()))
}

/// Attendance request of the portal API
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AttendanceRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub slot_id: Option<i64>,
    /// present, absent or late
    #[serde(default)]
    pub status: Option<String>,
}

impl AttendanceRequest {
    pub fn validate(self) -> Result<(i64, i64, AttendanceStatus)> {
        let (Some(user_id), Some(slot_id), Some(status)) = (
            present_id(self.user_id),
            present_id(self.slot_id),
            present(self.status),
        ) else {
            return Err(AppError::InvalidRequest(
                "User ID, slot ID, and status are required".to_string(),
            ));
        };

        Ok((user_id, slot_id, parse_status(&status)?))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceResponse {
    pub message: String,
    pub attendance_id: i64,
}

/// Attendance request of the classic API; the slot comes from the
/// student's booking
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ClassicAttendanceRequest {
    #[serde(default)]
    pub student_id: Option<i64>,
    /// YYYY-MM-DD, defaults to today
    #[serde(default)]
    pub date: Option<String>,
    /// Defaults to present
    #[serde(default)]
    pub status: Option<String>,
}

/// Validated classic attendance mark
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMark {
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl ClassicAttendanceRequest {
    pub fn validate(self, today: NaiveDate) -> Result<AttendanceMark> {
        let student_id = present_id(self.student_id)
            .ok_or_else(|| AppError::InvalidRequest("Student ID is required".to_string()))?;

        let date = match present(self.date) {
            Some(date) => NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
                AppError::InvalidRequest("Invalid date, expected YYYY-MM-DD".to_string())
            })?,
            None => today,
        };

        let status = match present(self.status) {
            Some(status) => parse_status(&status)?,
            None => AttendanceStatus::Present,
        };

        Ok(AttendanceMark {
            student_id,
            date,
            status,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ClassicAttendanceResponse {
    pub message: String,
    pub attendance_id: i64,
    pub student_name: String,
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReportsResponse {
    pub summary: ReportSummary,
    pub recent_bookings: Vec<BookingDetail>,
    pub recent_attendance: Vec<AttendanceDetail>,
}

/// Query string of the classic admin view
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminViewQuery {
    /// Must match the configured admin email
    pub email: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Root response of the classic API
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
}
