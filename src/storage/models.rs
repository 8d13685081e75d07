//! Row types and enumerations stored in the database

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Student,
    IndustrySupervisor,
    SchoolSupervisor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::IndustrySupervisor,
        Role::SchoolSupervisor,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::IndustrySupervisor => "industry_supervisor",
            Role::SchoolSupervisor => "school_supervisor",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or(())
    }
}

/// Attendance mark for one user, slot and date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            _ => Err(()),
        }
    }
}

/// Full user row, including the password digest. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: String,
}

/// User row without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

/// Bookable time slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Slot {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub time: String,
    pub max_capacity: i64,
    pub booked_count: i64,
    pub created_at: String,
}

/// Values for a slot to be inserted
#[derive(Debug, Clone)]
pub struct NewSlot<'a> {
    pub name: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub max_capacity: i64,
}

/// Booking joined with the user and slot it refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BookingDetail {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub booked_at: String,
    pub user_name: String,
    pub slot_name: String,
    pub slot_date: String,
}

/// Attendance record joined with user and slot names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceDetail {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub date: String,
    pub status: AttendanceStatus,
    pub created_at: String,
    pub student_name: String,
    pub slot_name: String,
}

/// Aggregate counts for the reports endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub total_users: i64,
    pub total_slots: i64,
    pub total_bookings: i64,
    pub total_attendance: i64,
    pub students: i64,
    pub supervisors: i64,
}
