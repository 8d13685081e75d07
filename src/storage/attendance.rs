use super::{is_unique_violation, AttendanceDetail, AttendanceStatus, Database};
use crate::error::{AppError, Result};
use tracing::info;

const SQL_INSERT_ATTENDANCE: &str = r#"
INSERT INTO attendance (user_id, slot_id, date, status)
VALUES (?1, ?2, ?3, ?4)
"#;

/// Keeps the existing row id; only the status is overwritten
const SQL_UPSERT_ATTENDANCE: &str = r#"
INSERT INTO attendance (user_id, slot_id, date, status)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (user_id, slot_id, date) DO UPDATE SET status = excluded.status
"#;

const SQL_ATTENDANCE_ID: &str = r#"
SELECT id FROM attendance
WHERE user_id = ?1 AND slot_id = ?2 AND date = ?3
"#;

const SQL_ATTENDANCE_DETAILS: &str = r#"
SELECT
    a.id,
    a.user_id,
    a.slot_id,
    a.date,
    a.status,
    a.created_at,
    u.name AS student_name,
    s.name AS slot_name
FROM attendance a
JOIN users u ON a.user_id = u.id
JOIN slots s ON a.slot_id = s.id
"#;

/// What to do when attendance for the same user, slot and date exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceMode {
    /// Reject the second mark with a conflict
    InsertOnly,
    /// Overwrite the status of the existing record
    Replace,
}

impl Database {
    /// Record attendance and return the record id
    pub async fn record_attendance(
        &self,
        user_id: i64,
        slot_id: i64,
        date: &str,
        status: AttendanceStatus,
        mode: AttendanceMode,
    ) -> Result<i64> {
        let attendance_id = match mode {
            AttendanceMode::InsertOnly => sqlx::query(SQL_INSERT_ATTENDANCE)
                .bind(user_id)
                .bind(slot_id)
                .bind(date)
                .bind(status)
                .execute(self.pool())
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::Conflict(
                            "Attendance already marked for this user, slot, and date".to_string(),
                        )
                    } else {
                        AppError::Database(e)
                    }
                })?
                .last_insert_rowid(),
            AttendanceMode::Replace => self.replace_attendance(user_id, slot_id, date, status).await?,
        };

        info!(attendance_id, user_id, slot_id, date, status = %status, "Attendance recorded");
        Ok(attendance_id)
    }

    /// Upsert run to completion, then the surviving row id read back in
    /// the same transaction
    async fn replace_attendance(
        &self,
        user_id: i64,
        slot_id: i64,
        date: &str,
        status: AttendanceStatus,
    ) -> Result<i64> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(SQL_UPSERT_ATTENDANCE)
            .bind(user_id)
            .bind(slot_id)
            .bind(date)
            .bind(status)
            .execute(&mut *tx)
            .await?;

        let attendance_id = sqlx::query_scalar::<_, i64>(SQL_ATTENDANCE_ID)
            .bind(user_id)
            .bind(slot_id)
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(attendance_id)
    }

    /// Attendance for a slot on a date
    pub async fn get_attendance(&self, slot_id: i64, date: &str) -> Result<Option<AttendanceDetail>> {
        let sql = format!("{SQL_ATTENDANCE_DETAILS} WHERE a.slot_id = ?1 AND a.date = ?2 ORDER BY a.id LIMIT 1");
        let record = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(slot_id)
            .bind(date)
            .fetch_optional(self.pool())
            .await?;
        Ok(record)
    }

    pub async fn get_attendance_by_id(&self, attendance_id: i64) -> Result<Option<AttendanceDetail>> {
        let sql = format!("{SQL_ATTENDANCE_DETAILS} WHERE a.id = ?1");
        let record = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(attendance_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(record)
    }

    pub async fn list_attendance(&self) -> Result<Vec<AttendanceDetail>> {
        let sql = format!("{SQL_ATTENDANCE_DETAILS} ORDER BY a.date DESC, a.id DESC");
        let records = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(records)
    }

    pub async fn recent_attendance(&self, limit: u32) -> Result<Vec<AttendanceDetail>> {
        let sql = format!("{SQL_ATTENDANCE_DETAILS} ORDER BY a.date DESC, a.id DESC LIMIT ?1");
        let records = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        Ok(records)
    }

    pub async fn count_attendance(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
