use super::{Database, ReportSummary};
use crate::error::Result;

const SQL_SUMMARY: &str = r#"
SELECT
    (SELECT COUNT(*) FROM users) AS total_users,
    (SELECT COUNT(*) FROM slots) AS total_slots,
    (SELECT COUNT(*) FROM bookings) AS total_bookings,
    (SELECT COUNT(*) FROM attendance) AS total_attendance,
    (SELECT COUNT(*) FROM users WHERE role = 'student') AS students,
    (SELECT COUNT(*) FROM users WHERE role IN ('industry_supervisor', 'school_supervisor')) AS supervisors
"#;

impl Database {
    /// Aggregate counts, read in one statement so they are mutually consistent
    pub async fn summary(&self) -> Result<ReportSummary> {
        let (total_users, total_slots, total_bookings, total_attendance, students, supervisors) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64)>(SQL_SUMMARY)
                .fetch_one(self.pool())
                .await?;

        Ok(ReportSummary {
            total_users,
            total_slots,
            total_bookings,
            total_attendance,
            students,
            supervisors,
        })
    }
}
