use super::{now_timestamp, Database, Role};
use crate::auth::password::hash_password;
use crate::error::Result;
use tracing::info;

pub const SAMPLE_PASSWORD: &str = "password123";

const SAMPLE_USERS: [(&str, &str, Role); 6] = [
    ("John Doe", "john@student.com", Role::Student),
    ("Jane Smith", "jane@student.com", Role::Student),
    ("Bob Johnson", "bob@student.com", Role::Student),
    ("Dr. Alice Brown", "alice@supervisor.com", Role::IndustrySupervisor),
    ("Prof. Charlie Wilson", "charlie@school.com", Role::SchoolSupervisor),
    ("Admin User", "admin@example.com", Role::Admin),
];

const SAMPLE_SLOTS: [(&str, &str, &str, i64); 5] = [
    ("Morning Slot", "2024-01-15", "09:00-12:00", 5),
    ("Afternoon Slot", "2024-01-16", "13:00-17:00", 5),
    ("Full Day Slot", "2024-01-17", "09:00-17:00", 5),
    ("Morning Slot", "2024-01-18", "09:00-12:00", 5),
    ("Afternoon Slot", "2024-01-19", "13:00-17:00", 5),
];

/// (user position, slot position), 1-based as inserted above
const SAMPLE_BOOKINGS: [(i64, i64); 3] = [(1, 1), (2, 2), (3, 3)];

const SAMPLE_ATTENDANCE: [(i64, i64, &str, &str); 3] = [
    (1, 1, "2024-01-15", "present"),
    (2, 2, "2024-01-16", "present"),
    (3, 3, "2024-01-17", "present"),
];

impl Database {
    /// Load sample users, slots, bookings and attendance into an empty
    /// database. Does nothing when any user already exists.
    pub async fn seed_sample_data(&self) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(());
        }

        let digest = hash_password(SAMPLE_PASSWORD);
        let mut user_ids = Vec::with_capacity(SAMPLE_USERS.len());
        for (name, email, role) in SAMPLE_USERS {
            let id = sqlx::query("INSERT INTO users (name, email, password, role) VALUES (?1, ?2, ?3, ?4)")
                .bind(name)
                .bind(email)
                .bind(&digest)
                .bind(role)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();
            user_ids.push(id);
        }

        let mut slot_ids = Vec::with_capacity(SAMPLE_SLOTS.len());
        for (name, date, time, capacity) in SAMPLE_SLOTS {
            let id = sqlx::query("INSERT INTO slots (name, date, time, max_capacity) VALUES (?1, ?2, ?3, ?4)")
                .bind(name)
                .bind(date)
                .bind(time)
                .bind(capacity)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();
            slot_ids.push(id);
        }

        let booked_at = now_timestamp();
        for (user, slot) in SAMPLE_BOOKINGS {
            let user_id = user_ids[(user - 1) as usize];
            let slot_id = slot_ids[(slot - 1) as usize];

            sqlx::query("INSERT INTO bookings (user_id, slot_id, booked_at) VALUES (?1, ?2, ?3)")
                .bind(user_id)
                .bind(slot_id)
                .bind(&booked_at)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE slots SET booked_count = booked_count + 1 WHERE id = ?1")
                .bind(slot_id)
                .execute(&mut *tx)
                .await?;
        }

        for (user, slot, date, status) in SAMPLE_ATTENDANCE {
            sqlx::query("INSERT INTO attendance (user_id, slot_id, date, status) VALUES (?1, ?2, ?3, ?4)")
                .bind(user_ids[(user - 1) as usize])
                .bind(slot_ids[(slot - 1) as usize])
                .bind(date)
                .bind(status)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            users = SAMPLE_USERS.len(),
            slots = SAMPLE_SLOTS.len(),
            bookings = SAMPLE_BOOKINGS.len(),
            "Loaded sample data"
        );
        Ok(())
    }
}
