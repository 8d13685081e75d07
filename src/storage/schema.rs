//! Table definitions

use crate::config::ApiVariant;
use sqlx::SqlitePool;
use tracing::debug;

pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('student', 'industry_supervisor', 'school_supervisor', 'admin')),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const CREATE_SLOTS: &str = r#"
CREATE TABLE IF NOT EXISTS slots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT 'Attachment Slot',
    date TEXT NOT NULL,
    time TEXT NOT NULL DEFAULT '09:00-17:00',
    max_capacity INTEGER NOT NULL DEFAULT 10,
    booked_count INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// One booking per user
pub const CREATE_BOOKINGS_SINGLE: &str = r#"
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    slot_id INTEGER NOT NULL,
    booked_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users (id),
    FOREIGN KEY (slot_id) REFERENCES slots (id),
    UNIQUE(user_id)
)
"#;

pub const CREATE_BOOKINGS_MULTI: &str = r#"
CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    slot_id INTEGER NOT NULL,
    booked_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users (id),
    FOREIGN KEY (slot_id) REFERENCES slots (id)
)
"#;

pub const CREATE_ATTENDANCE: &str = r#"
CREATE TABLE IF NOT EXISTS attendance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    slot_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'present' CHECK (status IN ('present', 'absent', 'late')),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users (id),
    FOREIGN KEY (slot_id) REFERENCES slots (id),
    UNIQUE(user_id, slot_id, date)
)
"#;

/// DDL statements for a variant, in dependency order
pub fn statements(variant: ApiVariant) -> [&'static str; 4] {
    let bookings = match variant {
        ApiVariant::Portal => CREATE_BOOKINGS_SINGLE,
        ApiVariant::Classic => CREATE_BOOKINGS_MULTI,
    };
    [CREATE_USERS, CREATE_SLOTS, bookings, CREATE_ATTENDANCE]
}

/// Create all tables if they don't exist
pub async fn create_tables(pool: &SqlitePool, variant: ApiVariant) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for statement in statements(variant) {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    debug!(variant = %variant, "Database schema ready");
    Ok(())
}
