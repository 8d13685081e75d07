use super::{is_unique_violation, now_timestamp, BookingDetail, Database, Slot};
use crate::error::Result;
use tracing::{debug, info};

/// Claims one seat; fails when the slot is missing or already full
const SQL_CLAIM_SEAT: &str = r#"
UPDATE slots
SET booked_count = booked_count + 1
WHERE id = ?1
  AND booked_count < max_capacity
"#;

const SQL_INSERT_BOOKING: &str = r#"
INSERT INTO bookings (user_id, slot_id, booked_at)
VALUES (?1, ?2, ?3)
"#;

const SQL_BOOKING_DETAILS: &str = r#"
SELECT
    b.id,
    b.user_id,
    b.slot_id,
    b.booked_at,
    u.name AS user_name,
    s.name AS slot_name,
    s.date AS slot_date
FROM bookings b
JOIN users u ON b.user_id = u.id
JOIN slots s ON b.slot_id = s.id
"#;

/// Result of a booking attempt
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// Booking stored; `slot` reflects the incremented counter
    Booked { booking_id: i64, slot: Slot },
    SlotNotFound,
    SlotFull,
    /// The schema allows one booking per user and this user has one
    AlreadyBooked,
}

impl Database {
    /// Book a seat in a slot.
    ///
    /// The capacity check and the counter increment are one conditional
    /// UPDATE, run in the same transaction as the booking insert, so
    /// `booked_count` never exceeds `max_capacity` and never drifts from
    /// the number of stored bookings.
    pub async fn book_slot(&self, user_id: i64, slot_id: i64) -> Result<BookingOutcome> {
        let mut tx = self.pool().begin().await?;

        let claimed = sqlx::query(SQL_CLAIM_SEAT)
            .bind(slot_id)
            .execute(&mut *tx)
            .await?;

        if claimed.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM slots WHERE id = ?1")
                .bind(slot_id)
                .fetch_one(&mut *tx)
                .await?
                > 0;
            tx.rollback().await?;

            debug!(user_id, slot_id, exists, "Slot could not be claimed");
            return Ok(if exists {
                BookingOutcome::SlotFull
            } else {
                BookingOutcome::SlotNotFound
            });
        }

        let inserted = sqlx::query(SQL_INSERT_BOOKING)
            .bind(user_id)
            .bind(slot_id)
            .bind(now_timestamp())
            .execute(&mut *tx)
            .await;

        let booking_id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                debug!(user_id, slot_id, "User already holds a booking");
                return Ok(BookingOutcome::AlreadyBooked);
            }
            Err(e) => return Err(e.into()),
        };

        let slot = sqlx::query_as::<_, Slot>(
            "SELECT id, name, date, time, max_capacity, booked_count, created_at FROM slots WHERE id = ?1",
        )
        .bind(slot_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            booking_id,
            user_id,
            slot_id,
            booked = slot.booked_count,
            capacity = slot.max_capacity,
            "Slot booked"
        );

        Ok(BookingOutcome::Booked { booking_id, slot })
    }

    /// Most recent booking held by a user
    pub async fn get_booking_for_user(&self, user_id: i64) -> Result<Option<BookingDetail>> {
        let sql = format!("{SQL_BOOKING_DETAILS} WHERE b.user_id = ?1 ORDER BY b.booked_at DESC, b.id DESC LIMIT 1");
        let booking = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(booking)
    }

    pub async fn list_bookings(&self) -> Result<Vec<BookingDetail>> {
        let sql = format!("{SQL_BOOKING_DETAILS} ORDER BY b.booked_at DESC, b.id DESC");
        let bookings = sqlx::query_as::<_, BookingDetail>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(bookings)
    }

    pub async fn recent_bookings(&self, limit: u32) -> Result<Vec<BookingDetail>> {
        let sql = format!("{SQL_BOOKING_DETAILS} ORDER BY b.booked_at DESC, b.id DESC LIMIT ?1");
        let bookings = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(limit)
            .fetch_all(self.pool())
            .await?;
        Ok(bookings)
    }

    pub async fn count_bookings(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
