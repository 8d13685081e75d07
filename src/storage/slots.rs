use super::{Database, NewSlot, Slot};
use crate::error::Result;

const SLOT_COLUMNS: &str = "id, name, date, time, max_capacity, booked_count, created_at";

impl Database {
    /// Slots that still have room, earliest first
    pub async fn list_available_slots(&self) -> Result<Vec<Slot>> {
        let sql = format!(
            "SELECT {SLOT_COLUMNS} FROM slots WHERE booked_count < max_capacity ORDER BY date, id"
        );
        let slots = sqlx::query_as::<_, Slot>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(slots)
    }

    pub async fn list_slots(&self) -> Result<Vec<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots ORDER BY date, id");
        let slots = sqlx::query_as::<_, Slot>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(slots)
    }

    pub async fn get_slot(&self, slot_id: i64) -> Result<Option<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = ?1");
        let slot = sqlx::query_as::<_, Slot>(&sql)
            .bind(slot_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(slot)
    }

    /// Earliest slot that still has room
    pub async fn next_available_slot(&self) -> Result<Option<Slot>> {
        let sql = format!(
            "SELECT {SLOT_COLUMNS} FROM slots WHERE booked_count < max_capacity ORDER BY date, id LIMIT 1"
        );
        let slot = sqlx::query_as::<_, Slot>(&sql)
            .fetch_optional(self.pool())
            .await?;
        Ok(slot)
    }

    pub async fn count_slots(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM slots")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    pub async fn create_slot(&self, slot: NewSlot<'_>) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO slots (name, date, time, max_capacity) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(slot.name)
        .bind(slot.date)
        .bind(slot.time)
        .bind(slot.max_capacity)
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }
}
