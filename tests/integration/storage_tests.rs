//! Storage integration tests against a SQLite file

use attachment_management::config::{ApiVariant, DatabaseConfig};
use attachment_management::storage::{
    AttendanceMode, AttendanceStatus, BookingOutcome, Database, NewSlot, Role,
};
use std::sync::Arc;
use tempfile::TempDir;

async fn open_database(variant: ApiVariant, seed: bool) -> (Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("ams.db").to_string_lossy().into_owned(),
        max_connections: 8,
        busy_timeout_ms: 10_000,
        seed_sample_data: seed,
    };
    let db = Database::connect(&config).await.unwrap();
    db.initialize(variant, seed).await.unwrap();
    (db, dir)
}

#[tokio::test]
async fn test_initialize_is_repeatable() {
    let (db, _dir) = open_database(ApiVariant::Portal, true).await;

    db.initialize(ApiVariant::Portal, true).await.unwrap();

    assert_eq!(db.count_users().await.unwrap(), 6);
    assert_eq!(db.count_slots().await.unwrap(), 5);
    assert!(db.ping().await);
}

#[tokio::test]
async fn test_seeded_accounts_use_sample_password() {
    let (db, _dir) = open_database(ApiVariant::Portal, true).await;

    let admin = db.get_user_by_email("admin@example.com").await.unwrap().unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert!(attachment_management::auth::verify_password(
        "password123",
        &admin.password
    ));
}

#[tokio::test]
async fn test_concurrent_bookings_never_exceed_capacity() {
    let (db, _dir) = open_database(ApiVariant::Classic, false).await;
    let db = Arc::new(db);

    let slot_id = db
        .create_slot(NewSlot {
            name: "Morning Slot",
            date: "2024-03-01",
            time: "09:00-12:00",
            max_capacity: 3,
        })
        .await
        .unwrap();

    let mut students = Vec::new();
    for n in 0..12 {
        let id = db
            .create_user(
                &format!("Student {n}"),
                &format!("s{n}@example.com"),
                "digest",
                Role::Student,
            )
            .await
            .unwrap();
        students.push(id);
    }

    let handles: Vec<_> = students
        .into_iter()
        .map(|user_id| {
            let db = db.clone();
            tokio::spawn(async move { db.book_slot(user_id, slot_id).await })
        })
        .collect();

    let mut booked = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            BookingOutcome::Booked { slot, .. } => {
                assert!(slot.booked_count <= slot.max_capacity);
                booked += 1;
            }
            BookingOutcome::SlotFull => full += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(booked, 3);
    assert_eq!(full, 9);

    let slot = db.get_slot(slot_id).await.unwrap().unwrap();
    assert_eq!(slot.booked_count, 3);
    assert_eq!(db.count_bookings().await.unwrap(), 3);
}

#[tokio::test]
async fn test_portal_schema_rejects_second_attendance() {
    let (db, _dir) = open_database(ApiVariant::Portal, true).await;

    let result = db
        .record_attendance(1, 1, "2024-01-15", AttendanceStatus::Late, AttendanceMode::InsertOnly)
        .await;
    assert!(result.is_err());
    assert_eq!(db.count_attendance().await.unwrap(), 3);
}

#[tokio::test]
async fn test_classic_schema_replaces_attendance() {
    let (db, _dir) = open_database(ApiVariant::Classic, true).await;

    db.record_attendance(1, 1, "2024-01-15", AttendanceStatus::Late, AttendanceMode::Replace)
        .await
        .unwrap();

    let record = db.get_attendance(1, "2024-01-15").await.unwrap().unwrap();
    assert_eq!(record.status, AttendanceStatus::Late);
    assert_eq!(db.count_attendance().await.unwrap(), 3);
}

#[tokio::test]
async fn test_recent_bookings_limit_and_join() {
    let (db, _dir) = open_database(ApiVariant::Portal, true).await;

    let recent = db.recent_bookings(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|b| !b.user_name.is_empty()));

    let all = db.list_bookings().await.unwrap();
    assert_eq!(all.len(), 3);
    let john = all.iter().find(|b| b.user_name == "John Doe").unwrap();
    assert_eq!(john.slot_date, "2024-01-15");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_replaced_attendance_is_visible_to_every_connection() {
    let (db, _dir) = open_database(ApiVariant::Classic, false).await;

    let user = db
        .create_user("John Doe", "john@student.com", "digest", Role::Student)
        .await
        .unwrap();
    let slot = db
        .create_slot(NewSlot {
            name: "Morning Slot",
            date: "2024-01-15",
            time: "09:00-12:00",
            max_capacity: 5,
        })
        .await
        .unwrap();

    for round in 0..40 {
        let date = format!("2024-02-{:02}", round % 28 + 1);

        let first = db
            .record_attendance(user, slot, &date, AttendanceStatus::Present, AttendanceMode::Replace)
            .await
            .unwrap();
        let second = db
            .record_attendance(user, slot, &date, AttendanceStatus::Absent, AttendanceMode::Replace)
            .await
            .unwrap();
        assert_eq!(first, second, "round {round}");

        let stored = db.get_attendance_by_id(second).await.unwrap().unwrap();
        assert_eq!(stored.status, AttendanceStatus::Absent, "round {round}");
    }

    assert_eq!(db.count_attendance().await.unwrap(), 28);
}
