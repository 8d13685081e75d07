//! HTML dump of all tables for administrators

use crate::error::Result;
use crate::storage::{AttendanceDetail, BookingDetail, Database, Slot, User};
use askama::Template;

#[derive(Template)]
#[template(path = "admin_view.html")]
pub struct AdminViewTemplate {
    pub users: Vec<User>,
    pub slots: Vec<Slot>,
    pub bookings: Vec<BookingDetail>,
    pub attendance: Vec<AttendanceDetail>,
}

/// Render users, slots, bookings and attendance as HTML tables
pub async fn render(db: &Database) -> Result<String> {
    let page = AdminViewTemplate {
        users: db.list_users().await?,
        slots: db.list_slots().await?,
        bookings: db.list_bookings().await?,
        attendance: db.list_attendance().await?,
    };

    Ok(page.render()?)
}
