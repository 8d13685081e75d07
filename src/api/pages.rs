//! Static page routes
//!
//! Pages are plain HTML files in the template directory. Sign-in and
//! dashboards run client-side against the JSON API.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get_service, MethodRouter},
};
use std::path::{Path, PathBuf};
use tower_http::services::ServeFile;
use tracing::warn;

/// Role dashboards and their sub-pages: (route, file)
pub const DASHBOARD_PAGES: &[(&str, &str)] = &[
    ("/student", "dashboard.html"),
    ("/student/logbook", "logbook.html"),
    ("/student/final-report", "final_report.html"),
    ("/student/deferral-request", "deferral_request.html"),
    ("/student/download-logbook", "download_logbook.html"),
    ("/student/return-form", "return_form.html"),
    ("/student/placement-details", "placement_details.html"),
    ("/student/analytics", "analytics.html"),
    ("/student/analytics-dashboard", "analytics-dashboard.html"),
    ("/supervisor", "dashboard.html"),
    ("/supervisor/assessment-forms", "assessment_forms.html"),
    ("/supervisor/logbook-approval", "logbook_approval.html"),
    ("/supervisor/approve-logbook", "approve_logbook.html"),
    ("/industry", "dashboard.html"),
    ("/industry/assessment-form", "assessment_form.html"),
    ("/industry/confirm-logbook", "confirm_logbook.html"),
    ("/industry/analytics-dashboard", "analytics-dashboard.html"),
    ("/admin", "dashboard.html"),
    ("/admin/student-progress", "student_progress.html"),
    ("/admin/assessment-management", "assessment_management.html"),
    ("/admin/assign-clusters", "assign_clusters.html"),
    ("/admin/assign-supervisors", "assign_supervisors.html"),
    ("/admin/approve-supervisors", "approve_supervisors.html"),
    ("/admin/communication", "communication.html"),
    ("/admin/compile-report", "compile_report.html"),
    ("/admin/reporting-system", "reporting-system.html"),
];

pub const LOGIN_PAGE: &str = "login.html";
pub const REGISTER_PAGE: &str = "register.html";

/// GET route serving one template file
pub fn page<S>(template_dir: &Path, file: &str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get_service(ServeFile::new(template_dir.join(file)))
}

/// Like [`page`], but POST returns the page too (forms post back to it)
pub fn form_page<S>(template_dir: &Path, file: &str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let path = template_dir.join(file);
    page(template_dir, file).post(move || read_page(path.clone()))
}

async fn read_page(path: PathBuf) -> Response {
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Page not readable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
