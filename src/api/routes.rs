//! HTTP route definitions

use crate::api::models::*;
use crate::api::pages::{self, DASHBOARD_PAGES, LOGIN_PAGE, REGISTER_PAGE};
use crate::api::{classic_handlers, handlers};
use crate::config::{ApiVariant, CorsConfig};
use crate::error::ErrorResponse;
use crate::storage::{AttendanceDetail, AttendanceStatus, BookingDetail, ReportSummary, Role, Slot};
use crate::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the portal variant
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attachment Management API",
        description = "Registration, slot booking, attendance and reports for student attachments.",
        license(name = "MIT"),
    ),
    paths(
        handlers::register,
        handlers::login,
        handlers::list_slots,
        handlers::book_slot,
        handlers::mark_attendance,
        handlers::reports,
        handlers::admin_view,
        handlers::health_check,
    ),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        UserSummary,
        SlotsResponse,
        Slot,
        BookRequest,
        BookResponse,
        AttendanceRequest,
        AttendanceResponse,
        ReportsResponse,
        ReportSummary,
        BookingDetail,
        AttendanceDetail,
        AttendanceStatus,
        Role,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Accounts", description = "Registration and login"),
        (name = "Slots", description = "Slot listing and booking"),
        (name = "Attendance", description = "Attendance marking"),
        (name = "Reports", description = "Aggregate reports and admin view"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct PortalApiDoc;

/// OpenAPI documentation for the classic variant
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attachment Management API (classic)",
        description = "Root-level JSON API for student attachments.",
        license(name = "MIT"),
    ),
    paths(
        classic_handlers::home,
        classic_handlers::register,
        classic_handlers::login,
        classic_handlers::list_slots,
        classic_handlers::book_slot,
        classic_handlers::mark_attendance,
        classic_handlers::reports,
        classic_handlers::admin_view,
        handlers::health_check,
    ),
    components(schemas(
        BannerResponse,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        ClassicLoginResponse,
        ClassicSlotsResponse,
        ClassicSlot,
        BookRequest,
        BookResponse,
        ClassicAttendanceRequest,
        ClassicAttendanceResponse,
        ReportsResponse,
        ReportSummary,
        BookingDetail,
        AttendanceDetail,
        AttendanceStatus,
        Role,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Accounts", description = "Registration and login"),
        (name = "Slots", description = "Slot listing and booking"),
        (name = "Attendance", description = "Attendance marking"),
        (name = "Reports", description = "Aggregate reports and admin view"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ClassicApiDoc;

/// Create the main application router
pub async fn create_router(state: Arc<AppState>) -> Router {
    let (variant, template_dir, static_dir, cors) = {
        let config = state.settings.read().await;
        (
            config.api.variant,
            PathBuf::from(&config.pages.template_dir),
            config.pages.static_dir.clone(),
            config.cors.clone(),
        )
    };

    let (variant_routes, openapi) = match variant {
        ApiVariant::Portal => (portal_routes(&template_dir), PortalApiDoc::openapi()),
        ApiVariant::Classic => (classic_routes(&template_dir), ClassicApiDoc::openapi()),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        .merge(variant_routes)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        // Static assets for the pages
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors_layer(&cors) {
        Some(layer) => app.layer(layer),
        None => app,
    }
}

/// Dashboard pages plus the JSON API under `/api`
fn portal_routes(template_dir: &std::path::Path) -> Router<Arc<AppState>> {
    let api_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/slots", get(handlers::list_slots))
        .route("/book", post(handlers::book_slot))
        .route("/attendance", post(handlers::mark_attendance))
        .route("/reports", get(handlers::reports))
        .route("/admin-view", get(handlers::admin_view));

    let mut router = Router::new()
        .route("/", pages::page(template_dir, LOGIN_PAGE))
        .route("/login", pages::form_page(template_dir, LOGIN_PAGE))
        .route("/register", pages::form_page(template_dir, REGISTER_PAGE));

    for (path, file) in DASHBOARD_PAGES {
        router = router.route(path, pages::page(template_dir, file));
    }

    router.nest("/api", api_routes)
}

/// JSON API at the root; sign-in pages answer GET, the API answers POST
fn classic_routes(template_dir: &std::path::Path) -> Router<Arc<AppState>> {
    let mut router = Router::new()
        .route("/", get(classic_handlers::home))
        .route(
            "/login",
            pages::page(template_dir, LOGIN_PAGE).post(classic_handlers::login),
        )
        .route(
            "/register",
            pages::page(template_dir, REGISTER_PAGE).post(classic_handlers::register),
        )
        .route("/slots", get(classic_handlers::list_slots))
        .route("/book", post(classic_handlers::book_slot))
        .route("/attendance", post(classic_handlers::mark_attendance))
        .route("/reports", get(classic_handlers::reports))
        .route("/admin-view", get(classic_handlers::admin_view));

    // Only the top-level dashboards
    for (path, file) in DASHBOARD_PAGES.iter().filter(|(path, _)| path.matches('/').count() == 1) {
        router = router.route(path, pages::page(template_dir, file));
    }

    router
}

fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if !config.enabled {
        return None;
    }

    if config.allowed_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
