//! API module - HTTP routes, handlers, pages and models

pub mod admin_view;
pub mod classic_handlers;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod routes;
