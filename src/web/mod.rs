//! HTTP intake service: marketing pages plus the callback form endpoint.

pub mod pages;
pub mod submit;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::notify::Notifier;
use crate::store::LeadStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LeadStore>,
    /// None when Telegram credentials are not configured; submissions still
    /// succeed, only the admin notification is skipped.
    pub notifier: Option<Arc<Notifier>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/pricing", get(pages::pricing_page))
        .route("/about", get(pages::about))
        .route("/submit_callback", post(submit::submit_callback))
        .fallback(pages::not_found)
        .layer(CatchPanicLayer::custom(pages::handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
