//! Informational pages and the 404/500 fallbacks.
//!
//! Pages are static HTML with a couple of placeholders substituted at render
//! time; a templating engine would be overkill at this size.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};
use tracing::{error, info, warn};

use crate::pricing;

const INDEX: &str = include_str!("../../templates/index.html");
const PRICING: &str = include_str!("../../templates/pricing.html");
const ABOUT: &str = include_str!("../../templates/about.html");
const NOT_FOUND: &str = include_str!("../../templates/404.html");
const INTERNAL_ERROR: &str = include_str!("../../templates/500.html");

fn render(template: &str) -> Html<String> {
    Html(template.replace("{{year}}", &Utc::now().year().to_string()))
}

/// `GET /`
pub async fn index() -> Html<String> {
    info!("Serving index page");
    render(INDEX)
}

/// `GET /pricing`
pub async fn pricing_page() -> Html<String> {
    info!("Serving pricing page");
    let cards: String = pricing::PRICES
        .iter()
        .map(|entry| {
            format!(
                r#"<div class="price-card">
  <h3>{}</h3>
  <p>{}</p>
  <p class="price"><s>{}</s> <strong>{}</strong> {}</p>
</div>
"#,
                entry.title, entry.description, entry.old_price, entry.price, entry.unit
            )
        })
        .collect();

    let page = PRICING
        .replace("{{prices}}", &cards)
        .replace("{{year}}", &Utc::now().year().to_string());
    Html(page)
}

/// `GET /about`
pub async fn about() -> Html<String> {
    info!("Serving about page");
    render(ABOUT)
}

/// Router fallback for unknown paths.
pub async fn not_found(uri: axum::http::Uri) -> (StatusCode, Html<String>) {
    warn!("404 - page not found: {uri}");
    (StatusCode::NOT_FOUND, render(NOT_FOUND))
}

/// Top-level catch for handler panics: log with detail, show the generic
/// 500 page.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Unhandled error in request handler: {detail}");
    (StatusCode::INTERNAL_SERVER_ERROR, render(INTERNAL_ERROR)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_year() {
        let html = render("<footer>© {{year}}</footer>").0;
        assert!(!html.contains("{{year}}"));
        assert!(html.contains(&Utc::now().year().to_string()));
    }

    #[test]
    fn test_templates_carry_placeholder() {
        for template in [INDEX, PRICING, ABOUT, NOT_FOUND, INTERNAL_ERROR] {
            assert!(template.contains("{{year}}"));
        }
        assert!(PRICING.contains("{{prices}}"));
    }
}
