//! Callback form endpoint: validation, persistence, admin notification.

use std::fmt;
use std::sync::OnceLock;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::store::{LessonType, NewLead};
use crate::web::AppState;

/// Raw form body of `POST /submit_callback`. Every field defaults to empty
/// so an absent field is reported by our own validation instead of a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_phone: String,
    #[serde(default)]
    pub lesson_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub consent: String,
}

/// First failing rule wins; the order below is observable through the
/// returned message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    NameTooShort,
    NameTooLong,
    InvalidPhone,
    InvalidEmail,
    ConsentRequired,
    UnknownLessonType,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingFields => "Please fill in all required fields and give your consent.",
            Self::NameTooShort => "Name is too short.",
            Self::NameTooLong => "Name is too long.",
            Self::InvalidPhone => "Invalid phone number format.",
            Self::InvalidEmail => "Invalid email format.",
            Self::ConsentRequired => "Consent to personal data processing is required.",
            Self::UnknownLessonType => "Unknown lesson type.",
        };
        f.write_str(message)
    }
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+\d{10,}$").unwrap())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validate a submission, fail fast.
pub fn validate(form: &CallbackForm) -> Result<NewLead, ValidationError> {
    if form.name.is_empty()
        || form.full_phone.is_empty()
        || form.lesson_type.is_empty()
        || form.consent.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameTooShort);
    }
    if name.chars().count() > 100 {
        return Err(ValidationError::NameTooLong);
    }

    let phone = form.full_phone.trim();
    if !phone_re().is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }

    let email = form.email.trim();
    if !email.is_empty() && !email_re().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if form.consent != "on" {
        return Err(ValidationError::ConsentRequired);
    }

    let lesson_type =
        LessonType::parse(form.lesson_type.trim()).ok_or(ValidationError::UnknownLessonType)?;

    Ok(NewLead {
        name: name.to_string(),
        email: (!email.is_empty()).then(|| email.to_string()),
        phone: phone.to_string(),
        lesson_type,
    })
}

#[derive(Serialize)]
pub struct SubmitResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SubmitResponse {
    fn ok(id: i64, message: &str) -> Self {
        Self { success: true, id: Some(id), message: Some(message.to_string()), error: None }
    }

    fn error(error: String) -> Self {
        Self { success: false, id: None, message: None, error: Some(error) }
    }
}

/// `POST /submit_callback`
pub async fn submit_callback(
    State(state): State<AppState>,
    Form(form): Form<CallbackForm>,
) -> Response {
    info!("Received callback form submission");

    let lead = match validate(&form) {
        Ok(lead) => lead,
        Err(e) => {
            warn!("Form validation failed: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::error(e.to_string())),
            )
                .into_response();
        }
    };

    let id = match state.store.insert(&lead) {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to persist callback request: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse::error(
                    "A server error occurred. Please try again later.".to_string(),
                )),
            )
                .into_response();
        }
    };

    info!(
        "New callback request saved (id {id}): name={}, phone={}, lesson={}",
        lead.name,
        lead.phone,
        lead.lesson_type.as_str()
    );

    if let Some(notifier) = &state.notifier {
        notifier.notify_new_lead(id, &lead).await;
    }

    (
        StatusCode::OK,
        Json(SubmitResponse::ok(id, "Your request has been sent!")),
    )
        .into_response()
}
