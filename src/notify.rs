//! Best-effort Telegram notification for new leads.
//!
//! The web process posts directly to the Bot API instead of carrying a full
//! bot dispatcher. Delivery failure is logged and swallowed; it never fails
//! the request that triggered it.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::store::NewLead;

/// Hard cap on the outbound call so a slow Telegram API can never hold a
/// form submission open.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

/// Client for the Bot API `sendMessage` call.
pub struct Notifier {
    client: reqwest::Client,
    token: String,
    admin_chat_id: i64,
}

impl Notifier {
    pub fn new(token: String, admin_chat_id: i64) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            admin_chat_id,
        }
    }

    /// Notify the administrator about a freshly persisted lead.
    pub async fn notify_new_lead(&self, id: i64, lead: &NewLead) {
        let text = notification_text(id, lead);
        match self.send_message(&text).await {
            Ok(()) => info!("Admin notification sent for lead {id}"),
            Err(e) => warn!("Failed to send admin notification for lead {id}: {e}"),
        }
    }

    async fn send_message(&self, text: &str) -> Result<(), String> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let body = SendMessageBody {
            chat_id: self.admin_chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(&url)
            .timeout(SEND_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("telegram api returned {}", response.status()));
        }
        Ok(())
    }
}

/// Message body shown to the administrator. User-entered fields are escaped
/// for HTML parse mode.
pub fn notification_text(id: i64, lead: &NewLead) -> String {
    let email = lead.email.as_deref().unwrap_or("not provided");
    format!(
        "🔔 <b>New callback request!</b>\n\n\
         <b>ID:</b> {id}\n\
         <b>Name:</b> {}\n\
         <b>Phone:</b> {}\n\
         <b>Email:</b> {}\n\
         <b>Lesson type:</b> {}\n\n\
         Use /callbacks to view the list.",
        html_escape(&lead.name),
        html_escape(&lead.phone),
        html_escape(email),
        lead.lesson_type.label(),
    )
}

/// Escape a string for Telegram HTML parse mode.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LessonType;

    fn lead(email: Option<&str>) -> NewLead {
        NewLead {
            name: "Anna".to_string(),
            email: email.map(str::to_string),
            phone: "+79991234567".to_string(),
            lesson_type: LessonType::GroupOnline,
        }
    }

    #[test]
    fn test_notification_text_contains_lead_fields() {
        let text = notification_text(42, &lead(Some("anna@example.com")));
        assert!(text.contains("<b>ID:</b> 42"));
        assert!(text.contains("Anna"));
        assert!(text.contains("+79991234567"));
        assert!(text.contains("anna@example.com"));
        assert!(text.contains("Group online"));
    }

    #[test]
    fn test_notification_text_missing_email() {
        let text = notification_text(1, &lead(None));
        assert!(text.contains("<b>Email:</b> not provided"));
    }

    #[test]
    fn test_notification_text_escapes_html() {
        let mut l = lead(None);
        l.name = "<b>Eve & co</b>".to_string();
        let text = notification_text(1, &l);
        assert!(text.contains("&lt;b&gt;Eve &amp; co&lt;/b&gt;"));
        assert!(!text.contains("<b>Eve"));
    }
}
