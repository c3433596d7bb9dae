//! Inline keyboards and the callback-data protocol for the lead list.
//!
//! Payloads are packed as `cb:{action}:{item_id}:{page}:{status}` so a
//! button press round-trips everything the stateless handler needs.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::store::CallbackRequest;

/// Leads shown per page.
pub const LEADS_PER_PAGE: u64 = 10;

const PREFIX: &str = "cb";

/// Action encoded in a button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Jump to another page of the list.
    Page { target: u64 },
    /// Flip the processed flag of one lead, then re-render `page`.
    /// `processed` is the status the button was rendered with.
    ToggleStatus { item_id: i64, page: u64, processed: bool },
    /// Placeholder button; acknowledged and ignored.
    Noop,
}

impl CallbackAction {
    pub fn pack(&self) -> String {
        match self {
            Self::Page { target } => format!("{PREFIX}:page:0:{target}:0"),
            Self::ToggleStatus { item_id, page, processed } => {
                format!("{PREFIX}:toggle_status:{item_id}:{page}:{}", u8::from(*processed))
            }
            Self::Noop => format!("{PREFIX}:noop:0:0:0"),
        }
    }

    /// Parse a payload. Total: any malformed input returns `None`.
    pub fn parse(data: &str) -> Option<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        let [prefix, action, item_id, page, status] = parts.as_slice() else {
            return None;
        };
        if *prefix != PREFIX {
            return None;
        }

        let item_id: i64 = item_id.parse().ok()?;
        let page: u64 = page.parse().ok()?;
        let status: u8 = status.parse().ok()?;

        match *action {
            "page" => Some(Self::Page { target: page }),
            "toggle_status" => Some(Self::ToggleStatus { item_id, page, processed: status != 0 }),
            "noop" => Some(Self::Noop),
            _ => None,
        }
    }
}

/// Total page count for a given number of leads.
pub fn total_pages(total: u64) -> u64 {
    total.div_ceil(LEADS_PER_PAGE)
}

/// Header text above the list.
pub fn page_text(page: u64, total: u64) -> String {
    format!(
        "Leads (page {}/{}, total {})",
        page + 1,
        total_pages(total).max(1),
        total
    )
}

/// Build the lead-list keyboard: one toggle button per lead, then a
/// pagination row. An empty list renders a single placeholder button and no
/// pagination controls.
pub fn leads_keyboard(leads: &[CallbackRequest], page: u64, total: u64) -> InlineKeyboardMarkup {
    if leads.is_empty() {
        return InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "No leads yet",
            CallbackAction::Noop.pack(),
        )]]);
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = leads
        .iter()
        .map(|lead| {
            let icon = if lead.processed { "✅" } else { "❌" };
            vec![InlineKeyboardButton::callback(
                format!("{icon} {} - {}", lead.name, lead.phone),
                CallbackAction::ToggleStatus {
                    item_id: lead.id,
                    page,
                    processed: lead.processed,
                }
                .pack(),
            )]
        })
        .collect();

    let pages = total_pages(total);
    let mut nav = Vec::new();
    if page > 0 {
        nav.push(InlineKeyboardButton::callback(
            "⬅️ Prev",
            CallbackAction::Page { target: page - 1 }.pack(),
        ));
    }
    if page + 1 < pages {
        nav.push(InlineKeyboardButton::callback(
            "Next ➡️",
            CallbackAction::Page { target: page + 1 }.pack(),
        ));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn lead(id: i64, processed: bool) -> CallbackRequest {
        CallbackRequest {
            id,
            name: format!("lead{id}"),
            email: None,
            phone: "+79991234567".to_string(),
            lesson_type: crate::store::LessonType::GroupOnline,
            created_at: "2026-08-01 12:00:00".to_string(),
            processed,
        }
    }

    fn callbacks(kb: &InlineKeyboardMarkup) -> Vec<String> {
        kb.inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    fn labels(kb: &InlineKeyboardMarkup) -> Vec<String> {
        kb.inline_keyboard.iter().flatten().map(|b| b.text.clone()).collect()
    }

    #[test]
    fn test_pack_parse_toggle() {
        let action = CallbackAction::ToggleStatus { item_id: 17, page: 2, processed: true };
        assert_eq!(action.pack(), "cb:toggle_status:17:2:1");
        assert_eq!(CallbackAction::parse("cb:toggle_status:17:2:1"), Some(action));
    }

    #[test]
    fn test_pack_parse_page() {
        let action = CallbackAction::Page { target: 3 };
        assert_eq!(CallbackAction::parse(&action.pack()), Some(action));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "cb:page:0:1",
            "cb:page:0:1:0:extra",
            "xx:page:0:1:0",
            "cb:unknown:0:1:0",
            "cb:toggle_status:abc:1:0",
            "cb:page:0:-1:0",
        ] {
            assert_eq!(CallbackAction::parse(bad), None, "should reject {bad:?}");
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(23), 3);
    }

    #[test]
    fn test_first_page_has_next_but_no_prev() {
        let leads: Vec<_> = (1..=10).map(|i| lead(i, false)).collect();
        let kb = leads_keyboard(&leads, 0, 23);
        let data = callbacks(&kb);

        assert!(!data.iter().any(|d| d == &CallbackAction::Page { target: 0 }.pack()));
        assert!(data.contains(&CallbackAction::Page { target: 1 }.pack()));
        assert!(!labels(&kb).iter().any(|l| l.contains("Prev")));
    }

    #[test]
    fn test_last_page_has_prev_but_no_next() {
        let leads: Vec<_> = (21..=23).map(|i| lead(i, false)).collect();
        let kb = leads_keyboard(&leads, 2, 23);
        let data = callbacks(&kb);

        assert!(data.contains(&CallbackAction::Page { target: 1 }.pack()));
        assert!(!data.iter().any(|d| d == &CallbackAction::Page { target: 3 }.pack()));
        assert!(!labels(&kb).iter().any(|l| l.contains("Next")));
    }

    #[test]
    fn test_middle_page_has_both_controls() {
        let leads: Vec<_> = (11..=20).map(|i| lead(i, false)).collect();
        let kb = leads_keyboard(&leads, 1, 23);
        let data = callbacks(&kb);

        assert!(data.contains(&CallbackAction::Page { target: 0 }.pack()));
        assert!(data.contains(&CallbackAction::Page { target: 2 }.pack()));
    }

    #[test]
    fn test_single_page_has_no_pagination() {
        let leads: Vec<_> = (1..=5).map(|i| lead(i, false)).collect();
        let kb = leads_keyboard(&leads, 0, 5);
        for label in labels(&kb) {
            assert!(!label.contains("Prev") && !label.contains("Next"), "unexpected {label}");
        }
    }

    #[test]
    fn test_status_icons() {
        let kb = leads_keyboard(&[lead(1, true), lead(2, false)], 0, 2);
        let labels = labels(&kb);
        assert!(labels[0].starts_with("✅"));
        assert!(labels[1].starts_with("❌"));
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let kb = leads_keyboard(&[], 0, 0);
        assert_eq!(labels(&kb), vec!["No leads yet".to_string()]);
        assert_eq!(callbacks(&kb), vec![CallbackAction::Noop.pack()]);
    }

    #[test]
    fn test_page_text() {
        assert_eq!(page_text(0, 23), "Leads (page 1/3, total 23)");
        assert_eq!(page_text(2, 23), "Leads (page 3/3, total 23)");
        assert_eq!(page_text(0, 0), "Leads (page 1/1, total 0)");
    }
}
