//! Command and callback handlers for the admin console.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId};
use teloxide::{ApiError, RequestError};
use tracing::{error, info, warn};

use crate::bot::BotState;
use crate::bot::keyboard::{CallbackAction, LEADS_PER_PAGE, leads_keyboard, page_text};
use crate::store::{LeadStore, StoreError};

/// A caller who is not the configured administrator.
#[derive(Debug, PartialEq, Eq)]
pub struct Unauthorized {
    pub user_id: i64,
}

/// Admin check, evaluated before any side effect. Shared by the message and
/// callback handlers so no privileged path can skip it.
pub fn authorize(admin_id: i64, user_id: i64) -> Result<(), Unauthorized> {
    if user_id == admin_id {
        Ok(())
    } else {
        Err(Unauthorized { user_id })
    }
}

fn fetch_page(store: &LeadStore, page: u64) -> Result<(String, InlineKeyboardMarkup), StoreError> {
    let offset = page * LEADS_PER_PAGE;
    let (leads, total) = store.list_page(offset, LEADS_PER_PAGE)?;
    Ok((page_text(page, total), leads_keyboard(&leads, page, total)))
}

/// `/start` and `/callbacks` both open page 0 of the lead list.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let command = text.split_whitespace().next().unwrap_or("");
    let command = command.split('@').next().unwrap_or(command);
    if command != "/start" && command != "/callbacks" {
        return Ok(());
    }

    if let Err(denied) = authorize(state.admin_id, user.id.0 as i64) {
        warn!("Unauthorized {command} from user {}", denied.user_id);
        bot.send_message(
            msg.chat.id,
            "Sorry, this command is only available to the administrator.",
        )
        .await?;
        return Ok(());
    }

    info!("Admin {} requested the leads list", user.id);
    match fetch_page(&state.store, 0) {
        Ok((text, keyboard)) => {
            bot.send_message(msg.chat.id, text).reply_markup(keyboard).await?;
        }
        Err(e) => {
            error!("Failed to load leads page 0: {e}");
            bot.send_message(msg.chat.id, "Failed to load the lead list. Please try again.")
                .await?;
        }
    }
    Ok(())
}

/// What happened when re-rendering a page in place.
enum RefreshOutcome {
    Updated,
    /// Telegram reported the message unchanged; e.g. two toggles converged.
    NotModified,
    LoadFailed,
    EditFailed,
}

/// Button presses: pagination, status toggles, and the empty-list noop.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> ResponseResult<()> {
    if let Err(denied) = authorize(state.admin_id, q.from.id.0 as i64) {
        warn!("Unauthorized callback from user {}", denied.user_id);
        bot.answer_callback_query(q.id.clone())
            .text("Access denied.")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let Some(action) = CallbackAction::parse(data) else {
        warn!("Malformed callback payload: {data}");
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let Some(message) = q.message.as_ref().and_then(|m| m.regular_message()) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let chat_id = message.chat.id;
    let message_id = message.id;

    let outcome = match action {
        CallbackAction::Noop => RefreshOutcome::Updated,
        CallbackAction::Page { target } => {
            info!("Admin {} requested page {target}", q.from.id);
            refresh_page(&bot, chat_id, message_id, &state.store, target).await?
        }
        CallbackAction::ToggleStatus { item_id, page, processed } => {
            let new_status = !processed;
            info!("Admin {} toggling lead {item_id} to processed={new_status}", q.from.id);
            match state.store.set_processed(item_id, new_status) {
                Ok(()) => refresh_page(&bot, chat_id, message_id, &state.store, page).await?,
                Err(e) => {
                    // No optimistic update: the message keeps its old state.
                    error!("Failed to update lead {item_id}: {e}");
                    bot.answer_callback_query(q.id.clone())
                        .text("Failed to update the lead status.")
                        .show_alert(true)
                        .await?;
                    return Ok(());
                }
            }
        }
    };

    match outcome {
        RefreshOutcome::Updated => {
            bot.answer_callback_query(q.id.clone()).await?;
        }
        RefreshOutcome::NotModified => {
            bot.answer_callback_query(q.id.clone()).text("Status updated.").await?;
        }
        RefreshOutcome::LoadFailed => {
            bot.answer_callback_query(q.id.clone())
                .text("Failed to load the lead list.")
                .show_alert(true)
                .await?;
        }
        RefreshOutcome::EditFailed => {
            bot.answer_callback_query(q.id.clone())
                .text("Failed to refresh the list.")
                .show_alert(true)
                .await?;
        }
    }
    Ok(())
}

/// Re-render a page in the existing message.
async fn refresh_page(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    store: &LeadStore,
    page: u64,
) -> ResponseResult<RefreshOutcome> {
    let (text, keyboard) = match fetch_page(store, page) {
        Ok(page) => page,
        Err(e) => {
            error!("Failed to load leads page {page}: {e}");
            return Ok(RefreshOutcome::LoadFailed);
        }
    };

    match bot.edit_message_text(chat_id, message_id, text).reply_markup(keyboard).await {
        Ok(_) => Ok(RefreshOutcome::Updated),
        Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(RefreshOutcome::NotModified),
        Err(e) => {
            error!("Failed to edit leads message: {e}");
            Ok(RefreshOutcome::EditFailed)
        }
    }
}
