//! Admin console bot: lists leads and toggles their processed status.
//!
//! Restricted to the single configured administrator; everyone else gets an
//! access-denied response and no state changes.

pub mod handlers;
pub mod keyboard;

pub use keyboard::{CallbackAction, LEADS_PER_PAGE};

use std::sync::Arc;

use teloxide::prelude::*;

use crate::store::LeadStore;

pub struct BotState {
    pub admin_id: i64,
    pub store: Arc<LeadStore>,
}

/// Run the dispatcher until shutdown.
pub async fn run(bot: Bot, admin_id: i64, store: Arc<LeadStore>) {
    let state = Arc::new(BotState { admin_id, store });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
