//! Admin console bot entry point.

use std::sync::Arc;

use teloxide::Bot;
use tracing::{error, info};

use school_leads::config::Config;
use school_leads::store::LeadStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let _guard = school_leads::logging::init(&config.data_dir, "bot.log");

    let Some(telegram) = config.telegram.clone() else {
        error!("BOT_TOKEN and ADMIN_ID must be set; refusing to serve admin commands");
        std::process::exit(1);
    };

    let store = match LeadStore::open(&config.database_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to open lead store: {e}");
            std::process::exit(1);
        }
    };

    info!("🚀 Starting admin console bot (admin id {})", telegram.admin_id);
    let bot = Bot::new(&telegram.bot_token);
    school_leads::bot::run(bot, telegram.admin_id, store).await;
}
