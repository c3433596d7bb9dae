//! Web intake service entry point.

use std::sync::Arc;

use tracing::{error, info};

use school_leads::config::Config;
use school_leads::notify::Notifier;
use school_leads::store::LeadStore;
use school_leads::web::{self, AppState};

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

    let _guard = school_leads::logging::init(&config.data_dir, "web.log");
    info!("🚀 Starting language school web service");

    let notifier = match &config.telegram {
        Some(telegram) => Some(Arc::new(Notifier::new(
            telegram.bot_token.clone(),
            telegram.admin_id,
        ))),
        None => {
            error!("BOT_TOKEN or ADMIN_ID not set; admin notifications are disabled");
            None
        }
    };

    let store = match LeadStore::open(&config.database_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to open lead store: {e}");
            std::process::exit(1);
        }
    };

    let app = web::router(AppState { store, notifier });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    info!("Listening on {addr}");

    axum::serve(listener, app).await.expect("Server error");
}
