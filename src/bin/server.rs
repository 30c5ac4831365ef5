use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use outreach::core::Config;
use outreach::http::{start_server, AppContext};
use outreach::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("🌐 Outreach response endpoint starting...");

    let store = Store::new(config.contacts_file.as_str(), config.tracking_file.as_str());
    let ctx = Arc::new(AppContext { store, config });
    start_server(ctx).await
}
