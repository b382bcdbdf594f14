use std::sync::Arc;

use anyhow::Result;
use donation_tracker_backend::{initialize_backend, AppConfig, NoopNotifier, StoreConnection};
use serde_json::json;
use shared::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Opening donation data at {}", config.data_directory.display());
    let connection = StoreConnection::open_directory(&config.data_directory)?;
    let state = initialize_backend(connection, Arc::new(NoopNotifier));

    let admin = Session::admin(config.admin_user.clone());
    let inventory = state.inventory_service.approved_inventory()?;
    let pending = state.review_service.list_pending(Some(&admin))?;

    info!("{} donations awaiting review", pending.len());
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "inventory": inventory,
            "pendingReview": pending,
        }))?
    );

    Ok(())
}
