pub mod activity;
pub mod config;
pub mod storage;

pub use activity::{ActivityBook, ActivityTemplate, ActivityUpdate, NewActivity};
pub use config::{Config, Platform, DEFAULT_GOOGLE_CLIENT_ID};
pub use storage::StateStore;

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Cairn core initialized");
    Ok(())
}
