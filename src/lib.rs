pub mod activation;
pub mod bridge;
pub mod config;
pub mod db;
pub mod error;
pub mod menu;
pub mod messages;
pub mod selector;
pub mod settings;
pub mod sync;
mod utils;

use std::sync::Arc;

use anyhow::Result;

use bridge::NativeBridge;
use config::EngineConfig;
use db::Database;
use settings::SettingsStore;
use sync::MenuSync;

pub use error::MenuSyncError;

/// Run as a native-messaging host on stdin/stdout until the browser disconnects.
pub async fn run() -> Result<()> {
    // stdout carries the native messaging frames, so logs go to stderr.
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stderr)
        .init();

    let config = EngineConfig::from_env();
    log::info!(
        "formfield-menu starting up (data dir {}, host {:?})",
        config.data_dir.display(),
        config.surface
    );

    let database = Database::new(config.database_path())?;
    let settings = Arc::new(SettingsStore::new(config.settings_path())?);

    let (bridge, queue) = NativeBridge::new();
    let bridge = Arc::new(bridge);
    let sync = MenuSync::new(
        config,
        bridge.clone(),
        bridge.clone(),
        Arc::new(database),
        settings,
    );

    // Building the menus waits on replies, which only arrive once the bridge is serving.
    let starter = sync.clone();
    tokio::spawn(async move {
        if let Err(err) = starter.start().await {
            log::error!("failed to build the extension menus: {err}");
        }
    });

    bridge::serve(tokio::io::stdin(), tokio::io::stdout(), bridge, queue, sync).await
}
