//! Serve command - run the HTTP service until Ctrl-C.

use std::net::SocketAddr;

use tracing::{info, warn};
use zonewatch::app::{AppConfig, ZoneWatchApp};

use crate::error::CliError;
use crate::runner::CliRunner;

pub fn run(runner: &CliRunner, bind: Option<SocketAddr>) -> Result<(), CliError> {
    runner.log_startup("serve");

    let mut app_config = AppConfig::from_config_file(runner.config())?;
    if let Some(addr) = bind {
        app_config = app_config.with_bind(addr);
    }

    println!("ZoneWatch v{}", zonewatch::VERSION);
    println!("================================");
    println!();
    println!("Listen:   http://{}", app_config.bind);
    println!("Zones:    {}", app_config.catalog.len());
    println!("Eviction: {}", app_config.eviction);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(async move {
        let app = ZoneWatchApp::start(app_config).await;

        let shutdown = app.shutdown_token();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, shutting down"),
                Err(e) => {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                    return;
                }
            }
            shutdown.cancel();
        });

        let result = app.serve().await;
        app.shutdown().await;
        result
    })?;

    println!("Stopped.");
    Ok(())
}
