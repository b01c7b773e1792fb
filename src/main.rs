mod config;
mod gateway;
mod logging;
mod probe;
mod schedule;

use anyhow::{Context, Result};
use config::AppConfig;
use gateway::GatewayClient;
use probe::HttpProbe;
use schedule::{ScheduleConfig, ScheduleCoordinator};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config::config_path();
    let config = AppConfig::load(&config_path)?;

    let _log_guard = logging::init(&config.log_file_path)?;

    let table = config::load_error_table(&config.info_sheet_path)?;
    let request = config.login_request();

    info!("Gateway: {}", config.gateway_host);
    info!("  Account: {}@{}", config.user_account, config.operator);
    info!("  Error table: {} entries", table.len());

    let gateway = GatewayClient::new(request, Arc::new(table), config.request_timeout())
        .context("Error creating gateway client")?;
    let probe = HttpProbe::new(config.probe_url.clone(), config.request_timeout())
        .context("Error creating connectivity probe")?;
    info!("  Probe: {}", probe.url());

    info!("Initialization success!");

    let coordinator = ScheduleCoordinator::new(
        Arc::new(gateway),
        Arc::new(probe),
        ScheduleConfig::default(),
    );
    let (handle, mut events) = coordinator.start();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    // Main event loop
    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Received signal, program will exit...");
                break;
            }
            Some(event) = events.recv() => {
                schedule::report(&event);
            }
        }
    }

    handle.shutdown();
    handle.join().await;
    while let Ok(event) = events.try_recv() {
        schedule::report(&event);
    }

    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
