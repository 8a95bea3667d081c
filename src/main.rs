//! Sovereign Sentinel - dashboard entry point
//!
//! 1. Loads `.env` and the YAML configuration (with env overrides)
//! 2. Initializes logging (`LOG_FORMAT`: `tui` default, `json`, `pretty`)
//! 3. Builds the DexScreener client and a screen for the configured variant
//! 4. Runs the terminal UI, or headless in `json`/`pretty` mode

use std::path::Path;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use sovereign_sentinel::config::{self, constants, LogFormat, ResolvedConfig};
use sovereign_sentinel::core::{run_headless, DexScreenerClient, MarketDataSource, Screen};
use sovereign_sentinel::tui::{self, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    // Resolved before logging exists: the log file location comes from config
    let config_path = constants::config_path();
    let ResolvedConfig { config, notices } = config::resolve_config(&config_path)?;

    let format = LogFormat::from_env();
    config::init_logging(format, Path::new(&config.log.file))?;

    for notice in &notices {
        warn!(event_type = "CONFIG_NOTICE", "{}", notice);
    }

    info!(
        event_type = "STARTUP",
        variant = %config.variant,
        ticker = %config.token.ticker,
        api = %config.api.base_url,
        config_path = %config_path.display(),
        "Sovereign dashboard starting"
    );

    let client = DexScreenerClient::new(config.api.base_url.clone(), config.api.timeout())?;
    let source: Arc<dyn MarketDataSource> = Arc::new(client);
    let screen = Screen::new(config, source);

    if format == LogFormat::Tui {
        if let Err(e) = tui::run(App::new(screen)).await {
            error!(event_type = "TUI_FAILED", error = %e, "Dashboard exited with error");
            return Err(e.into());
        }
        return Ok(());
    }

    // Headless: settle once, print the audit trail
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("[SHUTDOWN] Graceful shutdown initiated");
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                eprintln!("Failed to listen for Ctrl+C signal: {}", err);
            }
        }
    });

    for line in run_headless(screen, shutdown_rx).await {
        println!("{}", line);
    }

    info!("[SHUTDOWN] Clean exit");
    Ok(())
}
