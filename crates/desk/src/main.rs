//! Queue Desk - Main Entry Point
//! Front-desk console for the advising queue with a schedule ticker

mod console;
mod render;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use advising_queue_core::application::{shutdown_channel, QueueDesk, ScheduleTicker};
use advising_queue_core::port::{StaticCredentials, SystemTimeProvider, TracingNotifier, UuidProvider};

use crate::console::Console;
use crate::settings::DeskSettings;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG_PATH: &str = "queue-desk.toml";

#[derive(Parser)]
#[command(name = "queue-desk")]
#[command(about = "Advising queue front-desk console", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "QUEUE_DESK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log format: pretty or json
    #[arg(long, env = "QUEUE_DESK_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("advising_queue_core=info,queue_desk=info"))
        .context("Failed to create env filter")?;

    match cli.log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    info!(
        core = advising_queue_core::VERSION,
        "Queue Desk v{} starting...",
        VERSION
    );

    // 2. Load configuration
    let config_path = PathBuf::from(shellexpand::tilde(&cli.config).into_owned());
    let settings = DeskSettings::load(&config_path)?;
    info!(
        config = %config_path.display(),
        capacity = settings.capacity,
        advisors = settings.advisors.len(),
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let notifier = Arc::new(TracingNotifier);

    if settings.admin.username.is_empty() {
        tracing::warn!("No admin credentials configured; admin commands are disabled");
    }
    let credentials = Arc::new(StaticCredentials::new(
        settings.admin.username.clone(),
        settings.admin.password.clone(),
    ));

    let schedule = settings
        .schedule_settings(id_provider.as_ref())
        .context("Invalid schedule configuration")?;
    let desk = QueueDesk::new(
        schedule,
        settings.capacity,
        time_provider,
        id_provider,
        notifier,
    )
    .context("Failed to create queue desk")?;
    let desk = Arc::new(Mutex::new(desk));

    // 4. Start schedule ticker
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let ticker = ScheduleTicker::new(desk.clone(), settings.tick_interval());
    let ticker_handle = tokio::spawn(ticker.run(shutdown_rx));

    // 5. Console loop (stdin) until quit, EOF or Ctrl+C
    let mut console = Console::new(desk.clone(), credentials, settings.export_dir());
    println!("{}", render::stats(&desk.lock().await.stats()));
    println!("Type `help` for commands.");

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    let console_result = console.run(BufReader::new(tokio::io::stdin()), ctrl_c).await;

    // 6. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), ticker_handle).await;
    console_result?;

    info!("Shutdown complete.");

    Ok(())
}
