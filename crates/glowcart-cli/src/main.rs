//! glowcart - admin command line for the storefront backend.
//!
//! Logs in as an admin and works with products, orders, delivery pricing
//! and the inbox from the terminal. Credentials live in the same `auth`
//! cookie the web dashboard uses, kept in the local data directory.

mod commands;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glowcart_core::{ApiClient, Config, CookieJar, KeyringTokenStore, LocalStore, TokenStore};

use commands::Command;

/// Log file prefix inside the data directory's `logs/` folder
const LOG_FILE_PREFIX: &str = "glowcart.log";

/// Initialize the tracing subscriber for logging.
///
/// Warnings and above go to stderr; everything the filter allows also goes
/// to a daily log file so failed retries can be inspected afterwards.
fn init_tracing(data_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(filter)
        .init();

    guard
}

fn build_client(config: &Config, data_dir: &Path) -> Result<ApiClient> {
    let tokens: Arc<dyn TokenStore> = if config.use_keyring {
        Arc::new(KeyringTokenStore::new())
    } else {
        Arc::new(CookieJar::open(data_dir.to_path_buf()))
    };
    let store = Arc::new(LocalStore::new(data_dir.join("storage"))?);

    ApiClient::builder()
        .config(config)
        .user_agent(concat!("glowcart/", env!("CARGO_PKG_VERSION")))
        .token_store(tokens)
        .local_store(store)
        .on_unauthorized(|_route| {
            eprintln!("Session expired. Run `glowcart login` to sign in again.");
        })
        .build()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let data_dir = config.data_dir()?;
    let _guard = init_tracing(&data_dir);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(Some(command)) => command,
        Ok(None) => {
            commands::print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}\n", e);
            commands::print_usage();
            std::process::exit(2);
        }
    };

    info!(base_url = %config.base_url(), "glowcart starting");
    let client = build_client(&config, &data_dir)?;

    if let Err(e) = commands::run(command, &client, &config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
