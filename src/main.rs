use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{debug, info};

mod cli;

use cli::Cli;
use ytsum::config::{Config, config_path};
use ytsum::handler::RequestHandler;
use ytsum::transcript::{DEFAULT_LANGUAGES, TranscriptFetcher};
use ytsum::youtube::InnerTubeBackend;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config_file = cli.config.clone().unwrap_or_else(config_path);

    // CLI flags take priority over the config file
    let bind = cli.bind.clone().unwrap_or_else(|| config.bind().to_string());
    let languages = if !cli.lang.is_empty() {
        cli.lang.clone()
    } else {
        config
            .languages
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect())
    };
    let timeout = cli
        .timeout
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.timeout());

    if cli.verbose {
        if config_file.exists() {
            eprintln!("Config: {}", config_file.display());
        }
        eprintln!("Languages: {}", languages.join(", "));
        eprintln!("Timeout: {timeout:?}");
    }
    debug!("Preferred languages: {languages:?}, timeout: {timeout:?}");

    let backend = InnerTubeBackend::with_timeout(timeout).wrap_err("failed to build HTTP client")?;
    let fetcher = TranscriptFetcher::new(Arc::new(backend), languages);
    let handler = Arc::new(RequestHandler::new(fetcher));

    let listener = tokio::net::TcpListener::bind(bind.as_str())
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;

    if cli.verbose {
        eprintln!("Listening on http://{}", listener.local_addr()?);
    }

    ytsum::server::serve(listener, handler, shutdown_signal()).await?;
    Ok(())
}
