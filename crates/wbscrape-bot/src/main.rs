mod app;
mod commands;
mod dispatch;
mod keepalive;
mod pipeline;
mod telegram;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use wbscrape_core::AppConfig;
use wbscrape_scraper::{CatalogClient, CatalogEndpoints, RequestResolver};

use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "wbscrape-bot")]
#[command(about = "Telegram bot exporting Wildberries seller and brand catalogs to xlsx")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the Telegram bot (default).
    Run,
    /// Scrape one seller or brand link into a spreadsheet and exit.
    Scrape {
        /// Storefront link, e.g. <https://www.wildberries.ru/seller/8969>.
        url: String,
        /// Directory for the spreadsheet; defaults to `WBSCRAPE_OUTPUT_DIR`.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = wbscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        None | Some(Commands::Run) => run_bot(config).await,
        Some(Commands::Scrape { url, output_dir }) => scrape_once(&config, &url, output_dir).await,
    }
}

async fn run_bot(config: AppConfig) -> anyhow::Result<()> {
    let keepalive_addr = config.keepalive_addr;
    let app = Arc::new(App::from_config(config)?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let keepalive = keepalive_addr.map(|addr| {
        let mut rx = shutdown_rx.clone();
        tokio::spawn(keepalive::serve(addr, async move {
            let _ = rx.wait_for(|stop| *stop).await;
        }))
    });

    dispatch::run(app, shutdown_rx).await;

    if let Some(handle) = keepalive {
        handle.await??;
    }
    Ok(())
}

async fn scrape_once(
    config: &AppConfig,
    url: &str,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let client = CatalogClient::from_config(config)?;
    let resolver = RequestResolver::new(CatalogEndpoints::default())?;

    let request = resolver
        .resolve(&client, url)
        .await
        .with_context(|| format!("cannot scrape {url}"))?;

    let products = client.fetch_all_pages(&request.base_query_url).await;
    let path = output_dir
        .unwrap_or_else(|| config.output_dir.clone())
        .join(&request.output_filename);

    let count = products.len();
    let export_path = path.clone();
    tokio::task::spawn_blocking(move || wbscrape_scraper::export_products(&products, &export_path))
        .await??;

    println!("wrote {count} products to {}", path.display());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
