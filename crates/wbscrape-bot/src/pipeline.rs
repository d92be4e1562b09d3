//! Command handlers: resolve a link, scrape every page, export, deliver.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use wbscrape_core::Product;
use wbscrape_scraper::{export_products, ExportError};

use crate::app::App;
use crate::commands::{Command, HELP_TEXT};

pub(crate) const STARTED_TEXT: &str = "Начало парсинга, подождите...";
pub(crate) const EXPORT_FAILED_TEXT: &str =
    "Не удалось сохранить файл с результатами. Попробуйте позже.";

/// Handles one chat command end to end.
///
/// User input problems are answered in the chat and return `Ok`. Errors
/// returned here are delivery failures (Telegram unreachable, upload
/// rejected) and are only logged by the dispatcher.
pub async fn handle_command(app: &App, chat_id: i64, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Start => app.telegram.send_message(chat_id, HELP_TEXT).await?,
        Command::Parse { link } => handle_parse(app, chat_id, link.as_deref().unwrap_or("")).await?,
    }
    Ok(())
}

async fn handle_parse(app: &App, chat_id: i64, link: &str) -> anyhow::Result<()> {
    let started = Instant::now();

    let request = match app.resolver.resolve(&app.catalog, link).await {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(chat_id, link, error = %e, "rejected storefront link");
            app.telegram.send_message(chat_id, e.user_message()).await?;
            return Ok(());
        }
    };

    app.telegram.send_message(chat_id, STARTED_TEXT).await?;
    tracing::info!(
        chat_id,
        kind = %request.kind,
        file = %request.output_filename,
        "scrape started"
    );

    let products = app.catalog.fetch_all_pages(&request.base_query_url).await;
    let count = products.len();

    let (workdir, path) = match write_export(
        app.config.output_dir.clone(),
        request.output_filename.clone(),
        products,
    )
    .await
    {
        Ok(written) => written,
        Err(e) => {
            tracing::error!(chat_id, file = %request.output_filename, error = %e, "export failed");
            app.telegram.send_message(chat_id, EXPORT_FAILED_TEXT).await?;
            return Ok(());
        }
    };

    let delivery = app.telegram.send_document(chat_id, &path).await;
    remove_export(workdir, &path);
    delivery?;

    let elapsed = started.elapsed().as_secs_f64();
    tracing::info!(chat_id, count, elapsed_secs = elapsed, "scrape delivered");
    app.telegram
        .send_message(
            chat_id,
            &format!(
                "Парсинг завершен за {elapsed:.2} секунд. Данные сохранены в {}",
                request.output_filename
            ),
        )
        .await?;
    Ok(())
}

/// Writes the spreadsheet into a fresh private directory under `output_dir`,
/// so concurrent scrapes of the same storefront never share a path.
///
/// Runs on the blocking pool. The directory is removed when the returned
/// [`TempDir`] is closed or dropped.
pub(crate) async fn write_export(
    output_dir: PathBuf,
    filename: String,
    products: Vec<Product>,
) -> Result<(TempDir, PathBuf), ExportError> {
    tokio::task::spawn_blocking(move || -> Result<(TempDir, PathBuf), ExportError> {
        std::fs::create_dir_all(&output_dir)?;
        let workdir = tempfile::Builder::new()
            .prefix("wbscrape-")
            .tempdir_in(&output_dir)?;
        let path = workdir.path().join(filename);
        export_products(&products, &path)?;
        Ok((workdir, path))
    })
    .await
    .map_err(|e| ExportError::Io(std::io::Error::other(e)))?
}

fn remove_export(workdir: TempDir, path: &Path) {
    match workdir.close() {
        Ok(()) => tracing::info!(path = %path.display(), "export file removed"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove export file"),
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
