//! Long-poll loop: fetch updates, parse commands, run each on its own task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::app::App;
use crate::commands::Command;
use crate::pipeline::handle_command;
use crate::telegram::Update;

/// Pause after a failed `getUpdates` before polling again.
const POLL_BACKOFF: Duration = Duration::from_secs(3);

/// Runs until `shutdown` flips to `true` (or its sender is dropped), then
/// waits for in-flight commands to finish.
pub async fn run(app: Arc<App>, mut shutdown: watch::Receiver<bool>) {
    let mut offset: Option<i64> = None;
    let mut tasks = JoinSet::new();

    tracing::info!("bot polling started");

    while !*shutdown.borrow() {
        while let Some(joined) = tasks.try_join_next() {
            log_join_error(joined);
        }

        let polled = tokio::select! {
            _ = shutdown.changed() => break,
            polled = app.telegram.get_updates(offset, app.config.poll_timeout_secs) => polled,
        };

        match polled {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    let Some((chat_id, command)) = command_of(&update) else {
                        continue;
                    };
                    tracing::debug!(chat_id, ?command, "command received");
                    let app = Arc::clone(&app);
                    tasks.spawn(async move {
                        if let Err(e) = handle_command(&app, chat_id, command).await {
                            tracing::error!(chat_id, error = %format_args!("{e:#}"), "command failed");
                        }
                    });
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, backing off");
                tokio::select! {
                    _ = shutdown.changed() => break,
                    () = tokio::time::sleep(POLL_BACKOFF) => {}
                }
            }
        }
    }

    if !tasks.is_empty() {
        tracing::info!(in_flight = tasks.len(), "waiting for running commands");
    }
    while let Some(joined) = tasks.join_next().await {
        log_join_error(joined);
    }
    tracing::info!("bot polling stopped");
}

fn command_of(update: &Update) -> Option<(i64, Command)> {
    let message = update.message.as_ref()?;
    let command = Command::parse(message.text.as_deref()?)?;
    Some((message.chat.id, command))
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "command task panicked");
    }
}
