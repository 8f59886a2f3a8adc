//! Helper functions for UI operations.
//!
//! Spawning of background commands, panic containment and opening links.

use crate::api::BackendClient;
use crate::app::{App, AppEvent, Command};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but
/// not handled), panics are converted to `Err(String)` containing the panic
/// message.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Reports a cancelled settlement unless disarmed.
///
/// Lives inside every command task. If the task is aborted or panics before
/// it reports, dropping the guard still releases the command's loading flag.
struct SettleOnDrop {
    tx: mpsc::Sender<AppEvent>,
    event: Option<AppEvent>,
}

impl SettleOnDrop {
    fn disarm(&mut self) {
        self.event = None;
    }
}

impl Drop for SettleOnDrop {
    fn drop(&mut self) {
        let Some(event) = self.event.take() else {
            return;
        };
        match self.tx.try_send(event) {
            Ok(()) => {}
            // A full queue must not lose the settlement; wait for room instead.
            Err(TrySendError::Full(event)) => match Handle::try_current() {
                Ok(handle) => {
                    let tx = self.tx.clone();
                    handle.spawn(async move {
                        if let Err(e) = tx.send(event).await {
                            tracing::debug!(error = %e, "Could not report cancelled task");
                        }
                    });
                }
                Err(e) => tracing::warn!(error = %e, "Cancelled task report dropped outside runtime"),
            },
            // Receiver is gone on shutdown.
            Err(TrySendError::Closed(_)) => tracing::debug!("Could not report cancelled task"),
        }
    }
}

/// Spawn `command` as a background task reporting to `tx`.
pub(super) fn spawn_command(
    command: Command,
    client: BackendClient,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    let task = command.name();
    let mut guard = SettleOnDrop {
        tx: tx.clone(),
        event: Some(command.cancelled()),
    };
    tracing::debug!(task, "Spawning background task");

    tokio::spawn(async move {
        match catch_task_panic(command.run(client)).await {
            Ok(event) => {
                guard.disarm();
                if let Err(e) = tx.send(event).await {
                    tracing::warn!(task, error = %e, "Failed to send task result (receiver dropped)");
                }
            }
            Err(error) => {
                tracing::error!(task, error = %error, "Background task panicked");
                let _ = tx.send(AppEvent::TaskPanicked { task, error }).await;
                // guard drops armed and reports the cancellation
            }
        }
    })
}

/// Run the command produced by a user action, if any.
///
/// A new fetch aborts the previous fetch task. Other commands are detached;
/// they are short-lived and each is guarded against duplicates by the app.
pub(super) fn run_command(app: &mut App, command: Option<Command>, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(command) = command {
        let is_fetch = matches!(command, Command::Fetch(_));
        let handle = spawn_command(command, app.client.clone(), event_tx.clone());
        if is_fetch {
            if let Some(previous) = app.fetch_handle.replace(handle) {
                previous.abort();
                tracing::debug!("Aborted superseded fetch task");
            }
        }
    }
    reap_fetch_task(app);
}

/// Abort the fetch task if the dispatcher no longer waits for it (a cache
/// hit or a reset superseded it).
pub(super) fn reap_fetch_task(app: &mut App) {
    if !app.is_loading() {
        if let Some(handle) = app.fetch_handle.take() {
            if !handle.is_finished() {
                handle.abort();
                tracing::debug!("Aborted fetch task no longer awaited");
            }
        }
    }
}

/// Open the selected article or saved entry in the system browser.
pub(super) fn open_selected(app: &mut App) {
    match app.selected_url_for_open() {
        None => {}
        Some(Err(e)) => app.set_status(format!("Cannot open: {e}")),
        Some(Ok(url)) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {e}"));
            } else {
                app.set_status("Opened in browser");
            }
        }
    }
}
