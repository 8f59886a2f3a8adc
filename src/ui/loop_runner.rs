//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! background task events, and periodic ticks.

use crate::app::{App, AppEvent, Command};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::helpers::{reap_fetch_task, run_command};
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex terminal input, command completions
/// arriving on the `AppEvent` channel, and a 250ms tick for status expiry
/// and the loading spinner.
///
/// `initial` is run before the first frame (e.g. the fetch for a mode given
/// on the command line).
///
/// Installs a panic hook that restores terminal state before unwinding.
pub async fn run(
    app: &mut App,
    initial: Option<Command>,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    run_command(app, initial, &event_tx);

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain completions before handling more input so results are not
        // starved by fast typing.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal input error");
                        break;
                    }
                    None => break,
                }
            }

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn handle_app_event(app: &mut App, event: AppEvent) {
    app.handle_event(event);
    reap_fetch_task(app);
}

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = 10;

fn handle_tick(app: &mut App) {
    if app.is_loading() || app.enrichment.has_pending() || app.saved.is_refreshing() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
