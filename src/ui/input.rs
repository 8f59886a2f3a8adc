//! Input handling for the TUI.
//!
//! Keys are routed by what currently owns the keyboard: the blocking notice,
//! the topic editor, or the active view.

use crate::app::{App, AppEvent, Command, View};
use crate::query::{Category, Mode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_selected, run_command};
use super::Action;

/// Maximum topic length accepted from the keyboard.
const MAX_TOPIC_LENGTH: usize = 200;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    // The notice captures all keys until dismissed.
    if app.notice.is_some() {
        if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return Ok(Action::Continue);
    }

    let command = if app.editing_topic {
        handle_topic_input(app, code)
    } else {
        match app.view {
            View::Browse => match handle_browse_input(app, code) {
                Some(Action::Quit) => return Ok(Action::Quit),
                Some(Action::Continue) => None,
                None => app_command(app, code),
            },
            View::Saved => handle_saved_input(app, code),
        }
    };

    run_command(app, command, event_tx);
    Ok(Action::Continue)
}

/// Keys that edit the topic draft.
fn handle_topic_input(app: &mut App, code: KeyCode) -> Option<Command> {
    let mut draft = app.controller.draft().unwrap_or_default().to_string();
    match code {
        KeyCode::Enter => return app.submit_topic(),
        KeyCode::Esc => {
            app.editing_topic = false;
            return None;
        }
        KeyCode::Backspace => {
            draft.pop();
        }
        KeyCode::Char(c) if !c.is_control() => {
            if draft.chars().count() >= MAX_TOPIC_LENGTH {
                app.set_status(format!("Topic too long (max {MAX_TOPIC_LENGTH} chars)"));
                return None;
            }
            draft.push(c);
        }
        _ => return None,
    }
    app.set_draft(draft);
    None
}

/// Navigation and view keys in browse view. Returns `Some` when the key
/// was fully handled here.
fn handle_browse_input(app: &mut App, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => {
            app.nav_down();
            Some(Action::Continue)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.nav_up();
            Some(Action::Continue)
        }
        KeyCode::Char('l') => {
            app.toggle_links();
            Some(Action::Continue)
        }
        KeyCode::Char('o') => {
            open_selected(app);
            Some(Action::Continue)
        }
        _ => None,
    }
}

/// Browse-view keys that may produce network work.
fn app_command(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('1') => app.select_mode(Mode::Trending),
        KeyCode::Char('2') => app.select_mode(Mode::Topic),
        KeyCode::Char('3') => app.select_mode(Mode::Favorite),
        KeyCode::Char('/') => {
            if app.controller.mode() == Some(Mode::Topic) {
                app.editing_topic = true;
                None
            } else {
                app.select_mode(Mode::Topic)
            }
        }
        KeyCode::Char('c') => app.cycle_category(),
        KeyCode::Char(c @ ('b' | 't' | 'p' | 'n')) if app.controller.mode() == Some(Mode::Favorite) => {
            let category = match c {
                'b' => Category::Business,
                't' => Category::Technology,
                'p' => Category::Sports,
                _ => Category::Science,
            };
            app.choose_category(category)
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => app.step_limit(true),
        KeyCode::Char('-') | KeyCode::Left => app.step_limit(false),
        KeyCode::Char('s') | KeyCode::Enter => app.request_summary(),
        KeyCode::Char('w') => app.save_selected(),
        KeyCode::Char('v') => app.open_saved_view(),
        _ => None,
    }
}

fn handle_saved_input(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('q') => {
            app.close_saved_view();
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.nav_down();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.nav_up();
            None
        }
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_saved(),
        KeyCode::Char('r') => app.refresh_saved(),
        KeyCode::Char('o') => {
            open_selected(app);
            None
        }
        _ => None,
    }
}
