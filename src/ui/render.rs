//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use crate::query::{Category, Mode, ModeState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;
use super::{articles, saved, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

const SPINNER: [char; SPINNER_FRAMES] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub(super) fn spinner(app: &App) -> char {
    SPINNER[app.spinner_frame % SPINNER_FRAMES]
}

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    match app.view {
        View::Browse => {
            render_header(f, app, chunks[0]);
            articles::render(f, app, chunks[1]);
        }
        View::Saved => {
            render_saved_header(f, app, chunks[0]);
            saved::render(f, app, chunks[1]);
        }
    }
    status::render(f, app, chunks[2]);

    if let Some(notice) = &app.notice {
        render_notice_overlay(f, notice);
    }
}

/// Mode tabs on the first line, the mode's parameter and limit on the second.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let active = app.controller.mode();
    let mut tabs = Vec::new();
    for (i, mode) in Mode::ALL.iter().enumerate() {
        let style = if active == Some(*mode) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        tabs.push(Span::styled(format!(" [{}] {} ", i + 1, mode.label()), style));
        tabs.push(Span::raw(" "));
    }

    let mut detail = match app.controller.state() {
        ModeState::Unselected => vec![Span::styled(
            "Choose a mode to start browsing",
            Style::default().fg(Color::DarkGray),
        )],
        ModeState::Trending => vec![Span::raw("Top stories right now")],
        ModeState::TopicPending { draft } | ModeState::TopicActive { draft, .. } => {
            let mut spans = vec![Span::raw("Topic: ")];
            let draft_style = if app.editing_topic {
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(draft.clone(), draft_style));
            if app.editing_topic {
                spans.push(Span::raw("_"));
            }
            if let ModeState::TopicActive { topic, .. } = app.controller.state() {
                if topic != draft || !app.editing_topic {
                    spans.push(Span::styled(
                        format!("  (showing \"{topic}\")"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            spans
        }
        ModeState::FavoritePending | ModeState::FavoriteActive(_) => {
            let chosen = match app.controller.state() {
                ModeState::FavoriteActive(c) => Some(*c),
                _ => None,
            };
            category_spans(chosen)
        }
    };

    let limit = app
        .controller
        .current_query()
        .map_or(app.controller.limit(), |q| q.limit);
    detail.push(Span::styled(
        format!("   Limit: {limit}"),
        Style::default().fg(Color::Yellow),
    ));
    if app.is_loading() {
        detail.push(Span::styled(
            format!("   {} Loading...", spinner(app)),
            Style::default().fg(Color::Cyan),
        ));
    }

    let paragraph = Paragraph::new(vec![Line::from(tabs), Line::from(detail)])
        .block(Block::default().borders(Borders::ALL).title(" Newsdesk "));
    f.render_widget(paragraph, area);
}

fn category_spans(chosen: Option<Category>) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("Category: ")];
    for category in Category::ALL {
        let style = if chosen == Some(category) {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", category.label()), style));
        spans.push(Span::raw(" "));
    }
    if chosen.is_none() {
        spans.push(Span::styled("(press c)", Style::default().fg(Color::DarkGray)));
    }
    spans
}

fn render_saved_header(f: &mut Frame, app: &App, area: Rect) {
    let mut line = vec![Span::styled(
        format!("{} saved articles", app.saved.items().len()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.saved.is_refreshing() {
        line.push(Span::styled(
            format!("   {} Refreshing...", spinner(app)),
            Style::default().fg(Color::Cyan),
        ));
    }
    let paragraph = Paragraph::new(Line::from(line))
        .block(Block::default().borders(Borders::ALL).title(" Saved Articles "));
    f.render_widget(paragraph, area);
}

/// Blocking failure notice, centered on screen.
fn render_notice_overlay(f: &mut Frame, notice: &str) {
    let area = f.area();

    let width = 60u16.min(area.width.saturating_sub(4));
    let height = 8u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let text = format!("{notice}\n\n[Enter] Dismiss");
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test]
    async fn test_small_terminal_message() {
        let app = App::new(&Config::default()).unwrap();
        assert!(draw(&app, 40, 8).contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_unselected_prompt() {
        let app = App::new(&Config::default()).unwrap();
        let screen = draw(&app, 100, 30);
        assert!(screen.contains("Choose a mode"));
        assert!(screen.contains("Trending"));
    }

    #[tokio::test]
    async fn test_notice_overlay_drawn() {
        let mut app = App::new(&Config::default()).unwrap();
        app.notice = Some("Could not load news".into());
        assert!(draw(&app, 100, 30).contains("Could not load news"));
    }
}
