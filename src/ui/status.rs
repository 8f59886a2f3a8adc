use crate::app::{App, View};
use crate::query::Mode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.editing_topic {
        Cow::Borrowed("Type a topic | ENTER search | ESC stop editing")
    } else {
        match app.view {
            View::Browse if app.controller.mode() == Some(Mode::Favorite) => Cow::Borrowed(
                "[c]ycle [b/t/p/n]category [+/-]limit [s]ummary [w]save [l]inks [o]pen [v]saved [q]uit",
            ),
            View::Browse => Cow::Borrowed(
                "[1-3]mode [/]topic [+/-]limit [s]ummary [w]save [l]inks [o]pen [v]saved [q]uit",
            ),
            View::Saved => Cow::Borrowed("[d]elete [r]efresh [o]pen [j/k]move [ESC]back"),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}
