use crate::app::App;
use crate::util::{one_line, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the saved-articles list and the selected entry.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let items: Vec<ListItem> = if app.saved.items().is_empty() {
        let msg = if app.saved.is_loaded() {
            "No saved articles"
        } else {
            "Loading..."
        };
        vec![ListItem::new(Span::styled(msg, Style::default().fg(Color::DarkGray)))]
    } else {
        let max_title = chunks[0].width.saturating_sub(6) as usize;
        app.saved
            .items()
            .iter()
            .map(|entry| {
                let title = one_line(&strip_control_chars(&entry.title));
                let mut spans = vec![Span::raw(truncate_to_width(&title, max_title).into_owned())];
                if app.saved.is_removing(&entry.link) {
                    spans.push(Span::styled(" (removing)", Style::default().fg(Color::DarkGray)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Saved "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let mut state = ListState::default();
    if !app.saved.items().is_empty() {
        state.select(Some(app.saved_selected));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let Some(entry) = app.selected_saved() else {
        f.render_widget(block, chunks[1]);
        return;
    };

    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            one_line(&strip_control_chars(&entry.title)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Publisher: ", dim),
            Span::raw(entry.publisher.as_deref().unwrap_or(crate::model::UNKNOWN_PUBLISHER)),
        ]),
    ];
    if let Some(score) = entry.credibility.as_ref().and_then(|c| c.score) {
        lines.push(Line::from(vec![
            Span::styled("Credibility: ", dim),
            Span::raw(format!("{score:.2}")),
        ]));
    }
    lines.push(Line::from(Span::styled(entry.link.as_str(), Style::default().fg(Color::Blue))));
    if let Some(description) = entry.description.as_deref() {
        lines.push(Line::default());
        lines.push(Line::from(strip_control_chars(description).into_owned()));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}
