use crate::app::App;
use crate::model::Article;
use crate::util::{one_line, strip_control_chars, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::render::spinner;

/// Format a timestamp relative to now ("5m", "3h", "2d", else "Oct 03").
pub fn format_relative_time(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = published else {
        return String::new();
    };

    let diff = (now - ts).num_seconds();

    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    ts.format("%b %d").to_string()
}

fn credibility_color(score: f64) -> Color {
    if score >= 2.0 {
        Color::Green
    } else if score >= 1.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Article list on the left, detail of the selected article on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_list(f, app, chunks[0]);
    render_detail(f, app, chunks[1]);
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let articles = app.visible();
    let now = Utc::now();

    let items: Vec<ListItem> = if articles.is_empty() {
        let msg = if app.is_loading() {
            "Loading..."
        } else if app.shows_no_results() {
            "No results"
        } else {
            "No articles"
        };
        vec![ListItem::new(Span::styled(msg, Style::default().fg(Color::DarkGray)))]
    } else {
        articles
            .iter()
            .map(|article| {
                let key = article.key();
                let mut spans = Vec::new();

                if app.enrichment.is_saved(&key) {
                    spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
                }

                let time_str = format_relative_time(article.published(), now);
                let reserved = 8 + time_str.len() as u16;
                let max_title = area.width.saturating_sub(reserved) as usize;
                let title = one_line(&strip_control_chars(article.display_title()));
                spans.push(Span::raw(truncate_to_width(&title, max_title).into_owned()));

                if let Some(score) = article.credibility_score() {
                    spans.push(Span::styled(
                        format!(" {score:.1}"),
                        Style::default().fg(credibility_color(score)),
                    ));
                }
                if !time_str.is_empty() {
                    spans.push(Span::styled(
                        format!("  {time_str}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let title = match app.dispatcher.shown_query() {
        Some(query) => format!(" {} ({}) ", query.series, articles.len()),
        None => " Articles ".to_string(),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    if !articles.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let Some(article) = app.selected_article() else {
        f.render_widget(block, area);
        return;
    };

    let paragraph = Paragraph::new(detail_lines(app, article))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn detail_lines<'a>(app: &App, article: &'a Article) -> Vec<Line<'a>> {
    let key = article.key();
    let state = app.enrichment.state(&key);
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            one_line(&strip_control_chars(article.display_title())),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Publisher: ", dim),
            Span::raw(article.publisher_name()),
        ]),
    ];

    if let Some(published) = article.published() {
        lines.push(Line::from(vec![
            Span::styled("Published: ", dim),
            Span::raw(published.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]));
    }
    if let Some(topic) = article.topic.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(vec![Span::styled("Topic: ", dim), Span::raw(topic)]));
    }
    match article.credibility_score() {
        Some(score) => lines.push(Line::from(vec![
            Span::styled("Credibility: ", dim),
            Span::styled(format!("{score:.2}"), Style::default().fg(credibility_color(score))),
        ])),
        None => lines.push(Line::from(Span::styled("Credibility: n/a", dim))),
    }
    if app.enrichment.is_saved(&key) {
        lines.push(Line::from(Span::styled("★ Saved", Style::default().fg(Color::Yellow))));
    } else if state.is_some_and(|s| s.save_pending) {
        lines.push(Line::from(Span::styled(format!("{} Saving...", spinner(app)), dim)));
    }

    lines.push(Line::default());
    if let Some(description) = article.description.as_deref() {
        lines.push(Line::from(strip_control_chars(description).into_owned()));
        lines.push(Line::default());
    }

    if let Some(state) = state {
        if state.summary_loading {
            lines.push(Line::from(Span::styled(
                format!("{} Summarizing...", spinner(app)),
                Style::default().fg(Color::Cyan),
            )));
        } else if state.summary_visible {
            match state.summary.as_deref() {
                Some(summary) => {
                    lines.push(Line::from(Span::styled(
                        "Summary",
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(strip_control_chars(summary).into_owned()));
                }
                None => lines.push(Line::from(Span::styled("No summary available", dim))),
            }
        }
    }

    let links = article.alternate_links();
    if !links.is_empty() {
        lines.push(Line::default());
        if app.enrichment.is_expanded(&key) {
            lines.push(Line::from(Span::styled(
                format!("Also reported by ({}):", links.len()),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for link in links {
                lines.push(Line::from(Span::styled(
                    format!("  {link}"),
                    Style::default().fg(Color::Blue),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                format!("[l] show {} matching sources", links.len()),
                dim,
            )));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_relative_time() {
        let now = at(1_800_000_000);
        assert_eq!(format_relative_time(None, now), "");
        assert_eq!(format_relative_time(Some(at(1_800_000_000 + 60)), now), "now");
        assert_eq!(format_relative_time(Some(at(1_800_000_000 - 300)), now), "5m");
        assert_eq!(format_relative_time(Some(at(1_800_000_000 - 7200)), now), "2h");
        assert_eq!(format_relative_time(Some(at(1_800_000_000 - 3 * 86400)), now), "3d");
        assert_eq!(
            format_relative_time(Some(at(1_800_000_000 - 30 * 86400)), now),
            at(1_800_000_000 - 30 * 86400).format("%b %d").to_string()
        );
    }

    #[test]
    fn test_credibility_color_bands() {
        assert_eq!(credibility_color(2.5), Color::Green);
        assert_eq!(credibility_color(1.2), Color::Yellow);
        assert_eq!(credibility_color(0.1), Color::Red);
    }
}
