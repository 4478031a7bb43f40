use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use scholarscope_core::HistoryEntry;

use super::{fmt_metric, truncate};
use crate::app::App;
use crate::theme::Theme;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" Compare History ({}) ", app.history_entries.len()),
            theme.title_style(),
        ));

    if app.history_entries.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No history yet",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Generate a report and press s to save it here.",
                Style::default().fg(theme.dim),
            )),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .history_entries
        .iter()
        .map(|entry| ListItem::new(entry_text(entry, theme, width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg))
        .highlight_symbol("\u{258C} ");
    let mut state = ListState::default().with_selected(Some(app.history_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

/// Saved-on date in local time, or the raw stored string if unparseable.
pub fn saved_on(entry: &HistoryEntry) -> String {
    entry
        .saved_at()
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| entry.date.clone())
}

fn entry_text<'a>(entry: &'a HistoryEntry, theme: &Theme, width: usize) -> Text<'a> {
    let mut title = vec![Span::styled(
        truncate(&entry.name, width.saturating_sub(8)),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )];
    if entry.user_rating > 0 {
        title.push(Span::styled(
            format!("  \u{2605} {}", entry.user_rating),
            Style::default()
                .fg(theme.rating)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let affiliation = entry
        .affiliations
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("No affiliation listed");

    let mut lines = vec![
        Line::from(title),
        Line::from(Span::styled(
            truncate(affiliation, width),
            Style::default().fg(theme.dim),
        )),
        Line::from(vec![
            Span::styled("Citations ", Style::default().fg(theme.dim)),
            Span::styled(fmt_metric(entry.total_c), Style::default().fg(theme.success)),
            Span::styled("   h-index ", Style::default().fg(theme.dim)),
            Span::styled(fmt_metric(entry.h_index), Style::default().fg(theme.accent)),
            Span::styled(
                format!("   Saved on {}", saved_on(entry)),
                Style::default().fg(theme.dim),
            ),
        ]),
    ];
    if !entry.user_comment.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate(&format!("\u{201C}{}\u{201D}", entry.user_comment), width),
            Style::default().fg(theme.text).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_date_is_shown_verbatim() {
        let entry = HistoryEntry {
            id: "x".into(),
            name: "X".into(),
            total_c: 0.0,
            h_index: 0.0,
            affiliations: None,
            user_rating: 0,
            user_comment: String::new(),
            date: "yesterday".into(),
        };
        assert_eq!(saved_on(&entry), "yesterday");
    }
}
