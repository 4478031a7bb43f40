use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use scholarscope_core::history::MAX_RATING;

use super::{centered_rect, truncate};
use crate::app::App;
use crate::theme::Theme;

/// Filled and empty stars for a 0..=MAX_RATING rating.
pub fn star_spans(rating: u8, theme: &Theme) -> Vec<Span<'static>> {
    (1..=MAX_RATING)
        .map(|star| {
            if star <= rating {
                Span::styled("\u{2605} ", Style::default().fg(theme.rating))
            } else {
                Span::styled("\u{2606} ", Style::default().fg(theme.border))
            }
        })
        .collect()
}

/// Render the save-to-history dialog as a centered popup.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let draft = app.controller.draft();
    let popup = centered_rect(56, 13, f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.active))
        .title(Span::styled(" Save to History ", theme.title_style()));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(inner);

    let name = app
        .report()
        .map(|r| r.profile.name.as_str())
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate(name, inner.width as usize),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        chunks[0],
    );

    let mut stars = star_spans(draft.rating, theme);
    if draft.rating == 0 {
        stars.push(Span::styled(" not rated", Style::default().fg(theme.dim)));
    }
    f.render_widget(
        Paragraph::new(Line::from(stars)).alignment(Alignment::Center),
        chunks[1],
    );

    let comment = if draft.comment.is_empty() {
        Line::from(vec![
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
            Span::styled("Note...", Style::default().fg(theme.dim)),
        ])
    } else {
        Line::from(vec![
            Span::styled(draft.comment.as_str(), Style::default().fg(theme.text)),
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
        ])
    };
    f.render_widget(
        Paragraph::new(comment).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        ),
        chunks[2],
    );

    let hints = Line::from(vec![
        Span::styled("\u{2190}/\u{2192}", theme.key_style()),
        Span::styled(": rate   ", Style::default().fg(theme.dim)),
        Span::styled("Enter", theme.key_style()),
        Span::styled(": save   ", Style::default().fg(theme.dim)),
        Span::styled("Esc", theme.key_style()),
        Span::styled(": cancel", Style::default().fg(theme.dim)),
    ]);
    f.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        chunks[3],
    );
}
