use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;

const FEATURES: [(&str, &str); 3] = [
    (
        "Generate Report",
        "Paste a Google Scholar profile URL and get citation, productivity and authorship metrics.",
    ),
    (
        "Venue Insight",
        "Publications ranked by venue tier, filterable by the venues a scholar publishes in most.",
    ),
    (
        "History",
        "Save reports with a star rating and a note, then compare candidates side by side later.",
    ),
];

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(5),
        Constraint::Length(2),
        Constraint::Length(6),
        Constraint::Min(0),
    ])
    .split(area);

    let hero = vec![
        Line::from(Span::styled(
            "ScholarScope",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Bibliometric reports for academic hiring and review",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(theme.dim)),
            Span::styled("Enter", theme.key_style()),
            Span::styled(" to analyse a profile", Style::default().fg(theme.dim)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(hero).alignment(Alignment::Center),
        chunks[1],
    );

    let cards = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(chunks[3]);
    for ((title, body), card) in FEATURES.iter().zip(cards.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.block_border(false))
            .title(Span::styled(format!(" {title} "), theme.title_style()));
        f.render_widget(
            Paragraph::new(*body)
                .style(Style::default().fg(theme.dim))
                .wrap(Wrap { trim: true })
                .block(block),
            *card,
        );
    }

    if let Some(report) = app.report() {
        let line = Line::from(vec![
            Span::styled("Last report: ", Style::default().fg(theme.dim)),
            Span::styled(report.profile.name.as_str(), theme.title_style()),
            Span::styled("  (press 2)", Style::default().fg(theme.dim)),
        ]);
        f.render_widget(
            Paragraph::new(line).alignment(Alignment::Center),
            chunks[4],
        );
    }
}
