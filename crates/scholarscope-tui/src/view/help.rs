use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::theme::Theme;

const METRICS: [(&str, &str); 10] = [
    ("Total Papers", "Publications found on the Google Scholar profile."),
    ("Total Citations", "All-time citations; the subline is the last 5 years."),
    ("Recent Papers", "Papers published in the last 5 calendar years."),
    ("H-Index", "H papers each cited at least H times."),
    ("i10-Index", "Publications with at least 10 citations."),
    ("g-Index", "Top G papers have at least G\u{00B2} citations combined."),
    ("Avg Cits/Paper", "Total citations divided by total papers."),
    ("Network Size", "Unique co-authors across all publications."),
    ("Leadership", "% of papers as first or solo author."),
    ("One-Hit Wonder", "% of citations from the single most cited paper."),
];

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(76, 38, f.area());

    let mut lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Navigation", theme),
        key_line("1 / 2 / 3", "Home / Generate Report / History", theme),
        key_line("Tab", "Next screen", theme),
        key_line("j / \u{2193}", "Move down", theme),
        key_line("k / \u{2191}", "Move up", theme),
        Line::from(""),
        section_header("Report", theme),
        key_line("/ or i", "Edit profile URL", theme),
        key_line("Enter", "Analyse URL / apply venue filter", theme),
        key_line("Esc", "Clear venue filter", theme),
        key_line("h / l", "Previous / next page", theme),
        key_line("s", "Save report to history", theme),
        Line::from(""),
        section_header("History", theme),
        key_line("d", "Delete selected entry", theme),
        key_line("D", "Clear all history", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q / Ctrl+c", "Quit", theme),
        Line::from(""),
        section_header("Metrics", theme),
    ];
    lines.extend(
        METRICS
            .iter()
            .map(|&(name, desc)| key_line(name, desc, theme)),
    );

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), theme.key_style()),
        Span::styled(desc, Style::default().fg(theme.text)),
    ])
}
