use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use scholarscope_core::{Phase, Report};

use super::{fmt_metric, spinner_char, truncate};
use crate::app::{App, InputMode};
use crate::theme::Theme;

const PLACEHOLDER: &str = "https://scholar.google.com/citations?user=...";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let busy = app.controller.phase() != Phase::Idle;
    let mut constraints = vec![Constraint::Length(3)];
    if busy {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    let chunks = Layout::vertical(constraints).split(area);

    render_search(f, app, chunks[0]);
    let body = if busy {
        render_progress(f, app, chunks[1]);
        chunks[2]
    } else {
        chunks[1]
    };

    match app.report() {
        Some(report) => render_report(f, app, report, body),
        None if busy => {}
        None => render_empty(f, app, body),
    }
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::Locator;

    let button = if app.controller.is_pending() {
        Span::styled(
            format!(" {} Analyzing\u{2026} ", spinner_char(app.tick)),
            Style::default().fg(theme.gauge),
        )
    } else {
        Span::styled(" [Enter] Analyze ", theme.key_style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.block_border(editing))
        .title(" Google Scholar Profile URL ")
        .title(Line::from(button).right_aligned());

    let inner_width = area.width.saturating_sub(3) as usize;
    let line = if app.locator_input.is_empty() && !editing {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(theme.dim)))
    } else {
        // Keep the tail visible while typing long URLs
        let chars: Vec<char> = app.locator_input.chars().collect();
        let start = chars.len().saturating_sub(inner_width);
        let visible: String = chars[start..].iter().collect();
        let mut spans = vec![Span::styled(visible, Style::default().fg(theme.text))];
        if editing {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().fg(theme.active),
            ));
        }
        Line::from(spans)
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let progress = app.controller.progress();
    let title = match app.controller.phase() {
        Phase::Settling => " Finalising report ",
        _ => " Crawling profile and computing metrics ",
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(title),
        )
        .gauge_style(Style::default().fg(theme.gauge).bg(theme.highlight_bg))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{progress:.0}%"));
    f.render_widget(gauge, area);
}

fn render_empty(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let lines = match app.controller.last_error() {
        Some(err) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Failed to fetch data",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(err.to_string(), Style::default().fg(theme.dim))),
            Line::from(""),
            Line::from(Span::styled(
                "Check the profile URL and that the analysis service is running.",
                Style::default().fg(theme.dim),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Enter a profile URL above to generate a report.",
                Style::default().fg(theme.dim),
            )),
        ],
    };
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_report(f: &mut Frame, app: &App, report: &Report, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(6),
    ])
    .split(area);

    render_profile(f, app, report, chunks[0]);
    render_hero_row(f, &app.theme, report, chunks[1]);
    render_detail_row(f, &app.theme, report, chunks[2]);
    super::publications::render(f, app, report, chunks[3]);
}

fn render_profile(f: &mut Frame, app: &App, report: &Report, area: Rect) {
    let theme = &app.theme;
    let profile = &report.profile;

    let save = if app.controller.draft().saved {
        Span::styled(
            "\u{2713} Saved ",
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[s] Save ", theme.key_style())
    };
    let save_width = save.content.chars().count() as u16;
    let cols = Layout::horizontal([Constraint::Min(0), Constraint::Length(save_width)]).split(area);

    let width = cols[0].width as usize;
    let affiliation = profile
        .affiliations
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("No affiliation listed");
    let lines = vec![
        Line::from(Span::styled(
            truncate(&profile.name, width),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(affiliation, width),
            Style::default().fg(theme.dim),
        )),
        Line::from(vec![
            Span::styled(
                format!("Academic Age: {} Years", profile.academic_age),
                Style::default().fg(theme.warning),
            ),
            Span::styled(
                format!("   ID: {}", profile.id),
                Style::default().fg(theme.dim),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        ),
        cols[0],
    );
    f.render_widget(Paragraph::new(Line::from(save)), cols[1]);
}

fn render_hero_row(f: &mut Frame, theme: &Theme, report: &Report, area: Rect) {
    let m = &report.metrics;
    let cols = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    metric_card(
        f,
        theme,
        cols[0],
        "Total Papers",
        fmt_metric(m.total_p),
        None,
        theme.accent,
    );
    metric_card(
        f,
        theme,
        cols[1],
        "Total Citations",
        fmt_metric(m.total_c),
        Some(format!("+{} in last 5y", fmt_metric(m.recent_c))),
        theme.success,
    );
    metric_card(
        f,
        theme,
        cols[2],
        "Recent Papers",
        fmt_metric(m.recent_p),
        Some("last 5 years".to_string()),
        theme.warning,
    );
}

fn render_detail_row(f: &mut Frame, theme: &Theme, report: &Report, area: Rect) {
    let m = &report.metrics;
    let cards: [(&str, String, Option<&str>); 7] = [
        ("H-Index", fmt_metric(m.h_index), None),
        ("i10-Index", fmt_metric(m.i10_index), None),
        ("g-Index", fmt_metric(m.g_index), None),
        ("Avg Cits/Paper", fmt_metric(m.cpp), None),
        ("Network Size", fmt_metric(m.network_size), Some("Co-authors")),
        (
            "Leadership",
            format!("{}%", fmt_metric(m.leadership_score)),
            Some("1st/Solo Auth"),
        ),
        (
            "One-Hit Wonder",
            format!("{}%", fmt_metric(m.one_hit)),
            Some("Top paper dep."),
        ),
    ];
    let cols = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(area);
    for ((label, value, sub), col) in cards.into_iter().zip(cols.iter()) {
        metric_card(
            f,
            theme,
            *col,
            label,
            value,
            sub.map(String::from),
            theme.text,
        );
    }
}

fn metric_card(
    f: &mut Frame,
    theme: &Theme,
    area: Rect,
    label: &str,
    value: String,
    sub: Option<String>,
    color: Color,
) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines = vec![Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    if let Some(sub) = sub {
        lines.push(Line::from(Span::styled(
            truncate(&sub, width),
            Style::default().fg(theme.dim),
        )));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            truncate(label, width),
            Style::default().fg(theme.dim),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
