pub mod confirm;
pub mod help;
pub mod history;
pub mod home;
pub mod publications;
pub mod report;
pub mod save_modal;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode, Screen};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a metric scalar: whole numbers get thousands separators, others
/// keep up to two decimals.
pub fn fmt_metric(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.fract() == 0.0 && value >= 0.0 {
        return group_thousands(value as u64);
    }
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Create a centered rectangle of the given width (columns) and height (rows),
/// shrunk to fit inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Draw the whole frame: header tabs, active screen, footer, then overlays.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen {
        Screen::Home => home::render(f, app, chunks[1]),
        Screen::Report => report::render(f, app, chunks[1]),
        Screen::History => history::render(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);

    if app.controller.draft().modal_open {
        save_modal::render(f, app);
    }
    if app.confirm_clear {
        confirm::render(f, &app.theme);
    }
    if app.show_help {
        help::render(f, &app.theme);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " ScholarScope ",
        Style::default()
            .fg(theme.header_fg)
            .bg(theme.header_bg)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, screen) in Screen::ALL.iter().enumerate() {
        let label = format!("  {} {}  ", i + 1, screen.title());
        let style = if *screen == app.screen {
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(label, style));
    }
    if app.controller.is_pending() {
        spans.push(Span::styled(
            format!(" {} analysing", spinner_char(app.tick)),
            Style::default().fg(theme.gauge),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    if let Some(status) = &app.status {
        let color = if status.is_error {
            theme.error
        } else {
            theme.success
        };
        let line = Line::from(Span::styled(
            format!(" {}", truncate(&status.text, area.width.saturating_sub(1) as usize)),
            Style::default().fg(color),
        ));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let hints: &[(&str, &str)] = match (&app.input_mode, app.screen) {
        (InputMode::Locator, _) => &[("Enter", "analyse"), ("Esc", "cancel")],
        (InputMode::Comment, _) => &[
            ("\u{2190}/\u{2192}", "rating"),
            ("Enter", "save"),
            ("Esc", "cancel"),
        ],
        (InputMode::Confirm, _) => &[("y", "confirm"), ("n", "cancel")],
        (InputMode::Normal, Screen::Home) => {
            &[("Enter", "new report"), ("Tab", "switch"), ("?", "help"), ("q", "quit")]
        }
        (InputMode::Normal, Screen::Report) => &[
            ("/", "search"),
            ("j/k", "venue"),
            ("Enter", "filter"),
            ("h/l", "page"),
            ("s", "save"),
            ("?", "help"),
            ("q", "quit"),
        ],
        (InputMode::Normal, Screen::History) => &[
            ("j/k", "move"),
            ("d", "delete"),
            ("D", "clear all"),
            ("?", "help"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key}"), theme.key_style()));
        spans.push(Span::styled(
            format!(":{label} "),
            Style::default().fg(theme.footer_fg),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.footer_bg)),
        area,
    );
}
