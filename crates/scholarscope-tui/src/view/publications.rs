use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table};

use scholarscope_core::dataset::Page;
use scholarscope_core::{Paper, Report};

use super::{group_thousands, truncate};
use crate::app::App;
use crate::theme::Theme;

const SIDEBAR_WIDTH: u16 = 32;

pub fn render(f: &mut Frame, app: &App, report: &Report, area: Rect) {
    let cols =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).split(area);
    render_venues(f, app, cols[0]);

    let page = app.dataset.page(&report.papers);
    let rows = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(cols[1]);
    render_table(f, app, &page, rows[0]);
    render_pagination(f, &app.theme, &page, rows[1]);
}

fn render_venues(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.dataset.filter_venue();
    let label_width = (area.width as usize).saturating_sub(10);

    let items: Vec<ListItem> = app
        .venue_options()
        .into_iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = option.venue.as_deref() == active;
            let marker = if selected { "\u{25CF} " } else { "  " };
            let mut style = if selected {
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            if i == app.venue_cursor {
                style = style.bg(theme.highlight_bg);
            }
            let label = truncate(&option.label, label_width);
            let pad = label_width.saturating_sub(label.chars().count());
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{label}{} ", " ".repeat(pad)), style),
                Span::styled(
                    format!("{:>4}", option.count),
                    Style::default().fg(theme.dim),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(
                " REFINE BY VENUE ",
                Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}

fn render_table(f: &mut Frame, app: &App, page: &Page<'_>, area: Rect) {
    let theme = &app.theme;
    let title = match app.dataset.filter_venue() {
        Some(venue) => format!(" Publications Analysis \u{00B7} {venue} "),
        None => " Publications Analysis ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(title, theme.title_style()));

    if page.items.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No publications found for this profile.",
                Style::default().fg(theme.dim),
            ))
            .block(block),
            area,
        );
        return;
    }

    let title_width = (area.width as usize).saturating_sub(2 + 10 + 8 + 11 + 3);
    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|paper| paper_row(paper, theme, title_width))
        .collect();

    let header = Row::new(vec![
        Cell::from("Title"),
        Cell::from("Rank"),
        Cell::from("Pos"),
        Cell::from(Line::from("Citations").right_aligned()),
    ])
    .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, area);
}

fn paper_row<'a>(paper: &'a Paper, theme: &Theme, title_width: usize) -> Row<'a> {
    let year = paper.year.map(|y| y.to_string()).unwrap_or_default();
    let subtitle = format!("{year} \u{2022} {}", paper.venue_label());
    let title_cell = Text::from(vec![
        Line::from(Span::styled(
            truncate(&paper.title, title_width),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(&subtitle, title_width),
            Style::default().fg(theme.dim),
        )),
    ]);

    let rank = match paper.rank.as_deref().filter(|r| !r.is_empty()) {
        Some(r) => Span::styled(
            r,
            Style::default()
                .fg(theme.rank_color(Some(r)))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("-", Style::default().fg(theme.dim)),
    };

    let pos = paper.author_pos.as_deref().unwrap_or("Middle");
    let pos_style = if pos == "1st" {
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };

    Row::new(vec![
        Cell::from(title_cell),
        Cell::from(rank),
        Cell::from(Span::styled(pos, pos_style)),
        Cell::from(
            Line::from(Span::styled(
                group_thousands(paper.citations),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
    ])
    .height(3)
}

fn render_pagination(f: &mut Frame, theme: &Theme, page: &Page<'_>, area: Rect) {
    if !page.shows_controls() {
        return;
    }
    let enabled = |on: bool| {
        if on {
            Style::default().fg(theme.text)
        } else {
            Style::default().fg(theme.border)
        }
    };
    let cols = Layout::horizontal([Constraint::Min(0), Constraint::Length(34)]).split(area);

    let summary = Line::from(vec![
        Span::styled(" Showing ", Style::default().fg(theme.dim)),
        Span::styled(page.start.to_string(), theme.title_style()),
        Span::styled(" to ", Style::default().fg(theme.dim)),
        Span::styled(page.end.to_string(), theme.title_style()),
        Span::styled(format!(" of {} results", page.total), Style::default().fg(theme.dim)),
    ]);
    f.render_widget(Paragraph::new(summary), cols[0]);

    let controls = Line::from(vec![
        Span::styled("\u{25C0} Previous", enabled(page.has_prev())),
        Span::styled(
            format!("  {}/{}  ", page.page, page.page_count),
            Style::default().fg(theme.dim),
        ),
        Span::styled("Next \u{25B6}", enabled(page.has_next())),
    ])
    .right_aligned();
    f.render_widget(Paragraph::new(controls), cols[1]);
}
