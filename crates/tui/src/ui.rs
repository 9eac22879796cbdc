//! Widget rendering for the single screen.
//!
//! Everything here derives from the session state on each draw; no widget
//! keeps state of its own.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use fdq_core::projection::{self, CardView, ChartPoint, TableView};
use fdq_core::session::QueryOutcome;
use fdq_core::{ApiEnvelope, SessionState};

use crate::app::{App, Focus, FILTER_FIELD_LABELS, QUICK_QUERIES};

const ACCENT: Color = Color::Cyan;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_search(frame, chunks[1], app);
    draw_hints(frame, chunks[2]);
    draw_body(frame, chunks[3], app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            "FHIR Data Query",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  ·  "),
        Span::styled(&app.backend_label, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_search(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let border = if app.focus == Focus::Search {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    let mut text = app.input.clone();
    if app.focus == Focus::Search {
        text.push('_');
    }
    let placeholder = app.input.is_empty() && app.focus != Focus::Search;
    let content = if placeholder {
        Span::styled(
            "Ask anything about patient records, observations, or conditions...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(text)
    };
    frame.render_widget(
        Paragraph::new(Line::from(content)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Query"),
        ),
        area,
    );
}

fn draw_hints(frame: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![Span::styled(
        " Enter search · Tab filters · Ctrl+L clear filters · Esc quit · Quick:",
        Style::default().fg(Color::DarkGray),
    )];
    for (idx, (label, _)) in QUICK_QUERIES.iter().enumerate() {
        spans.push(Span::styled(
            format!(" F{} {label}", idx + 1),
            Style::default().fg(ACCENT),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, app: &App) {
    match app.session.state() {
        SessionState::Idle => draw_empty_state(frame, area),
        SessionState::Loading { query, .. } => {
            let text = format!("Searching… {query}");
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        SessionState::Errored { message } => draw_error(frame, area, app, message),
        SessionState::Loaded { outcome, .. } => match outcome {
            QueryOutcome::Simulated(_) => draw_simulated(frame, area, app),
            QueryOutcome::Api(envelope) => draw_envelope(frame, area, envelope),
        },
    }
}

fn draw_empty_state(frame: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("Enter a query to get started"),
        Line::styled(
            "Ask questions about patients, conditions, and observations",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_error(frame: &mut Frame<'_>, area: Rect, app: &App, message: &str) {
    let mut lines: Vec<Line<'_>> = message.lines().map(Line::raw).collect();
    if !message.contains("CORS") {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Make sure your backend API is running at {}", app.backend_label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        ),
        area,
    );
}

fn draw_simulated(frame: &mut Frame<'_>, area: Rect, app: &App) {
    // visible() is always Some for a loaded simulated outcome.
    let Some(visible) = app.session.visible() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new("No data available")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Results")),
            columns[0],
        );
    } else {
        render_table(frame, columns[0], &projection::table(&visible));
    }

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(columns[1]);

    draw_filter_form(frame, side[0], app);
    render_chart(frame, side[1], &projection::chart(&visible));
}

fn draw_envelope(frame: &mut Frame<'_>, area: Rect, envelope: &ApiEnvelope) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let answer = vec![
        Line::raw(envelope.natural_language_response.as_str()),
        Line::styled(
            format!(
                "{:.2}s · {} records",
                envelope.execution_time,
                envelope.data.count.unwrap_or(0)
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(
        Paragraph::new(answer).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title("Answer"),
        ),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    match &envelope.data.table {
        Some(table) if !table.rows.is_empty() => {
            render_table(frame, columns[0], &projection::table_from_api(table));
        }
        _ => {
            frame.render_widget(
                Paragraph::new("No data available")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title("Results")),
                columns[0],
            );
        }
    }

    let cards = envelope
        .data
        .cards
        .as_deref()
        .map(projection::cards_from_api)
        .unwrap_or_default();
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if cards.is_empty() {
            [Constraint::Percentage(100), Constraint::Percentage(0)]
        } else {
            [Constraint::Percentage(55), Constraint::Percentage(45)]
        })
        .split(columns[1]);

    let points = envelope
        .data
        .chart
        .as_ref()
        .map(projection::chart_from_api)
        .unwrap_or_default();
    render_chart(frame, side[0], &points);

    if !cards.is_empty() {
        render_cards(frame, side[1], &cards);
    }
}

fn draw_filter_form(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let focused = app.focus == Focus::Filters;
    let lines: Vec<Line<'_>> = FILTER_FIELD_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let marker = if focused && idx == app.active_filter {
                "▸ "
            } else {
                "  "
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
                Span::raw(app.filter_fields[idx].as_str()),
            ])
        })
        .collect();

    let border = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Filters"),
        ),
        area,
    );
}

fn render_table(frame: &mut Frame<'_>, area: Rect, view: &TableView) {
    let header = Row::new(
        view.columns
            .iter()
            .map(|col| Cell::from(col.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD).fg(ACCENT));

    let rows: Vec<Row<'_>> = view
        .rows
        .iter()
        .map(|row| Row::new(row.iter().cloned().map(Cell::from).collect::<Vec<_>>()))
        .collect();

    let widths: Vec<Constraint> = view
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let cells = view.rows.iter().map(|row| row[idx].len());
            let widest = cells.max().unwrap_or(0).max(col.len()).min(28);
            Constraint::Length(widest as u16)
        })
        .collect();

    frame.render_widget(
        Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Results ({} records)", view.total)),
        ),
        area,
    );
}

fn render_chart(frame: &mut Frame<'_>, area: Rect, points: &[ChartPoint]) {
    let data: Vec<(&str, u64)> = points
        .iter()
        .map(|point| (point.label.as_str(), point.value.round().max(0.0) as u64))
        .collect();

    let bar_width = if data.is_empty() {
        7
    } else {
        let usable = area.width.saturating_sub(2);
        (usable / data.len() as u16).saturating_sub(1).clamp(3, 9)
    };

    frame.render_widget(
        BarChart::default()
            .data(&data)
            .bar_width(bar_width)
            .bar_style(Style::default().fg(ACCENT))
            .value_style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title("Distribution")),
        area,
    );
}

fn render_cards(frame: &mut Frame<'_>, area: Rect, cards: &[CardView]) {
    let mut lines: Vec<Line<'_>> = Vec::new();
    for card in cards {
        let mut title = vec![Span::styled(
            card.label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(badge) = &card.badge {
            title.push(Span::styled(
                format!("  [{badge}]"),
                Style::default().fg(ACCENT),
            ));
        }
        lines.push(Line::from(title));
        for (key, value) in &card.lines {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key}: "), Style::default().fg(Color::DarkGray)),
                Span::raw(value.clone()),
            ]));
        }
        if let Some(text) = &card.text {
            lines.push(Line::raw(format!("  {text}")));
        }
        lines.push(Line::raw(""));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default().borders(Borders::ALL).title("Details"),
        ),
        area,
    );
}
