//! UI rendering

use pomo_core::format;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

use super::app::{App, Tab};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    // Header, tab bar, content, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_tabs(f, app, chunks[1]);
    match app.tab {
        Tab::Tasks => draw_tasks(f, app, chunks[2]),
        Tab::Timer => draw_timer(f, app, chunks[2]),
        Tab::Stats => draw_stats(f, app, chunks[2]),
    }
    draw_footer(f, app, chunks[3]);

    if let Some(break_minutes) = app.alarm {
        draw_alarm(f, break_minutes);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let timer = app.state.timer();
    let (state, color) = if timer.is_running() {
        ("RUNNING", Color::Green)
    } else if timer.elapsed_seconds() > 0.0 {
        ("PAUSED", Color::Yellow)
    } else {
        ("IDLE", Color::DarkGray)
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Pomo ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" - "),
        Span::styled(
            format::date_label(app.state.current_day()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(timer.remaining_display(), Style::default().bold()),
        Span::raw(" "),
        Span::styled(format!("[{}]", state), Style::default().fg(color)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(tabs, area);
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let active = app.state.timer().active_task_id();
    let tasks = app.incomplete_tasks();

    let header = Row::new(vec!["ID", "Task", "Tags", "Time"])
        .style(Style::default().fg(Color::Cyan).bold())
        .bottom_margin(1);

    let rows: Vec<Row> = if tasks.is_empty() {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from("No tasks yet, press 'a' to add one")
                .style(Style::default().fg(Color::DarkGray)),
        ])]
    } else {
        tasks
            .iter()
            .map(|t| {
                let marker = if Some(t.id()) == active { "▶ " } else { "  " };
                Row::new(vec![
                    Cell::from(format!("{}{}", marker, t.id())),
                    Cell::from(format::truncate(t.description(), 40)),
                    Cell::from(format::truncate(t.tags(), 16)),
                    Cell::from(format::task_time(t.time_spent())),
                ])
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .block(
        Block::default()
            .title(" Tasks ")
            .title_style(Style::default().fg(Color::Blue).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    let mut table_state = TableState::default();
    if !tasks.is_empty() {
        table_state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_timer(f: &mut Frame, app: &App, area: Rect) {
    let timer = app.state.timer();
    let config = timer.config();

    let block = Block::default()
        .title(" Timer ")
        .title_style(Style::default().fg(Color::Magenta).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Config
            Constraint::Length(3), // Countdown
            Constraint::Length(2), // Task
            Constraint::Length(1), // Progress
            Constraint::Min(0),
        ])
        .split(inner);

    let settings = Paragraph::new(Line::from(vec![
        Span::styled("Work: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{} min", config.work_minutes())),
        Span::raw("   "),
        Span::styled("Break: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{} min", config.break_minutes())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(settings, rows[0]);

    let countdown = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            timer.remaining_display(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(countdown, rows[1]);

    let task_line = match app.state.active_task() {
        Some(task) => Line::from(vec![
            Span::raw(task.description().to_string()),
            Span::styled(
                format!("  ({})", format::task_time(task.time_spent())),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(Span::styled(
            "No task selected",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(task_line).alignment(Alignment::Center), rows[2]);

    let ratio = (timer.elapsed_seconds() / config.work_seconds()).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(ratio)
        .label(format!("{}%", (ratio * 100.0) as u32));
    f.render_widget(gauge, rows[3]);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.state.day_stats_snapshot();

    let block = Block::default()
        .title(format!(" Statistics for {} ", snapshot.date_label()))
        .title_style(Style::default().fg(Color::Green).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("  Completed tasks:   ", Style::default().fg(Color::Cyan)),
            Span::raw(snapshot.completed_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("  Total time worked: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{} minutes", snapshot.session_minutes)),
        ]),
    ]);
    f.render_widget(summary, rows[0]);

    let header = Row::new(vec!["Task", "Tags", "Time (min)", "Completed"])
        .style(Style::default().fg(Color::Cyan).bold())
        .bottom_margin(1);

    let table_rows: Vec<Row> = snapshot
        .completed
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(format::truncate(&row.description, 40)),
                Cell::from(format::truncate(&row.tags, 16)),
                Cell::from(row.time_spent_minutes.to_string()),
                Cell::from(row.completed_at.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(11),
            Constraint::Length(10),
        ],
    )
    .header(header);
    f.render_widget(table, rows[1]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    if let Some(input) = &app.input {
        let prompt = Line::from(vec![
            Span::styled(format!(" {}: ", input.prompt.label()), Style::default().fg(Color::Yellow).bold()),
            Span::raw(input.buffer.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]);
        f.render_widget(Paragraph::new(prompt), area);
        return;
    }

    if let Some(status) = &app.status {
        let line = Line::from(Span::styled(format!(" {}", status), Style::default().fg(Color::Red)));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut keys = vec![
        ("q", "quit"),
        ("Tab", "switch"),
        ("Space", app.toggle_label()),
        ("r", "reset"),
        ("s", "settings"),
    ];
    if app.tab == Tab::Tasks {
        keys.extend([
            ("a", "add"),
            ("e", "edit"),
            ("d", "remove"),
            ("c", "complete"),
            ("Enter", "work on"),
        ]);
    }

    let spans: Vec<Span> = keys
        .into_iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" {}", key), Style::default().fg(Color::Cyan).bold()),
                Span::raw(format!(" {} ", action)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_alarm(f: &mut Frame, break_minutes: u32) {
    let area = f.area();

    let popup_width = 44;
    let popup_height = 7;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width.min(area.width), popup_height.min(area.height));

    f.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Focus interval finished!", Style::default().bold())).centered(),
        Line::from(format!("Time for a {} minute break.", break_minutes)).centered(),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];

    let popup = Paragraph::new(text).block(
        Block::default()
            .title(" Time's up ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(popup, popup_area);
}
