use crate::app::{App, AppMode, Page};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use studyflow_core::{format_time, SessionKind, StorageBackend};

pub fn draw<B: StorageBackend>(f: &mut Frame, app: &App<B>) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_nav(f, chunks[0], app);
    match app.page {
        Page::Dashboard => draw_dashboard(f, chunks[1], app),
        Page::Analytics => draw_analytics(f, chunks[1], app),
        Page::Settings => draw_settings(f, chunks[1], app),
    }
    draw_status_bar(f, chunks[2], app);

    if app.mode == AppMode::AddingTask {
        draw_input_overlay(f, app);
    }
    if let Some(banner) = &app.banner {
        draw_banner(f, &banner.text, app);
    }
}

fn draw_nav<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let mut spans = vec![
        Span::styled(
            "STUDYFLOW",
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
    ];
    for (i, page) in Page::ALL.iter().enumerate() {
        let style = if *page == app.page {
            Style::default()
                .fg(theme.selection)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.gray)
        };
        spans.push(Span::styled(format!("[{}] {}", i + 1, page.title()), style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(theme.black)),
            ),
        area,
    );
}

fn draw_dashboard<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(1),
        ])
        .split(area);

    draw_timer_card(f, chunks[0], app);
    draw_stats_panel(f, chunks[1], app);
    draw_tasks(f, chunks[2], app);
}

fn draw_timer_card<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let engine = &app.engine;
    let title = match engine.session() {
        SessionKind::Work => "Work Session",
        SessionKind::Break => "Break Time",
    };
    let state_icon = if engine.is_running() {
        &icons.play
    } else {
        &icons.pause
    };
    let block = Block::default()
        .title(Span::styled(
            format!(" {} {} ", icons.timer, title),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner_area);
    f.render_widget(
        Paragraph::new(format!("{} {}", state_icon, format_time(engine.time_left())))
            .style(
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        v_chunks[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.blue).bg(theme.black))
            .percent((engine.progress() * 100.0) as u16),
        v_chunks[1],
    );
}

fn draw_stats_panel<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Statistics ", icons.stats),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let boxes = [
        (app.stats.sessions_completed.to_string(), "Sessions"),
        (format!("{:.1}h", app.stats.total_hours), "Total Hours"),
        (format!("{}m", app.stats.longest_session), "Longest Session"),
    ];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner_area);
    for (i, (value, label)) in boxes.iter().enumerate() {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    value.clone(),
                    Style::default()
                        .fg(theme.foreground)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(*label, Style::default().fg(theme.gray))),
            ])
            .alignment(Alignment::Center),
            chunks[i],
        );
    }
}

fn draw_tasks<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Tasks ", icons.task_list),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    if app.tasks.is_empty() {
        f.render_widget(
            Paragraph::new("No tasks. Press 'a' to add one.")
                .style(Style::default().fg(theme.gray))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }
    let constraints: Vec<Constraint> = app
        .tasks
        .tasks()
        .iter()
        .map(|_| Constraint::Length(1))
        .collect();
    let task_chunks = Layout::default().constraints(constraints).split(inner_area);
    for (i, task) in app.tasks.tasks().iter().enumerate() {
        if let Some(item_area) = task_chunks.get(i) {
            let mut left = vec![if i == app.selected_task {
                Span::styled(icons.select.clone(), Style::default().fg(theme.selection))
            } else {
                Span::raw(" ")
            }];
            left.push(Span::raw(format!(
                " {} ",
                if task.completed {
                    &icons.done
                } else {
                    &icons.pending
                }
            )));
            left.push(Span::styled(
                task.task.clone(),
                if task.completed {
                    Style::default()
                        .fg(theme.gray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(theme.foreground)
                },
            ));
            let right = Span::styled(
                format!(" {}  {} ", task.subject, task.deadline),
                Style::default().fg(theme.cyan),
            );
            if i == app.selected_task {
                f.render_widget(
                    Block::default().style(Style::default().bg(theme.black)),
                    *item_area,
                );
            }
            f.render_widget(Paragraph::new(Line::from(left)), *item_area);
            f.render_widget(
                Paragraph::new(Line::from(right)).alignment(Alignment::Right),
                *item_area,
            );
        }
    }
}

fn draw_analytics<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    // Overall progress
    let block = Block::default()
        .title(Span::styled(
            " Overall Progress ",
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);
    let boxes = [
        (
            format!("{}/{}", app.tasks.completed_count(), app.tasks.len()),
            "Tasks Completed",
        ),
        (app.stats.sessions_completed.to_string(), "Study Sessions"),
        (format!("{:.1}h", app.stats.total_hours), "Hours Studied"),
    ];
    let box_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner_area);
    for (i, (value, label)) in boxes.iter().enumerate() {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    value.clone(),
                    Style::default()
                        .fg(theme.foreground)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(*label, Style::default().fg(theme.gray))),
            ])
            .alignment(Alignment::Center),
            box_chunks[i],
        );
    }

    draw_subject_breakdown(f, chunks[1], app);
}

fn draw_subject_breakdown<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(
            " Subject Breakdown ",
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let breakdown = app.tasks.subject_breakdown();
    if breakdown.is_empty() {
        f.render_widget(
            Paragraph::new("No tasks yet.")
                .style(Style::default().fg(theme.gray))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }
    let total = app.tasks.len();
    let constraints: Vec<Constraint> = breakdown.iter().map(|_| Constraint::Length(1)).collect();
    let rows = Layout::default().constraints(constraints).split(inner_area);
    for (i, (subject, count)) in breakdown.iter().enumerate() {
        if let Some(row) = rows.get(i) {
            let filled = (count * 10 / total).max(1);
            let bar = format!(
                "{}{}",
                icons.progress_filled.repeat(filled),
                icons.progress_empty.repeat(10 - filled.min(10))
            );
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!(" {:<12}", subject.as_str()),
                        Style::default().fg(theme.foreground),
                    ),
                    Span::styled(bar, Style::default().fg(theme.blue)),
                    Span::styled(
                        format!(" {} tasks", count),
                        Style::default().fg(theme.gray),
                    ),
                ])),
                *row,
            );
        }
    }
}

fn draw_settings<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let notifications = if app.config.notifications { "on" } else { "off" };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(format!("Desktop notifications: {}", notifications)),
            Line::from("Theme and icons load from studyflow.toml in the config directory."),
            Line::from("Durations are fixed: 25 minute work sessions, 5 minute breaks."),
        ])
        .style(Style::default().fg(theme.foreground))
        .block(
            Block::default()
                .title(Span::styled(
                    " Preferences ",
                    Style::default().fg(theme.gray),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.green)),
        ),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(vec![
            Line::from("StudyFlow: a study timer and task tracker for the terminal."),
            Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
        ])
        .style(Style::default().fg(theme.gray))
        .block(
            Block::default()
                .title(Span::styled(" About ", Style::default().fg(theme.gray)))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.green)),
        ),
        chunks[1],
    );
}

fn draw_status_bar<B: StorageBackend>(f: &mut Frame, area: Rect, app: &App<B>) {
    let theme = &app.config.theme;
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("NORMAL", theme.green),
        AppMode::AddingTask => ("INSERT", theme.yellow),
    };
    let help = match (app.mode, app.page) {
        (AppMode::AddingTask, _) => "enter:confirm │ esc:cancel",
        (_, Page::Dashboard) => {
            "space:timer │ r:reset │ a:add │ s:subject │ x:done │ d:del │ tab:page │ q:quit"
        }
        _ => "tab:page │ 1-3:jump │ q:quit",
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", mode_text),
                Style::default()
                    .bg(mode_color)
                    .fg(theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(help),
        ]))
        .block(Block::default().style(Style::default().bg(theme.black).fg(theme.gray))),
        area,
    );
}

fn draw_input_overlay<B: StorageBackend>(f: &mut Frame, app: &App<B>) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" New {} Task ", app.selected_subject))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.theme.yellow))
        .border_type(BorderType::Double)
        .style(Style::default().bg(app.config.theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(app.config.theme.foreground)),
            Span::styled(
                app.input_buffer.as_str(),
                Style::default().fg(app.config.theme.foreground),
            ),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(app.config.theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn draw_banner<B: StorageBackend>(f: &mut Frame, text: &str, app: &App<B>) {
    let area = centered_rect(40, 12, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(app.config.theme.selection)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(app.config.theme.yellow))
                    .style(Style::default().bg(app.config.theme.background)),
            ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
