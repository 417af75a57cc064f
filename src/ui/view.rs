use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Mode, ViewState};

pub fn draw(f: &mut Frame, app: &mut App, api_url: &str) {
    match app.state.clone() {
        ViewState::Loading => draw_loading(f),
        ViewState::Error(reason) => draw_error(f, api_url, &reason),
        ViewState::Ready => draw_ready(f, app, api_url),
    }
}

fn draw_loading(f: &mut Frame) {
    let loading = Paragraph::new("Loading todos...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("todo-tui"));
    f.render_widget(loading, f.size());
}

fn draw_error(f: &mut Frame, api_url: &str, reason: &str) {
    let text = format!("Failed to load todos :(\nIs the todo server running at {api_url}?\n\n{reason}\n\nPress q to quit.");
    let error = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title("todo-tui"));
    f.render_widget(error, f.size());
}

fn draw_ready(f: &mut Frame, app: &mut App, api_url: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header = Paragraph::new("Enter/Space: toggle, n: new, e: edit, d: delete, r: refresh, q: quit")
        .block(Block::default().borders(Borders::ALL).title("todo-tui"));
    f.render_widget(header, chunks[0]);

    let done = Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
    let list_items: Vec<ListItem> = app.items.iter().map(|t| {
        let mark = if t.completed { "[x]" } else { "[ ]" };
        let item = ListItem::new(format!("{mark} {}", t.title));
        if t.completed { item.style(done) } else { item }
    }).collect();
    // Keep list_state selection in sync with current index
    if app.items.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
    let list = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(format!("items [{}]", app.items.len())))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, chunks[1], &mut app.list_state);

    let (title, text) = match &app.mode {
        Mode::Create => {
            let mut text = format!("Title: {}_  |  Enter to save, Esc to cancel", app.draft);
            if let Some(status) = &app.status { text.push_str(&format!("  |  {status}")); }
            ("new", text)
        }
        _ => ("info", info_line(app, api_url)),
    };
    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(footer, chunks[2]);

    if let Mode::Edit(todo) = &app.mode {
        let area = centered_rect(60, 7, f.size());
        let mut lines = format!("Title: {}_\n\nEnter to save, Esc to cancel", app.draft);
        if let Some(status) = &app.status { lines.push_str(&format!("\n{status}")); }
        let modal = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(format!("Edit todo #{}", todo.id)));
        f.render_widget(Clear, area);
        f.render_widget(modal, area);
    }
}

fn info_line(app: &App, api_url: &str) -> String {
    let synced = app.synced_at
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let mut line = format!("API={api_url}  |  synced {synced}");
    if app.in_flight > 0 { line.push_str(&format!("  |  syncing ({})", app.in_flight)); }
    if let (Mode::View, Some(status)) = (&app.mode, &app.status) { line.push_str(&format!("  |  {status}")); }
    line
}

/// A `percent_x` wide, `height` tall rectangle centred in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
