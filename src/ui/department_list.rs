//! Department list screen rendering
//!
//! Renders the main view showing all museum departments, with the footer
//! carrying keybinding hints, the active search input, or a status message.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SearchInput, SearchKind};

/// Renders the department list view
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let title = Paragraph::new(Line::from(Span::styled(
        "Met Collection Browser — Departments",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    // Department rows with the selected row highlighted
    let mut lines: Vec<Line> = Vec::with_capacity(app.departments.len());
    if app.departments.is_empty() {
        lines.push(Line::from(Span::styled(
            "No departments loaded — press r to retry",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, department) in app.departments.iter().enumerate() {
        let selected = i == app.selected_department;
        let marker = if selected { "▸ " } else { "  " };
        let style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(format!("{:>3}  ", department.id), Style::default().fg(Color::DarkGray)),
            Span::styled(department.name.clone(), style),
        ]));
    }

    let mut list_title = format!(" {} departments ", app.departments.len());
    if let Some(refreshed) = app.last_refresh {
        list_title.push_str(&format!("— updated {} ", refreshed.format("%H:%M")));
    }
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(list_title));
    frame.render_widget(list, chunks[1]);

    // Footer: search input takes precedence, then status, then hints
    frame.render_widget(footer(app), chunks[2]);
}

/// Builds the footer paragraph shared by the list views
pub(super) fn footer(app: &App) -> Paragraph<'static> {
    let line = if let Some(input) = &app.input {
        input_prompt(input)
    } else if let Some(message) = &app.status_message {
        Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            hint("↑/↓", "navigate"),
            hint("Enter", "open"),
            hint("a", "artist"),
            hint("n", "nationality"),
            hint("s", "cache stats"),
            hint("r", "reload"),
            hint("?", "help"),
            hint("q", "quit"),
        ])
    };

    Paragraph::new(line).block(Block::default().borders(Borders::ALL))
}

/// Renders the live search prompt with a cursor marker
fn input_prompt(input: &SearchInput) -> Line<'static> {
    let label = match input.kind {
        SearchKind::Artist => "Artist search: ",
        SearchKind::Nationality => "Nationality search: ",
    };
    Line::from(vec![
        Span::styled(label.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw(input.buffer.clone()),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ])
}

/// Creates a single "key description" hint span pair
fn hint(key: &str, description: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{description} "),
        Style::default().fg(Color::DarkGray),
    )
}
