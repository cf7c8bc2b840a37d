//! Artwork list screen rendering
//!
//! Renders the results of a department browse or a search as a selectable
//! list of artwork summary lines.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

use super::department_list::footer;

/// Renders the artwork list view
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header carries the department name or search description
    let title = Paragraph::new(Line::from(Span::styled(
        app.results_title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    // Keep the selection visible on small terminals
    let visible_rows = chunks[1].height.saturating_sub(2) as usize;
    let scroll_offset = if visible_rows > 0 && app.selected_artwork >= visible_rows {
        app.selected_artwork + 1 - visible_rows
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::new();
    if app.artworks.is_empty() {
        lines.push(Line::from(Span::styled(
            "No artworks to show — press Esc to go back",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, artwork) in app.artworks.iter().enumerate().skip(scroll_offset) {
        let selected = i == app.selected_artwork;
        let marker = if selected { "▸ " } else { "  " };
        let style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let image_marker = if artwork.has_image() { "🖼 " } else { "   " };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::raw(image_marker),
            Span::styled(artwork.summary(), style),
        ]));
    }

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} artworks ", app.artworks.len())),
    );
    frame.render_widget(list, chunks[1]);

    frame.render_widget(footer(app), chunks[2]);
}
