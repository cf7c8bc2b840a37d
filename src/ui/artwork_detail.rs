//! Artwork detail screen rendering
//!
//! Renders the full record for a single artwork, scrollable with j/k. Image
//! display is out of scope for a terminal; the primary image URL is shown
//! as text instead.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::Artwork;

use super::department_list::footer;

/// Renders the artwork detail view
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let heading = app
        .current_artwork
        .as_ref()
        .map(|artwork| artwork.title.clone())
        .unwrap_or_else(|| "Artwork".to_string());
    let title = Paragraph::new(Line::from(Span::styled(
        heading,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let lines = match &app.current_artwork {
        Some(artwork) => detail_lines(artwork),
        None => vec![Line::from(Span::styled(
            "No artwork loaded",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(body, chunks[1]);

    frame.render_widget(footer(app), chunks[2]);
}

/// Builds the labeled field lines for an artwork
fn detail_lines(artwork: &Artwork) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut artist_value = artwork.artist.name.clone();
    let period = artwork.artist.life_period();
    if !period.is_empty() {
        artist_value.push_str(&format!(" ({period})"));
    }
    lines.push(field("Artist", artist_value));

    if let Some(nationality) = &artwork.artist.nationality {
        lines.push(field("Nationality", nationality.clone()));
    }
    if let Some(date) = &artwork.date {
        lines.push(field("Date", date.clone()));
    }
    if let Some(classification) = &artwork.classification {
        lines.push(field("Classification", classification.clone()));
    }
    if let Some(department) = &artwork.department {
        lines.push(field("Department", department.clone()));
    }

    lines.push(field("Object id", artwork.id.to_string()));

    lines.push(Line::from(""));
    match &artwork.image_url {
        Some(url) if artwork.has_image() => {
            lines.push(field("Image", url.clone()));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "No image available",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Fetched {}", artwork.fetched_at.format("%Y-%m-%d %H:%M UTC")),
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

/// Creates a "Label: value" line
fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<16}"),
            Style::default().fg(Color::Green),
        ),
        Span::raw(value),
    ])
}
