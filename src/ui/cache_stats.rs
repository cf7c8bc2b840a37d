//! Cache diagnostics overlay
//!
//! Renders the read-only statistics snapshot taken when the overlay was
//! opened: per-category entry counts, hit/miss counters and ratios, the
//! cleanup-pass count, and the estimated memory footprint.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::cache::CategoryStats;

/// Renders the cache diagnostics overlay on top of the current view
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let overlay_area = centered_rect(62, 16, area);

    frame.render_widget(Clear, overlay_area);

    let Some(stats) = &app.stats else {
        return;
    };

    let mut lines = vec![
        Line::from(vec![Span::styled(
            format!(
                "{:<16} {:>8} {:>8} {:>8} {:>8}",
                "Category", "Entries", "Hits", "Misses", "Ratio"
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        category_line("Artworks", &stats.artworks),
        category_line("Departments", &stats.departments),
        category_line("Searches", &stats.searches),
        category_line("Department ids", &stats.department_ids),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total entries    ", Style::default().fg(Color::Green)),
            Span::raw(stats.total_entries().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Overall ratio    ", Style::default().fg(Color::Green)),
            Span::raw(format!("{:.0}%", stats.overall_hit_ratio() * 100.0)),
        ]),
        Line::from(vec![
            Span::styled("Cleanup passes   ", Style::default().fg(Color::Green)),
            Span::raw(stats.automatic_cleanups.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Est. memory      ", Style::default().fg(Color::Green)),
            Span::raw(format!("~{} KB", stats.estimated_memory_kb())),
        ]),
    ];

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "c: clear cache   p: prune expired   Esc: close",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Cache diagnostics ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

/// Formats one category row
fn category_line(name: &str, stats: &CategoryStats) -> Line<'static> {
    Line::from(Span::raw(format!(
        "{:<16} {:>8} {:>8} {:>8} {:>7.0}%",
        name,
        stats.entries,
        stats.hits,
        stats.misses,
        stats.hit_ratio() * 100.0
    )))
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
