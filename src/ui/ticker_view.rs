//! Ticker screen rendering
//!
//! Renders the single screen: asset label, price, timestamp, the loading
//! indicator, pending notifications and a key hint footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState, DataSource, NotificationLevel};

/// Braille spinner frames for the loading indicator
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Most notifications shown at once
const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

/// Renders the ticker screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let notification_height = app.notifications.len().min(MAX_VISIBLE_NOTIFICATIONS) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(notification_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, chunks[0]);
    render_ticker(frame, app, chunks[1]);
    render_notifications(frame, app, chunks[2]);
    render_footer(frame, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Crypto Monitor",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(title, area);
}

/// Color of the asset label for the current data source
fn source_color(source: Option<DataSource>) -> Color {
    match source {
        Some(DataSource::Live) => Color::Green,
        Some(DataSource::Cached) => Color::Yellow,
        None => Color::Gray,
    }
}

fn render_ticker(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if let Some(label) = &app.asset_label {
        lines.push(Line::from(Span::styled(
            label.clone(),
            Style::default()
                .fg(source_color(app.source))
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    if let Some(price) = &app.price {
        lines.push(Line::from(Span::styled(
            price.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(timestamp) = &app.timestamp {
        lines.push(Line::from(Span::styled(
            timestamp.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if lines.is_empty() && app.state == AppState::Idle {
        lines.push(Line::from(Span::styled(
            "Press r to fetch the current price",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if app.state == AppState::Loading {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} Fetching ticker...", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::Cyan),
        )));
    }

    // Vertically center the content inside the block
    let inner_height = area.height.saturating_sub(2);
    let padding = inner_height.saturating_sub(lines.len() as u16) / 2;
    let mut padded = vec![Line::from(""); padding as usize];
    padded.extend(lines);

    let paragraph = Paragraph::new(padded)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }

    let skip = app
        .notifications
        .len()
        .saturating_sub(MAX_VISIBLE_NOTIFICATIONS);
    let lines: Vec<Line> = app
        .notifications
        .iter()
        .skip(skip)
        .map(|n| {
            let color = match n.level {
                NotificationLevel::Error => Color::Red,
                NotificationLevel::Info => Color::Cyan,
            };
            Line::from(Span::styled(n.message.clone(), Style::default().fg(color)))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("r", key),
        Span::raw(" refresh  "),
        Span::styled("?", key),
        Span::raw(" help  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
