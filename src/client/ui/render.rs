//! Top-level renderer: one screen per session phase.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::client::state::ClientApp;
use crate::session::SessionPhase;

use super::{quiz, results};

/// Render the UI for the session's current phase.
pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.session.phase() {
        SessionPhase::Loading => render_loading(frame, area, app),
        SessionPhase::LoadFailed { reason } => render_load_failed(frame, area, reason),
        SessionPhase::InProgress => quiz::render(frame, area, app),
        SessionPhase::Submitted { .. } => results::render(frame, area, app),
    }
}

fn render_loading(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ PLAY",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Loading questions for quiz {}...", app.session.quiz_id()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn render_load_failed(frame: &mut Frame, area: Rect, reason: &str) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(9),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ PLAY",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            reason,
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Press [Q] to exit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
