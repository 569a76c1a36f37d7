//! Question screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::ClientApp;

/// Render the in-progress question screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Some(question) = app.session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // progress + countdown
        Constraint::Length(7), // question text
        Constraint::Min(8),    // options
        Constraint::Length(1), // status line
        Constraint::Length(2), // controls
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.question_text);
    render_options(frame, chunks[2], app);
    render_status(frame, chunks[3], app);
    render_controls(frame, chunks[4], app);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let current = app.session.current_index() + 1;
    let total = app.session.total_questions();
    let seconds = app.session.countdown();

    let timer_color = match seconds {
        0..=5 => Color::Red,
        6..=20 => Color::Yellow,
        _ => Color::Green,
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Question {} of {}", current, total),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("Time left: {}s", seconds),
            Style::default().fg(timer_color),
        )),
    ];

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let chosen = app
        .session
        .current_question()
        .and_then(|q| app.session.answer_for(q.id));

    let lines: Vec<Line> = app
        .current_options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_selected = i == app.selected_option;
            let is_chosen = chosen == Some(option.as_str());

            let prefix = if is_selected { "> " } else { "  " };
            let marker = if is_chosen { " *" } else { "" };
            let label = (b'a' + (i % 26) as u8) as char;

            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else if is_chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}) ", label), style),
                Span::styled(option.clone(), style),
                Span::styled(marker, Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let (text, color) = if app.session.submit_in_flight() {
        ("Submitting...".to_string(), Color::Yellow)
    } else if let Some(error) = app.session.submit_error() {
        (
            format!("Submission failed: {} (press s to retry)", error),
            Color::Red,
        )
    } else {
        (
            format!(
                "{} of {} answered",
                app.session.answered_count(),
                app.session.total_questions()
            ),
            Color::DarkGray,
        )
    };

    let widget = Paragraph::new(text).alignment(Alignment::Center).fg(color);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let at_first = app.session.current_index() == 0;
    let at_last = app.session.is_last_question();

    let text = match (at_first, at_last) {
        (true, true) => "j/k select  ·  Enter choose  ·  s submit  ·  q quit",
        (true, false) => "j/k select  ·  Enter choose  ·  n next  ·  q quit",
        (false, true) => "j/k select  ·  Enter choose  ·  p previous  ·  s submit  ·  q quit",
        (false, false) => "j/k select  ·  Enter choose  ·  n next  ·  p previous  ·  q quit",
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
