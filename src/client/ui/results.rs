//! Results screen with the scored review.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::client::state::ClientApp;
use crate::session::SessionPhase;

const PROMPT_PREVIEW_LENGTH: usize = 45;

/// Render the post-submission results screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let SessionPhase::Submitted { score } = app.session.phase() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(6), // score summary
        Constraint::Min(8),    // review
        Constraint::Length(2), // controls
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[0], *score, app.session.total_questions());
    render_review(frame, chunks[1], app);
    render_controls(frame, chunks[2]);
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: u32, total: usize) {
    let percentage = if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let grade_color = match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "YOUR SCORE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", score, total, percentage),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, area);
}

fn render_review(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let review = app.session.review();

    let mut lines: Vec<Line> = Vec::with_capacity(review.len() * 2);
    for (index, entry) in review.iter().enumerate() {
        let (symbol, color) = if entry.correct {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                truncate_prompt(&entry.prompt),
                Style::default().fg(Color::Gray),
            ),
        ]));

        let detail = match (&entry.chosen, entry.correct) {
            (Some(chosen), true) => format!("you: {}", chosen),
            (Some(chosen), false) => {
                format!("you: {}  ·  correct: {}", chosen, entry.correct_answer)
            }
            (None, _) => format!("unanswered  ·  correct: {}", entry.correct_answer),
        };
        lines.push(Line::from(Span::styled(
            format!("       {}", detail),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Review ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((app.review_scroll as u16, 0));

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}

fn truncate_prompt(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > PROMPT_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(PROMPT_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
