//! Client-side view state.

use crate::session::QuizSession;

/// The session controller plus the cursor and scroll positions that only
/// matter for rendering.
pub struct ClientApp {
    /// The live attempt.
    pub session: QuizSession,
    /// Highlighted answer option on the current question.
    pub selected_option: usize,
    /// Scroll offset in the results review list.
    pub review_scroll: usize,
    /// Whether the event loop should exit.
    pub should_quit: bool,
}

impl ClientApp {
    /// Wrap a session for display.
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            selected_option: 0,
            review_scroll: 0,
            should_quit: false,
        }
    }

    /// Options for the current question, in display order.
    pub fn current_options(&self) -> Vec<String> {
        self.session
            .current_question()
            .map(|q| q.options())
            .unwrap_or_default()
    }

    /// Move the option highlight down, wrapping.
    pub fn select_next_option(&mut self) {
        let len = self.current_options().len();
        if len > 0 {
            self.selected_option = (self.selected_option + 1) % len;
        }
    }

    /// Move the option highlight up, wrapping.
    pub fn select_previous_option(&mut self) {
        let len = self.current_options().len();
        if len > 0 {
            self.selected_option = (self.selected_option + len - 1) % len;
        }
    }

    /// Record the highlighted option as the answer to the current question.
    pub fn choose_selected(&mut self) {
        let Some(question) = self.session.current_question() else {
            return;
        };
        let question_id = question.id;
        let chosen = question.options().get(self.selected_option).cloned();

        if let Some(chosen) = chosen {
            self.session.record_answer(question_id, chosen);
        }
    }

    /// Re-point the highlight after a question change: the previously chosen
    /// option if this question was answered, the first option otherwise.
    pub fn sync_selection(&mut self) {
        let position = self.session.current_question().and_then(|question| {
            let chosen = self.session.answer_for(question.id)?;
            question.options().iter().position(|o| o.as_str() == chosen)
        });
        self.selected_option = position.unwrap_or(0);
    }

    /// Scroll the review list down.
    pub fn scroll_results_down(&mut self) {
        // the review renders two lines per question
        let max_scroll = (self.session.total_questions() * 2).saturating_sub(1);
        self.review_scroll = (self.review_scroll + 1).min(max_scroll);
    }

    /// Scroll the review list up.
    pub fn scroll_results_up(&mut self) {
        self.review_scroll = self.review_scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use crate::models::Question;

    use super::*;

    fn app_with_one_question() -> ClientApp {
        let mut session = QuizSession::new(1, 1, 60);
        session.questions_loaded(vec![Question {
            id: 5,
            question_text: "Pick one".to_string(),
            correct_answer: "beta".to_string(),
            incorrect_answers: vec!["alpha".to_string(), "gamma".to_string()],
        }]);
        ClientApp::new(session)
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut app = app_with_one_question();
        app.select_previous_option();
        assert_eq!(app.selected_option, 2);
        app.select_next_option();
        assert_eq!(app.selected_option, 0);
    }

    #[test]
    fn test_choose_selected_records_option_text() {
        let mut app = app_with_one_question();
        app.select_next_option(); // "beta" in sorted order
        app.choose_selected();
        assert_eq!(app.session.answer_for(5), Some("beta"));
    }

    #[test]
    fn test_sync_selection_restores_chosen_option() {
        let mut app = app_with_one_question();
        app.session.record_answer(5, "gamma");
        app.sync_selection();
        assert_eq!(app.selected_option, 2);

        app.session.record_answer(5, "answer from nowhere");
        app.sync_selection();
        assert_eq!(app.selected_option, 0);
    }
}
