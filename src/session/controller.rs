//! The quiz session controller.
//!
//! Owns one attempt from question load through scoring: phase transitions,
//! answer recording, navigation, the per-question countdown and submission
//! guards. All methods are synchronous; the surrounding event loop feeds it
//! discrete events (load completion, key presses, timer ticks, submission
//! completion) and reacts to what they return.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::Question;

/// Default per-question countdown, in seconds.
pub const DEFAULT_QUESTION_SECONDS: u32 = 60;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the question source.
    Loading,
    /// The question fetch failed or returned no questions. Terminal.
    LoadFailed { reason: String },
    /// The attempt is live.
    InProgress,
    /// The attempt was scored. Terminal.
    Submitted { score: u32 },
}

/// What a countdown tick led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown still running, or the tick was ignored.
    Counting,
    /// Time ran out on a non-last question; the session advanced.
    Advanced,
    /// Time ran out on the last question; the caller must start a submission.
    SubmitDue,
}

/// Everything the score submitter needs for one submission attempt.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub quiz_id: u64,
    pub user_id: u64,
    /// Question id to chosen answer text. Unanswered questions have no entry.
    pub answers: HashMap<u64, String>,
}

/// Per-question correctness for the results screen.
///
/// Display only; the authoritative score comes from the score submitter.
#[derive(Debug, Clone)]
pub struct AnswerReview {
    pub question_id: u64,
    pub prompt: String,
    pub chosen: Option<String>,
    pub correct_answer: String,
    pub correct: bool,
}

/// One live quiz attempt.
pub struct QuizSession {
    attempt_id: Uuid,
    quiz_id: u64,
    user_id: u64,
    phase: SessionPhase,
    /// Fixed length and order once loaded.
    questions: Vec<Question>,
    answers: HashMap<u64, String>,
    current_index: usize,
    countdown: u32,
    question_seconds: u32,
    /// At most one submission outstanding at a time.
    submit_in_flight: bool,
    submit_error: Option<String>,
    /// The countdown fires at most once per question; reset by navigation.
    timed_out: bool,
}

impl QuizSession {
    /// Create a session in `Loading` for `quiz_id`, attributed to `user_id`.
    pub fn new(quiz_id: u64, user_id: u64, question_seconds: u32) -> Self {
        let attempt_id = Uuid::new_v4();
        info!(%attempt_id, quiz_id, user_id, "starting attempt");

        Self {
            attempt_id,
            quiz_id,
            user_id,
            phase: SessionPhase::Loading,
            questions: Vec::new(),
            answers: HashMap::new(),
            current_index: 0,
            countdown: question_seconds,
            question_seconds,
            submit_in_flight: false,
            submit_error: None,
            timed_out: false,
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn quiz_id(&self) -> u64 {
        self.quiz_id
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, SessionPhase::InProgress)
    }

    /// Check if no further attempt-relevant transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::LoadFailed { .. } | SessionPhase::Submitted { .. }
        )
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_in_progress() {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.is_in_progress() && self.current_index + 1 == self.questions.len()
    }

    /// Seconds left on the current question.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn question_seconds(&self) -> u32 {
        self.question_seconds
    }

    /// The recorded answer for a question, if any.
    pub fn answer_for(&self, question_id: u64) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    /// The last submission failure, until cleared by navigation or a retry.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// The question source answered. Empty sequences are a load failure.
    pub fn questions_loaded(&mut self, questions: Vec<Question>) {
        if !matches!(self.phase, SessionPhase::Loading) {
            return;
        }

        if questions.is_empty() {
            warn!(attempt = %self.attempt_id, "no questions available");
            self.phase = SessionPhase::LoadFailed {
                reason: "no questions available for this quiz".to_string(),
            };
            return;
        }

        info!(attempt = %self.attempt_id, count = questions.len(), "questions loaded");
        self.questions = questions;
        self.current_index = 0;
        self.countdown = self.question_seconds;
        self.phase = SessionPhase::InProgress;
    }

    /// The question source failed.
    pub fn load_failed(&mut self, reason: impl Into<String>) {
        if !matches!(self.phase, SessionPhase::Loading) {
            return;
        }

        let reason = reason.into();
        warn!(attempt = %self.attempt_id, %reason, "question load failed");
        self.phase = SessionPhase::LoadFailed { reason };
    }

    /// Record (or overwrite) the answer for a question. Any text is accepted.
    pub fn record_answer(&mut self, question_id: u64, chosen: impl Into<String>) {
        if !self.is_in_progress() {
            return;
        }
        self.answers.insert(question_id, chosen.into());
    }

    /// Move to the next question. Returns whether the index changed.
    pub fn next_question(&mut self) -> bool {
        if !self.is_in_progress() || self.current_index + 1 >= self.questions.len() {
            return false;
        }
        self.current_index += 1;
        self.reset_countdown();
        true
    }

    /// Move to the previous question. Returns whether the index changed.
    pub fn previous_question(&mut self) -> bool {
        if !self.is_in_progress() || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.reset_countdown();
        true
    }

    fn reset_countdown(&mut self) {
        self.countdown = self.question_seconds;
        self.timed_out = false;
        self.submit_error = None;
    }

    /// Apply one countdown tick.
    ///
    /// The countdown never goes negative, and reaching zero fires at most once
    /// per question: on a non-last question the session advances and the
    /// countdown resets, on the last question the caller must start a
    /// submission. Ticks while a submission is outstanding are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_in_progress() || self.submit_in_flight || self.timed_out {
            return TickOutcome::Counting;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return TickOutcome::Counting;
        }

        self.timed_out = true;
        if self.is_last_question() {
            debug!(attempt = %self.attempt_id, "time up on last question");
            TickOutcome::SubmitDue
        } else {
            debug!(attempt = %self.attempt_id, index = self.current_index, "time up, advancing");
            self.current_index += 1;
            self.reset_countdown();
            TickOutcome::Advanced
        }
    }

    /// Start a submission, unless one is already outstanding or the session
    /// is not live. Returns the payload for the score submitter.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if !self.is_in_progress() || self.submit_in_flight {
            return None;
        }

        self.submit_in_flight = true;
        self.submit_error = None;
        info!(
            attempt = %self.attempt_id,
            answered = self.answers.len(),
            total = self.questions.len(),
            "submitting attempt"
        );

        Some(SubmitRequest {
            quiz_id: self.quiz_id,
            user_id: self.user_id,
            answers: self.answers.clone(),
        })
    }

    /// The score submitter accepted the attempt. Terminal.
    pub fn submit_succeeded(&mut self, score: u32) {
        if !self.submit_in_flight {
            return;
        }
        self.submit_in_flight = false;

        if !self.is_in_progress() {
            return;
        }
        info!(attempt = %self.attempt_id, score, "attempt scored");
        self.phase = SessionPhase::Submitted { score };
    }

    /// The score submitter failed. The session stays live; the countdown does
    /// not resume until the next navigation, and the user may resubmit.
    pub fn submit_failed(&mut self, reason: impl Into<String>) {
        if !self.submit_in_flight {
            return;
        }
        self.submit_in_flight = false;

        if !self.is_in_progress() {
            return;
        }
        let reason = reason.into();
        warn!(attempt = %self.attempt_id, %reason, "attempt submission failed");
        self.submit_error = Some(reason);
    }

    /// Per-question review of the whole attempt, in question order.
    pub fn review(&self) -> Vec<AnswerReview> {
        self.questions
            .iter()
            .map(|question| {
                let chosen = self.answers.get(&question.id).cloned();
                let correct = chosen.as_deref().is_some_and(|a| question.is_correct(a));

                AnswerReview {
                    question_id: question.id,
                    prompt: question.question_text.clone(),
                    chosen,
                    correct_answer: question.correct_answer.clone(),
                    correct,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::api::{ApiError, QuestionSource, ScoreSubmitter};

    use super::*;

    fn question(id: u64, prompt: &str, correct: &str, incorrect: &[&str]) -> Question {
        Question {
            id,
            question_text: prompt.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![
            question(1, "Q1?", "a", &["b", "c"]),
            question(2, "Q2?", "b", &["a", "c"]),
            question(3, "Q3?", "c", &["a", "b"]),
        ]
    }

    fn in_progress_session(questions: Vec<Question>, seconds: u32) -> QuizSession {
        let mut session = QuizSession::new(10, 1, seconds);
        session.questions_loaded(questions);
        assert!(session.is_in_progress());
        session
    }

    struct StaticSource(Vec<Question>);

    #[async_trait]
    impl QuestionSource for StaticSource {
        async fn load_questions(&self, _quiz_id: u64) -> Result<Vec<Question>, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl QuestionSource for FailingSource {
        async fn load_questions(&self, _quiz_id: u64) -> Result<Vec<Question>, ApiError> {
            Err(ApiError::Api(StatusCode::NOT_FOUND, "no such quiz".into()))
        }
    }

    /// Counts calls and remembers the last submitted mapping.
    struct RecordingSubmitter {
        calls: AtomicUsize,
        last_answers: Mutex<Option<HashMap<u64, String>>>,
        result: Result<u32, ()>,
    }

    impl RecordingSubmitter {
        fn returning(score: u32) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_answers: Mutex::new(None),
                result: Ok(score),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_answers: Mutex::new(None),
                result: Err(()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScoreSubmitter for RecordingSubmitter {
        async fn submit_attempt(
            &self,
            _quiz_id: u64,
            _user_id: u64,
            answers: &HashMap<u64, String>,
        ) -> Result<u32, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_answers.lock().unwrap() = Some(answers.clone());
            match self.result {
                Ok(score) => Ok(score),
                Err(()) => Err(ApiError::Api(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "boom".into(),
                )),
            }
        }
    }

    /// Drive one full submission through a submitter, the way the client does.
    async fn submit_through(session: &mut QuizSession, submitter: &dyn ScoreSubmitter) {
        let Some(request) = session.begin_submit() else {
            return;
        };
        match submitter
            .submit_attempt(request.quiz_id, request.user_id, &request.answers)
            .await
        {
            Ok(score) => session.submit_succeeded(score),
            Err(e) => session.submit_failed(e.to_string()),
        }
    }

    #[test]
    fn test_nonempty_load_enters_in_progress_at_index_zero() {
        let session = in_progress_session(three_questions(), 60);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.countdown(), 60);
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_empty_load_is_terminal_failure() {
        let mut session = QuizSession::new(10, 1, 60);
        session.questions_loaded(Vec::new());
        assert!(matches!(session.phase(), SessionPhase::LoadFailed { .. }));
        assert!(session.is_terminal());

        // no navigation, answers, ticks or submission from here
        assert!(!session.next_question());
        assert!(!session.previous_question());
        session.record_answer(1, "a");
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.tick(), TickOutcome::Counting);
        assert!(session.begin_submit().is_none());
    }

    #[test]
    fn test_failed_load_is_terminal_failure() {
        let mut session = QuizSession::new(10, 1, 60);
        session.load_failed("connection refused");
        let SessionPhase::LoadFailed { reason } = session.phase() else {
            panic!("expected LoadFailed");
        };
        assert_eq!(reason, "connection refused");
    }

    #[test]
    fn test_load_result_after_leaving_loading_is_ignored() {
        let mut session = in_progress_session(three_questions(), 60);
        session.questions_loaded(vec![question(9, "late?", "x", &["y"])]);
        assert_eq!(session.total_questions(), 3);
        session.load_failed("late failure");
        assert!(session.is_in_progress());
    }

    #[test]
    fn test_recording_twice_keeps_latest_answer() {
        let mut session = in_progress_session(three_questions(), 60);
        session.record_answer(1, "b");
        session.record_answer(1, "a");
        assert_eq!(session.answer_for(1), Some("a"));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn test_any_answer_text_is_accepted() {
        let mut session = in_progress_session(three_questions(), 60);
        session.record_answer(2, "not even an option");
        assert_eq!(session.answer_for(2), Some("not even an option"));
    }

    #[test]
    fn test_navigation_round_trip_keeps_answers() {
        let mut session = in_progress_session(three_questions(), 60);
        session.record_answer(1, "a");

        assert!(session.next_question());
        session.record_answer(2, "c");
        assert!(session.previous_question());

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answer_for(1), Some("a"));
        assert_eq!(session.answer_for(2), Some("c"));
    }

    #[test]
    fn test_navigation_respects_bounds() {
        let mut session = in_progress_session(three_questions(), 60);
        assert!(!session.previous_question());
        assert!(session.next_question());
        assert!(session.next_question());
        assert!(session.is_last_question());
        assert!(!session.next_question());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_single_question_has_no_navigation() {
        let mut session = in_progress_session(vec![question(1, "only?", "a", &["b"])], 60);
        assert!(session.is_last_question());
        assert!(!session.next_question());
        assert!(!session.previous_question());
    }

    #[test]
    fn test_navigation_resets_countdown() {
        let mut session = in_progress_session(three_questions(), 10);
        session.tick();
        session.tick();
        assert_eq!(session.countdown(), 8);

        assert!(session.next_question());
        assert_eq!(session.countdown(), 10);

        session.tick();
        assert!(session.previous_question());
        assert_eq!(session.countdown(), 10);
    }

    #[test]
    fn test_timeout_on_nonlast_question_advances_once_and_resets() {
        let mut session = in_progress_session(three_questions(), 2);
        assert_eq!(session.tick(), TickOutcome::Counting);
        assert_eq!(session.tick(), TickOutcome::Advanced);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.countdown(), 2);
    }

    #[test]
    fn test_timeout_on_last_question_requests_submission_exactly_once() {
        let mut session = in_progress_session(vec![question(1, "only?", "a", &["b"])], 2);
        assert_eq!(session.tick(), TickOutcome::Counting);
        assert_eq!(session.tick(), TickOutcome::SubmitDue);

        // leaked ticks after the timeout change nothing
        assert_eq!(session.tick(), TickOutcome::Counting);
        assert_eq!(session.tick(), TickOutcome::Counting);
        assert_eq!(session.countdown(), 0);
    }

    #[test]
    fn test_countdown_never_goes_negative() {
        let mut session = in_progress_session(vec![question(1, "only?", "a", &["b"])], 1);
        assert_eq!(session.tick(), TickOutcome::SubmitDue);
        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.countdown(), 0);
    }

    #[test]
    fn test_ticks_are_ignored_while_submission_outstanding() {
        let mut session = in_progress_session(three_questions(), 10);
        assert!(session.begin_submit().is_some());
        assert_eq!(session.tick(), TickOutcome::Counting);
        assert_eq!(session.countdown(), 10);
    }

    #[test]
    fn test_second_submission_blocked_while_in_flight() {
        let mut session = in_progress_session(three_questions(), 60);
        assert!(session.begin_submit().is_some());
        assert!(session.begin_submit().is_none());
    }

    #[test]
    fn test_score_is_never_cleared_once_set() {
        let mut session = in_progress_session(three_questions(), 60);
        assert!(session.begin_submit().is_some());
        session.submit_succeeded(2);
        assert_eq!(session.phase(), &SessionPhase::Submitted { score: 2 });

        // a stale completion cannot re-open or re-score the attempt
        session.submit_failed("late error");
        session.submit_succeeded(99);
        assert_eq!(session.phase(), &SessionPhase::Submitted { score: 2 });
        assert!(session.is_terminal());
    }

    #[tokio::test]
    async fn test_scenario_full_attempt_scores_and_terminates() {
        // 3 questions, Q1 and Q3 correct, Q2 wrong, submit from the last one
        let mut session = in_progress_session(three_questions(), 60);
        session.record_answer(1, "a");
        session.next_question();
        session.record_answer(2, "c");
        session.next_question();
        session.record_answer(3, "c");

        let submitter = RecordingSubmitter::returning(2);
        submit_through(&mut session, &submitter).await;

        assert_eq!(submitter.calls(), 1);
        let sent = submitter.last_answers.lock().unwrap().clone().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent.get(&2).map(String::as_str), Some("c"));

        assert_eq!(session.phase(), &SessionPhase::Submitted { score: 2 });

        let review = session.review();
        assert_eq!(
            review.iter().map(|r| r.correct).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[tokio::test]
    async fn test_scenario_unanswered_timeout_submits_empty_mapping_once() {
        // 1 question, never answered, countdown runs out
        let mut session = in_progress_session(vec![question(1, "only?", "a", &["b"])], 1);
        assert_eq!(session.tick(), TickOutcome::SubmitDue);

        let submitter = RecordingSubmitter::returning(0);
        submit_through(&mut session, &submitter).await;
        // a leaked second trigger finds the session terminal
        submit_through(&mut session, &submitter).await;

        assert_eq!(submitter.calls(), 1);
        let sent = submitter.last_answers.lock().unwrap().clone().unwrap();
        assert!(sent.is_empty());
        assert_eq!(session.phase(), &SessionPhase::Submitted { score: 0 });
    }

    #[tokio::test]
    async fn test_scenario_failed_submission_is_recoverable() {
        let mut session = in_progress_session(three_questions(), 60);
        session.record_answer(1, "a");

        let failing = RecordingSubmitter::failing();
        submit_through(&mut session, &failing).await;

        assert_eq!(failing.calls(), 1);
        assert!(session.is_in_progress());
        assert!(session.submit_error().is_some());
        assert!(!session.submit_in_flight());

        // manual retry succeeds
        let submitter = RecordingSubmitter::returning(1);
        submit_through(&mut session, &submitter).await;
        assert_eq!(session.phase(), &SessionPhase::Submitted { score: 1 });
        assert!(session.submit_error().is_none());
    }

    #[tokio::test]
    async fn test_scenario_empty_fetch_never_runs() {
        let mut session = QuizSession::new(10, 1, 60);
        let source = StaticSource(Vec::new());
        match source.load_questions(session.quiz_id()).await {
            Ok(questions) => session.questions_loaded(questions),
            Err(e) => session.load_failed(e.to_string()),
        }

        assert!(matches!(session.phase(), SessionPhase::LoadFailed { .. }));
        assert!(session.current_question().is_none());
    }

    #[tokio::test]
    async fn test_source_failure_surfaces_reason() {
        let mut session = QuizSession::new(10, 1, 60);
        match FailingSource.load_questions(session.quiz_id()).await {
            Ok(questions) => session.questions_loaded(questions),
            Err(e) => session.load_failed(e.to_string()),
        }

        let SessionPhase::LoadFailed { reason } = session.phase() else {
            panic!("expected LoadFailed");
        };
        assert!(reason.contains("no such quiz"));
    }

    #[test]
    fn test_review_marks_unanswered_as_incorrect() {
        let mut session = in_progress_session(three_questions(), 60);
        session.record_answer(1, "a");
        assert!(session.begin_submit().is_some());
        session.submit_succeeded(1);

        let review = session.review();
        assert_eq!(review.len(), 3);
        assert!(review[0].correct);
        assert_eq!(review[1].chosen, None);
        assert!(!review[1].correct);
        assert_eq!(review[2].correct_answer, "c");
    }
}
