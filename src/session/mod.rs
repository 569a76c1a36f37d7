//! One quiz attempt: the controller state machine and its countdown timer.

mod controller;
mod timer;

pub use controller::{
    AnswerReview, QuizSession, SessionPhase, SubmitRequest, TickOutcome,
    DEFAULT_QUESTION_SECONDS,
};
pub use timer::{QuestionTimer, TimerTick, TICK_INTERVAL};
