//! # quiz-play
//!
//! A terminal client for playing one timed quiz attempt against a remote
//! quiz API: it fetches a quiz's questions, runs a per-question countdown,
//! records answers while navigating freely, submits the attempt, and shows
//! the scored review.
//!
//! The crate is organized around three seams:
//!
//! - [`session`]: the attempt state machine and its countdown timer
//! - [`api`]: the [`QuestionSource`]/[`ScoreSubmitter`] collaborators and
//!   their HTTP implementation
//! - [`client`]: the terminal front end
//!
//! The session controller is plain state fed by discrete events, so it can be
//! driven without any UI:
//!
//! ```rust
//! use quiz_play::session::{QuizSession, SessionPhase, DEFAULT_QUESTION_SECONDS};
//!
//! let mut session = QuizSession::new(42, 7, DEFAULT_QUESTION_SECONDS);
//! assert_eq!(session.phase(), &SessionPhase::Loading);
//! // feed it events: questions_loaded, record_answer, tick, begin_submit...
//! ```

pub mod api;
pub mod client;
pub mod models;
pub mod session;

pub use api::{ApiError, QuestionSource, QuizApiClient, ScoreSubmitter};
pub use models::Question;
pub use session::{QuizSession, SessionPhase};
