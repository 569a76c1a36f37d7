//! Collaborator seam between the session core and the quiz API.
//!
//! The session controller never talks to the network directly; it is fed
//! through these two traits. [`QuizApiClient`] is the production
//! implementation speaking JSON over HTTP.

mod error;
mod http;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::Question;

pub use error::ApiError;
pub use http::QuizApiClient;

/// Source of the ordered question sequence for a quiz.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the questions for `quiz_id`, in presentation order.
    async fn load_questions(&self, quiz_id: u64) -> Result<Vec<Question>, ApiError>;
}

/// Persists one finished attempt and returns the computed score.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    /// Submit the answer mapping for one attempt.
    ///
    /// Unanswered questions are simply absent from `answers`.
    async fn submit_attempt(
        &self,
        quiz_id: u64,
        user_id: u64,
        answers: &HashMap<u64, String>,
    ) -> Result<u32, ApiError>;
}
