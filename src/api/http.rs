//! HTTP implementation of the quiz API collaborators.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::models::Question;

use super::{ApiError, QuestionSource, ScoreSubmitter};

/// Payload returned by the submit endpoint.
#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: u32,
}

/// Client for the remote quiz API.
#[derive(Debug, Clone)]
pub struct QuizApiClient {
    base_url: String,
    http: Client,
}

impl QuizApiClient {
    /// Create a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl QuestionSource for QuizApiClient {
    async fn load_questions(&self, quiz_id: u64) -> Result<Vec<Question>, ApiError> {
        let url = format!("{}/api/questions/fetch/{}", self.base_url, quiz_id);
        debug!(%url, "fetching questions");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("no body".into());
            error!(%status, "question fetch failed: {}", body);
            return Err(ApiError::Api(status, body));
        }

        let body = response.text().await?;
        let questions: Vec<Question> = serde_json::from_str(&body)?;
        debug!(count = questions.len(), "questions fetched");

        Ok(questions)
    }
}

#[async_trait]
impl ScoreSubmitter for QuizApiClient {
    async fn submit_attempt(
        &self,
        quiz_id: u64,
        user_id: u64,
        answers: &HashMap<u64, String>,
    ) -> Result<u32, ApiError> {
        let url = format!("{}/api/questions/submit/{}/{}", self.base_url, quiz_id, user_id);
        debug!(%url, answered = answers.len(), "submitting attempt");

        let response = self.http.post(&url).json(answers).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("no body".into());
            error!(%status, "attempt submission failed: {}", body);
            return Err(ApiError::Api(status, body));
        }

        let body = response.text().await?;
        let parsed: ScoreResponse = serde_json::from_str(&body)?;

        Ok(parsed.score)
    }
}
