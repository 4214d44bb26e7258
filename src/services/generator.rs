// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Card generator client.
//!
//! The generator is an external endpoint that takes a free-text prompt and
//! answers with a JSON array of `{front, back}` cards. The response is passed
//! through as-is; there is no retry.

use crate::error::AppError;
use crate::models::{CardCount, Flashcard};
use crate::session::Session;
use serde::Serialize;
use std::time::Duration;

/// Request body expected by the generator.
#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    text: &'a str,
}

/// Prompt text sent to the generator: the count, a space, then the topic.
pub fn build_prompt(count: CardCount, topic: &str) -> String {
    format!("{} {}", count, topic)
}

/// HTTP client for the card generator endpoint.
#[derive(Clone)]
pub struct GeneratorClient {
    http: reqwest::Client,
    url: String,
}

impl GeneratorClient {
    /// Create a client for `url`; every request is bounded by `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Generate up to `count` cards about `topic` for a signed-in user.
    pub async fn generate(
        &self,
        session: &Session,
        count: CardCount,
        topic: &str,
    ) -> Result<Vec<Flashcard>, AppError> {
        let user_id = session.user_id()?;
        let prompt = build_prompt(count, topic);

        tracing::debug!(user_id, count = count.get(), "Requesting flashcards");

        let response = self
            .http
            .post(&self.url)
            .json(&GenerateBody { text: &prompt })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(user_id, error = %e, "Generator request failed");
                AppError::Transport(e.to_string())
            })?;

        let cards: Vec<Flashcard> = self.check_response_json(response).await?;

        tracing::info!(user_id, card_count = cards.len(), "Flashcards generated");
        Ok(cards)
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Generator returned an error status");
            return Err(AppError::Transport(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("JSON parse error: {}", e)))
    }
}
