// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Card generation route.

use crate::error::Result;
use crate::models::{sanitize_count_input, CardCount, Flashcard};
use crate::session::Session;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Generation routes. Session resolution is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/generate", post(generate))
}

/// Generation request from the form.
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenerateRequest {
    /// Topic and/or difficulty, free text
    #[validate(length(max = 2000))]
    pub topic: String,
    /// Raw text of the count field
    #[serde(default)]
    pub count: String,
}

/// Generated cards plus the normalized count field.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GenerateResponse {
    /// The count field as it should now be displayed
    pub count: String,
    pub flashcards: Vec<Flashcard>,
}

/// Forward a prompt to the card generator.
async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    body: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    session.user_id()?;
    let Json(request) = body?;
    request.validate()?;

    let count = CardCount::from_field(&request.count);
    let flashcards = state
        .generator
        .generate(&session, count, &request.topic)
        .await?;

    Ok(Json(GenerateResponse {
        count: sanitize_count_input(&request.count),
        flashcards,
    }))
}
