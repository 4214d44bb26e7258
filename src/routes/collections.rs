// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Collection routes: save, list and view.

use crate::error::Result;
use crate::models::{CollectionRef, Flashcard};
use crate::services::{validate_collection_name, SavedCollection};
use crate::session::Session;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Collection routes. Session resolution is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/collections",
            get(list_collections).post(save_collection),
        )
        .route("/api/collections/{name}", get(get_collection))
}

// ─── Save ────────────────────────────────────────────────────

/// Body of a save request.
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SaveCollectionRequest {
    #[validate(custom(function = "validate_collection_name"))]
    pub name: String,
    #[validate(length(min = 1))]
    pub flashcards: Vec<Flashcard>,
}

/// Persist the previewed cards as a new named collection.
async fn save_collection(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    body: std::result::Result<Json<SaveCollectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedCollection>)> {
    // Signed-out callers get 401 whatever the body looks like
    session.user_id()?;
    let Json(request) = body?;
    request.validate()?;

    let saved = state
        .collections
        .save(&session, &request.name, &request.flashcards)
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

// ─── List ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CollectionsResponse {
    pub collections: Vec<CollectionRef>,
}

async fn list_collections(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<CollectionsResponse>> {
    let collections = state.collections.list(&session).await?;
    Ok(Json(CollectionsResponse { collections }))
}

// ─── View ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CollectionResponse {
    pub name: String,
    pub flashcards: Vec<Flashcard>,
}

async fn get_collection(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(name): Path<String>,
) -> Result<Json<CollectionResponse>> {
    let flashcards = state.collections.get(&session, &name).await?;
    Ok(Json(CollectionResponse { name, flashcards }))
}
