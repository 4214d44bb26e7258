// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flashcard Forge API Server
//!
//! Generates flashcards through an external generator endpoint and stores
//! named collections per user.

use flashcard_forge::{
    config::{Config, StoreBackend},
    db::{CollectionStore, FirestoreDb, MemoryStore},
    services::{CollectionService, GeneratorClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Flashcard Forge API");

    // Initialize the collection store
    let store: Arc<dyn CollectionStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory collection store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let generator = GeneratorClient::new(config.generator_url.clone(), config.generator_timeout)?;
    tracing::info!(
        url = %config.generator_url,
        timeout_secs = config.generator_timeout.as_secs(),
        "Card generator client initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        generator,
        collections: CollectionService::new(store),
    });

    // Build router
    let app = flashcard_forge::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flashcard_forge=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
