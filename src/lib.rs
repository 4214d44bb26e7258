// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Flashcard Forge: generate flashcards from a topic and keep them in named
//! collections.
//!
//! This crate provides the backend API: it forwards generation prompts to an
//! external card generator and stores each user's collections in Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use services::{CollectionService, GeneratorClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub generator: GeneratorClient,
    pub collections: CollectionService,
}
