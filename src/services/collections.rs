// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saving and reading flashcard collections.

use crate::db::{CollectionStore, MAX_CARDS_PER_SAVE};
use crate::error::AppError;
use crate::models::{CollectionRef, Flashcard};
use crate::session::Session;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;
use validator::ValidationError;

/// Longest collection name Firestore accepts as a collection ID, in bytes.
const MAX_NAME_BYTES: usize = 1500;

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedCollection {
    pub name: String,
    pub card_count: usize,
}

/// Check that `name` is non-blank and usable as a Firestore collection ID.
pub fn validate_collection_name(name: &str) -> Result<(), ValidationError> {
    let invalid = |message: &'static str| {
        Err(ValidationError::new("collection_name").with_message(Cow::Borrowed(message)))
    };

    if name.trim().is_empty() {
        return invalid("Please enter a name for your collection");
    }
    if name.len() > MAX_NAME_BYTES {
        return invalid("Collection name is too long");
    }
    if name.contains('/') {
        return invalid("Collection name must not contain '/'");
    }
    if name == "." || name == ".." {
        return invalid("Collection name must not be '.' or '..'");
    }
    if name.len() >= 4 && name.starts_with("__") && name.ends_with("__") {
        return invalid("Collection name must not start and end with '__'");
    }
    Ok(())
}

/// Collection operations on behalf of a session.
#[derive(Clone)]
pub struct CollectionService {
    store: Arc<dyn CollectionStore>,
}

impl CollectionService {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }

    /// Persist `cards` as a new collection called `name`.
    ///
    /// Checks run in order: signed in, valid name, at least one card, card
    /// limit. Only then is the store touched; the uniqueness check and all
    /// writes commit together, so every indexed name has card documents.
    pub async fn save(
        &self,
        session: &Session,
        name: &str,
        cards: &[Flashcard],
    ) -> Result<SavedCollection, AppError> {
        let user_id = session.user_id()?;

        validate_collection_name(name).map_err(|e| AppError::Validation(e.to_string()))?;
        if cards.is_empty() {
            return Err(AppError::Validation(
                "A collection needs at least one card".to_string(),
            ));
        }
        if cards.len() > MAX_CARDS_PER_SAVE {
            return Err(AppError::Validation(format!(
                "A collection holds at most {} cards",
                MAX_CARDS_PER_SAVE
            )));
        }

        match self.store.save_collection(user_id, name, cards).await {
            Ok(()) => Ok(SavedCollection {
                name: name.to_string(),
                card_count: cards.len(),
            }),
            Err(e @ AppError::DuplicateCollection(_)) => {
                tracing::info!(user_id, collection = name, "Duplicate collection name");
                Err(e)
            }
            Err(e) => {
                tracing::error!(user_id, collection = name, error = %e, "Error saving flashcards");
                Err(e)
            }
        }
    }

    /// The user's collection index, in creation order.
    pub async fn list(&self, session: &Session) -> Result<Vec<CollectionRef>, AppError> {
        let user_id = session.user_id()?;
        Ok(self.store.get_collection_index(user_id).await?.flashcards)
    }

    /// Cards of one collection, in the order they were saved.
    pub async fn get(&self, session: &Session, name: &str) -> Result<Vec<Flashcard>, AppError> {
        let user_id = session.user_id()?;
        self.store
            .get_collection_cards(user_id, name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection {}", name)))
    }
}
