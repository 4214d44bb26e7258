//! In-process collection store.
//!
//! Holds the same document layout as Firestore in a [`DashMap`] keyed by user
//! ID. A save holds the user's entry lock from the index read through the last
//! write, which gives it the same all-or-nothing behaviour as a Firestore
//! transaction.

use crate::db::{plan_save, CollectionStore};
use crate::error::AppError;
use crate::models::flashcard::order_cards;
use crate::models::{Flashcard, StoredCard, UserCollections};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Contents of `users/{user_id}` and its sub-collections.
#[derive(Debug, Default, Clone)]
struct UserRecord {
    index: UserCollections,
    /// Fields written by other services, kept as-is across saves.
    other_fields: serde_json::Map<String, serde_json::Value>,
    collections: HashMap<String, Vec<StoredCard>>,
}

/// In-memory [`CollectionStore`].
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, UserRecord>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_commit_failure(&self) -> Result<(), AppError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(AppError::StoreCommit(
                "injected commit failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fault injection and inspection for tests and local runs.
///
/// None of these are part of [`CollectionStore`]; the router only ever sees
/// the store through that trait, so they are unreachable over HTTP.
impl MemoryStore {
    /// Make the next save fail at commit time, after its uniqueness check.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Set a field on the user document that this service does not own.
    pub fn set_user_field(&self, user_id: &str, key: &str, value: serde_json::Value) {
        self.users
            .entry(user_id.to_string())
            .or_default()
            .other_fields
            .insert(key.to_string(), value);
    }

    /// Read back a field set with [`MemoryStore::set_user_field`].
    pub fn user_field(&self, user_id: &str, key: &str) -> Option<serde_json::Value> {
        self.users
            .get(user_id)
            .and_then(|user| user.other_fields.get(key).cloned())
    }

    /// Number of card documents stored under `users/{user_id}/{name}`.
    pub fn card_document_count(&self, user_id: &str, name: &str) -> usize {
        self.users
            .get(user_id)
            .and_then(|user| user.collections.get(name).map(Vec::len))
            .unwrap_or(0)
    }

    /// Number of named sub-collections under `users/{user_id}`.
    pub fn sub_collection_count(&self, user_id: &str) -> usize {
        self.users
            .get(user_id)
            .map(|user| user.collections.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn get_collection_index(&self, user_id: &str) -> Result<UserCollections, AppError> {
        Ok(self
            .users
            .get(user_id)
            .map(|user| user.index.clone())
            .unwrap_or_default())
    }

    async fn save_collection(
        &self,
        user_id: &str,
        name: &str,
        cards: &[Flashcard],
    ) -> Result<(), AppError> {
        match self.users.entry(user_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let user = entry.get_mut();
                let plan = plan_save(Some(user.index.clone()), name, cards)?;
                self.take_commit_failure()?;
                user.index = plan.index;
                user.collections.insert(name.to_string(), plan.cards);
            }
            Entry::Vacant(entry) => {
                let plan = plan_save(None, name, cards)?;
                self.take_commit_failure()?;
                entry.insert(UserRecord {
                    index: plan.index,
                    collections: HashMap::from([(name.to_string(), plan.cards)]),
                    ..Default::default()
                });
            }
        }

        tracing::debug!(
            user_id,
            collection = name,
            card_count = cards.len(),
            "Collection saved (memory)"
        );

        Ok(())
    }

    async fn get_collection_cards(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Vec<Flashcard>>, AppError> {
        let Some(user) = self.users.get(user_id) else {
            return Ok(None);
        };
        if !user.index.contains(name) {
            return Ok(None);
        }

        let cards = user.collections.get(name).cloned().unwrap_or_default();
        Ok(Some(order_cards(cards)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectionRef;

    fn biology_cards() -> Vec<Flashcard> {
        vec![Flashcard::new("Q1", "A1"), Flashcard::new("Q2", "A2")]
    }

    #[tokio::test]
    async fn test_save_new_collection() {
        let store = MemoryStore::new();

        store
            .save_collection("u1", "Biology101", &biology_cards())
            .await
            .unwrap();

        let index = store.get_collection_index("u1").await.unwrap();
        assert_eq!(
            index.flashcards,
            vec![CollectionRef {
                name: "Biology101".to_string()
            }]
        );
        let cards = store
            .get_collection_cards("u1", "Biology101")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cards, biology_cards());
    }

    #[tokio::test]
    async fn test_duplicate_leaves_store_unchanged() {
        let store = MemoryStore::new();
        store
            .save_collection("u1", "Biology101", &biology_cards())
            .await
            .unwrap();

        for _ in 0..2 {
            let err = store
                .save_collection("u1", "Biology101", &[Flashcard::new("X", "Y")])
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::DuplicateCollection(_)));
        }

        assert_eq!(store.get_collection_index("u1").await.unwrap().flashcards.len(), 1);
        assert_eq!(store.card_document_count("u1", "Biology101"), 2);
    }

    #[tokio::test]
    async fn test_commit_failure_writes_nothing() {
        let store = MemoryStore::new();
        store.fail_next_commit();

        let err = store
            .save_collection("u1", "Biology101", &biology_cards())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StoreCommit(_)));

        assert!(store.get_collection_index("u1").await.unwrap().flashcards.is_empty());
        assert_eq!(store.sub_collection_count("u1"), 0);

        // The failure is one-shot; the same save then goes through.
        store
            .save_collection("u1", "Biology101", &biology_cards())
            .await
            .unwrap();
        assert_eq!(store.card_document_count("u1", "Biology101"), 2);
    }

    #[tokio::test]
    async fn test_user_field_hook_leaves_collections_alone() {
        let store = MemoryStore::new();
        store.set_user_field("u1", "display_name", serde_json::json!("Ada"));

        assert!(store.get_collection_index("u1").await.unwrap().flashcards.is_empty());
        assert_eq!(store.sub_collection_count("u1"), 0);
        assert!(store
            .get_collection_cards("u1", "display_name")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_save_preserves_other_user_fields() {
        let store = MemoryStore::new();
        store.set_user_field("u1", "plan", serde_json::json!("pro"));

        store
            .save_collection("u1", "Biology101", &biology_cards())
            .await
            .unwrap();

        assert_eq!(
            store.user_field("u1", "plan"),
            Some(serde_json::json!("pro"))
        );
    }

    #[tokio::test]
    async fn test_unknown_collection_is_none() {
        let store = MemoryStore::new();
        assert!(store
            .get_collection_cards("u1", "Nope")
            .await
            .unwrap()
            .is_none());
    }
}
