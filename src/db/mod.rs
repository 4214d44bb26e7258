//! Database layer.
//!
//! Collections are persisted through the [`CollectionStore`] trait. Firestore
//! is the production backend; [`MemoryStore`] keeps the same semantics in
//! process for tests and local development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{CollectionRef, Flashcard, StoredCard, UserCollections};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    /// User documents, keyed by identity provider user ID. Each one holds the
    /// collection index and one sub-collection per saved flashcard set.
    pub const USERS: &str = "users";
}

// Firestore limits a transaction to 500 writes. One write goes to the user
// document, and we keep headroom below the limit.
pub const MAX_CARDS_PER_SAVE: usize = 400;

/// Storage for users' flashcard collections.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Read a user's collection index. A missing user document is an empty index.
    async fn get_collection_index(&self, user_id: &str) -> Result<UserCollections, AppError>;

    /// Atomically add `name` to the user's index and write one card document per
    /// flashcard under it.
    ///
    /// Fails with [`AppError::DuplicateCollection`] without writing anything if
    /// the name is already indexed. The uniqueness check and the writes happen
    /// in one transaction.
    async fn save_collection(
        &self,
        user_id: &str,
        name: &str,
        cards: &[Flashcard],
    ) -> Result<(), AppError>;

    /// Cards of one collection in submission order, or `None` if the name is
    /// not in the user's index.
    async fn get_collection_cards(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Vec<Flashcard>>, AppError>;
}

/// Writes produced by a successful uniqueness check.
#[derive(Debug)]
pub struct SavePlan {
    /// Updated index for the user document.
    pub index: UserCollections,
    /// One card document per submitted flashcard, with a fresh auto ID.
    pub cards: Vec<StoredCard>,
}

/// Check `name` against the current index and build the writes for a save.
///
/// `current` is `None` when the user document does not exist yet.
pub fn plan_save(
    current: Option<UserCollections>,
    name: &str,
    cards: &[Flashcard],
) -> Result<SavePlan, AppError> {
    let mut index = current.unwrap_or_default();
    if index.contains(name) {
        return Err(AppError::DuplicateCollection(name.to_string()));
    }
    index.flashcards.push(CollectionRef {
        name: name.to_string(),
    });

    let cards = cards
        .iter()
        .zip(0u32..)
        .map(|(card, position)| StoredCard::from_card(card, new_document_id(), position))
        .collect();

    Ok(SavePlan { index, cards })
}

/// Random document ID for a new card.
fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
