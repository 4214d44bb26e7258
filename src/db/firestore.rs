// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Layout:
//! - `users/{user_id}`: field `flashcards: [{name}]` (the collection index)
//! - `users/{user_id}/{collection_name}/{auto_id}`: one document per card

use crate::db::{collections, plan_save, CollectionStore};
use crate::error::AppError;
use crate::models::flashcard::order_cards;
use crate::models::{Flashcard, StoredCard, UserCollections};
use async_trait::async_trait;
use firestore::{paths, FirestoreConsistencySelector};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Read the user document through `client`, which may be pinned to a transaction.
    async fn read_index(
        client: &firestore::FirestoreDb,
        user_id: &str,
    ) -> Result<Option<UserCollections>, AppError> {
        client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl CollectionStore for FirestoreDb {
    async fn get_collection_index(&self, user_id: &str) -> Result<UserCollections, AppError> {
        Ok(Self::read_index(&self.client, user_id)
            .await?
            .unwrap_or_default())
    }

    /// The index is read inside the transaction, so a concurrent save that
    /// touches the same user document makes one of the commits fail instead of
    /// both passing the uniqueness check.
    async fn save_collection(
        &self,
        user_id: &str,
        name: &str,
        cards: &[Flashcard],
    ) -> Result<(), AppError> {
        let client = &self.client;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // 1. Read the current index within the transaction
        let tx_client = client.clone_with_consistency_selector(
            FirestoreConsistencySelector::Transaction(transaction.transaction_id().clone()),
        );
        let current = match Self::read_index(&tx_client, user_id).await {
            Ok(current) => current,
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(e);
            }
        };

        // 2. Uniqueness check; nothing has been written yet
        let plan = match plan_save(current, name, cards) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::debug!(user_id, collection = name, "Collection name taken");
                let _ = transaction.rollback().await;
                return Err(e);
            }
        };

        // 3. Merge the index into the user document; other fields stay untouched
        client
            .fluent()
            .update()
            .fields(paths!(UserCollections::{flashcards}))
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(&plan.index)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add index to transaction: {}", e))
            })?;

        // 4. One document per card under users/{user_id}/{name}
        let parent = client
            .parent_path(collections::USERS, user_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        for card in &plan.cards {
            let doc_id = card.id.as_deref().unwrap_or_default();
            client
                .fluent()
                .update()
                .in_col(name)
                .document_id(doc_id)
                .parent(&parent)
                .object(card)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add card to transaction: {}", e))
                })?;
        }

        // 5. Commit atomically
        transaction
            .commit()
            .await
            .map_err(|e| AppError::StoreCommit(e.to_string()))?;

        tracing::info!(
            user_id,
            collection = name,
            card_count = plan.cards.len(),
            "Collection saved"
        );

        Ok(())
    }

    async fn get_collection_cards(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Vec<Flashcard>>, AppError> {
        if !self.get_collection_index(user_id).await?.contains(name) {
            return Ok(None);
        }

        let parent = self
            .client
            .parent_path(collections::USERS, user_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let cards: Vec<StoredCard> = self
            .client
            .fluent()
            .select()
            .from(name)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(order_cards(cards)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectionRef;
    use serde::{Deserialize, Serialize};

    /// Fields another service keeps on the user document.
    #[derive(Serialize, Deserialize)]
    struct Profile {
        display_name: String,
    }

    #[derive(Deserialize)]
    struct UserDoc {
        display_name: Option<String>,
        #[serde(default)]
        flashcards: Vec<CollectionRef>,
    }

    async fn emulator_db() -> Option<FirestoreDb> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_err() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return None;
        }
        Some(FirestoreDb::new("test-project").await.unwrap())
    }

    async fn read_user_doc(db: &FirestoreDb, user_id: &str) -> UserDoc {
        db.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .unwrap()
            .expect("user document should exist")
    }

    #[tokio::test]
    async fn test_index_merge_keeps_other_user_fields() {
        let Some(db) = emulator_db().await else {
            return;
        };
        let user_id = format!("user_merge_{}", uuid::Uuid::new_v4());

        let _: () = db
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user_id)
            .object(&Profile {
                display_name: "Ada".to_string(),
            })
            .execute()
            .await
            .unwrap();

        db.save_collection(&user_id, "Biology101", &[Flashcard::new("Q1", "A1")])
            .await
            .unwrap();
        db.save_collection(&user_id, "Chemistry", &[Flashcard::new("H2O", "Water")])
            .await
            .unwrap();

        let doc = read_user_doc(&db, &user_id).await;
        assert_eq!(doc.display_name.as_deref(), Some("Ada"));
        let names: Vec<&str> = doc.flashcards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Biology101", "Chemistry"]);
    }
}
