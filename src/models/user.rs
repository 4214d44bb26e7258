//! User document model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One entry of a user's collection index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CollectionRef {
    pub name: String,
}

/// The fields of `users/{user_id}` this service owns.
///
/// The document may carry other fields written by other services; writes go
/// through a field mask on `flashcards` so those are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCollections {
    /// Collection index, in creation order.
    #[serde(default)]
    pub flashcards: Vec<CollectionRef>,
}

impl UserCollections {
    /// Exact, case-sensitive name lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.flashcards.iter().any(|c| c.name == name)
    }
}
