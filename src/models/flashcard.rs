// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Flashcard model for generation, storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single front/back card as produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Card document stored at `users/{user_id}/{collection}/{auto_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCard {
    /// Document ID, filled in on read.
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    pub front: String,
    pub back: String,
    /// Index within the submitted sequence. Auto IDs carry no order, so
    /// reads sort on this field.
    #[serde(default)]
    pub position: Option<u32>,
}

impl StoredCard {
    pub fn from_card(card: &Flashcard, id: String, position: u32) -> Self {
        Self {
            id: Some(id),
            front: card.front.clone(),
            back: card.back.clone(),
            position: Some(position),
        }
    }

    pub fn into_card(self) -> Flashcard {
        Flashcard {
            front: self.front,
            back: self.back,
        }
    }
}

/// Restore submission order: positioned cards first, in order, then any
/// unpositioned cards in their document ID order.
pub fn order_cards(mut cards: Vec<StoredCard>) -> Vec<Flashcard> {
    cards.sort_by(|a, b| match (a.position, b.position) {
        (Some(a_pos), Some(b_pos)) => a_pos.cmp(&b_pos).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    cards.into_iter().map(StoredCard::into_card).collect()
}
