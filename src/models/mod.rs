// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod count;
pub mod flashcard;
pub mod user;

pub use count::{sanitize_count_input, CardCount};
pub use flashcard::{Flashcard, StoredCard};
pub use user::{CollectionRef, UserCollections};
