// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod collections;
pub mod generator;

pub use collections::{validate_collection_name, CollectionService, SavedCollection};
pub use generator::GeneratorClient;
