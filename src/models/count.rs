// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Card count field handling.
//!
//! The count is typed into a free-text field, so it arrives as a string that
//! may hold anything. [`sanitize_count_input`] is applied on every edit and
//! [`CardCount::from_field`] turns whatever is left into the number sent to
//! the generator.

pub const MIN_CARDS: u32 = 1;
pub const MAX_CARDS: u32 = 10;

/// Normalize the raw text of the count field.
///
/// Non-digits are stripped. If no digits remain the field stays empty.
/// Otherwise the value is clamped into `[MIN_CARDS, MAX_CARDS]`.
pub fn sanitize_count_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }

    // Digit strings too long for u32 are far above the cap anyway.
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    value.clamp(MIN_CARDS, MAX_CARDS).to_string()
}

/// Number of cards to request, always within `[MIN_CARDS, MAX_CARDS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardCount(u32);

impl CardCount {
    /// Effective count for a raw field value; empty or invalid means one card.
    pub fn from_field(raw: &str) -> Self {
        let sanitized = sanitize_count_input(raw);
        Self(sanitized.parse().unwrap_or(MIN_CARDS))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CardCount {
    fn default() -> Self {
        Self(MIN_CARDS)
    }
}

impl std::fmt::Display for CardCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
