// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Caller identity passed explicitly into every operation.

use crate::error::AppError;

/// Who is making a request, as established by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    SignedOut,
    SignedIn { user_id: String },
}

impl Session {
    /// Signed-in session; an empty ID is treated as signed out.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if user_id.is_empty() {
            Session::SignedOut
        } else {
            Session::SignedIn { user_id }
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn { .. })
    }

    /// The signed-in user's ID, or [`AppError::Unauthenticated`].
    pub fn user_id(&self) -> Result<&str, AppError> {
        match self {
            Session::SignedIn { user_id } => Ok(user_id),
            Session::SignedOut => Err(AppError::Unauthenticated),
        }
    }
}
