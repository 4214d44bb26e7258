// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session resolution middleware.
//!
//! Session tokens are HS256 JWTs issued by the identity provider. This layer
//! only verifies them; whether an operation needs a signed-in user is decided
//! by the service layer.

use crate::session::Session;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie the identity provider sets in the browser.
pub const SESSION_COOKIE: &str = "__session";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity provider user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Attach a [`Session`] to every request. Missing or invalid tokens yield
/// [`Session::SignedOut`].
pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    // Try cookie first, then header
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_string)
        });

    let session = match token {
        Some(token) => verify_token(&token, &state.config.session_signing_key),
        None => Session::SignedOut,
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Decode a session token; anything that fails verification is signed out.
pub fn verify_token(token: &str, signing_key: &[u8]) -> Session {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Session::signed_in(data.claims.sub),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            Session::SignedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const KEY: &[u8] = b"unit_test_session_key_32_bytes!";

    fn token(sub: &str, exp_offset: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = Claims {
            sub: sub.to_string(),
            iat: now as usize,
            exp: (now + exp_offset) as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        assert_eq!(
            verify_token(&token("user_2abc", 3600), KEY),
            Session::signed_in("user_2abc")
        );
    }

    #[test]
    fn test_expired_token() {
        assert_eq!(verify_token(&token("u1", -3600), KEY), Session::SignedOut);
    }

    #[test]
    fn test_wrong_key() {
        let other = b"some_other_signing_key_32_bytes";
        assert_eq!(verify_token(&token("u1", 3600), other), Session::SignedOut);
    }

    #[test]
    fn test_empty_subject() {
        assert_eq!(verify_token(&token("", 3600), KEY), Session::SignedOut);
    }

    #[test]
    fn test_garbage() {
        assert_eq!(verify_token("not.a.jwt", KEY), Session::SignedOut);
    }
}
