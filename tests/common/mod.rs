// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{routing::post, Json, Router};
use flashcard_forge::config::Config;
use flashcard_forge::db::{FirestoreDb, MemoryStore};
use flashcard_forge::routes::create_router;
use flashcard_forge::services::{CollectionService, GeneratorClient};
use flashcard_forge::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Router plus handles for inspecting what it did.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
}

/// Create a test app backed by an in-memory store. The generator URL points
/// at a closed port.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_generator(&Config::test_default().generator_url)
}

/// Create a test app whose generator calls go to `generator_url`.
#[allow(dead_code)]
pub fn create_test_app_with_generator(generator_url: &str) -> TestApp {
    let mut config = Config::test_default();
    config.generator_url = generator_url.to_string();

    let store = Arc::new(MemoryStore::new());
    let generator = GeneratorClient::new(config.generator_url.clone(), config.generator_timeout)
        .expect("Failed to build generator client");

    let state = Arc::new(AppState {
        config,
        generator,
        collections: CollectionService::new(store.clone()),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
    }
}

/// Create a session token the way the identity provider would.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 86400,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Send a request and decode the JSON response body (`Null` if empty).
#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build an authenticated GET request.
#[allow(dead_code)]
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Prompts received by a fake generator.
#[allow(dead_code)]
pub type ReceivedPrompts = Arc<Mutex<Vec<String>>>;

/// Start a stand-in generator on an ephemeral port that answers every request
/// with `status` and `body`. Returns its URL and the prompts it received.
#[allow(dead_code)]
pub async fn spawn_generator(
    status: StatusCode,
    body: serde_json::Value,
) -> (String, ReceivedPrompts) {
    let prompts: ReceivedPrompts = Arc::new(Mutex::new(Vec::new()));
    let received = prompts.clone();

    let app = Router::new().route(
        "/api/generate",
        post(move |Json(request): Json<serde_json::Value>| {
            let received = received.clone();
            let body = body.clone();
            async move {
                let text = request["text"].as_str().unwrap_or_default().to_string();
                received.lock().unwrap().push(text);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/generate", addr), prompts)
}
