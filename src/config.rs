//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables by the deployment (Cloud Run
//! secret bindings) and read once at startup.

use std::env;
use std::time::Duration;

/// Default timeout for a single card generation request.
const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 30;

/// Which collection store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Cloud Firestore (or the emulator, if `FIRESTORE_EMULATOR_HOST` is set).
    Firestore,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Card generator endpoint (POST `{text}`)
    pub generator_url: String,
    /// Upper bound on one generator round trip
    pub generator_timeout: Duration,
    /// Collection store implementation
    pub store_backend: StoreBackend,

    // --- Secrets ---
    /// HS256 key used to verify session tokens from the identity provider
    pub session_signing_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            generator_url: "http://127.0.0.1:9/api/generate".to_string(),
            generator_timeout: Duration::from_secs(5),
            store_backend: StoreBackend::Memory,
            session_signing_key: b"test_session_key_32_bytes_min!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let generator_timeout_secs = match env::var("GENERATOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("GENERATOR_TIMEOUT_SECS", raw))?,
            Err(_) => DEFAULT_GENERATOR_TIMEOUT_SECS,
        };

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StoreBackend::Firestore,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            generator_url: env::var("GENERATOR_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GENERATOR_URL"))?,
            generator_timeout: Duration::from_secs(generator_timeout_secs),
            store_backend,

            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .trim()
                .as_bytes()
                .to_vec(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
