// Error types for the media resolver

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use super::models::FailureReport;

/// Why a single strategy attempt produced nothing.
///
/// Always recorded and never fatal: the resolver moves on to the next
/// strategy regardless of which variant it got.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StrategyError {
    /// Request did not complete within the strategy timeout (milliseconds)
    #[error("timed out after {}", seconds(.0))]
    Timeout(u64),

    /// Connection, TLS or body read failure
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// Body was not the JSON/HTML we expected
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON parsed but the post object was not where it should be
    #[error("missing {0} in response")]
    MissingField(&'static str),

    /// Upstream asked for a logged-in session
    #[error("login required")]
    LoginRequired,

    /// Response was understood but held no media
    #[error("no media found")]
    NoMedia,
}

impl StrategyError {
    /// Timeouts, transport errors and 5xx are worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::HttpStatus(code) => *code >= 500,
            _ => false,
        }
    }

    /// Errors that usually mean the session cookie is missing or rejected.
    pub fn suggests_auth(&self) -> bool {
        matches!(
            self,
            Self::LoginRequired | Self::HttpStatus(401) | Self::HttpStatus(403)
        )
    }
}

fn seconds(millis: &u64) -> String {
    format!("{}s", *millis as f64 / 1000.0)
}

impl From<serde_json::Error> for StrategyError {
    fn from(err: serde_json::Error) -> Self {
        StrategyError::Parse(err.to_string())
    }
}

/// Terminal outcome of one `resolve` call.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Input URL has no `/p/`, `/reel/` or `/tv/` shortcode
    #[error("not an Instagram post link: {0}")]
    InvalidReference(String),

    /// Every strategy failed
    #[error("no media found after {} attempts", .0.attempted.len())]
    NoMediaFound(FailureReport),
}

/// Problems reading or writing the persisted cookie config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cookie is empty or too short")]
    InvalidCookie,

    #[error("could not determine a config directory")]
    NoConfigDir,
}
