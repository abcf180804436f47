// Common data models for the resolver

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::StrategyError;

/// Kind of a downloadable asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// One downloadable asset of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Absolute http(s) URL, unique within a result set
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Poster frame for videos
    #[serde(rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl MediaItem {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Image,
            thumbnail_url: None,
        }
    }

    pub fn video(url: impl Into<String>, thumbnail_url: Option<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Video,
            thumbnail_url,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Shortcode identifying a single post, e.g. `C3xYz_12-ab` in
/// `https://www.instagram.com/reel/C3xYz_12-ab/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostReference(String);

impl PostReference {
    /// Extract the shortcode from a post URL.
    ///
    /// Returns `None` when the URL has no `/p/`, `/reel/` or `/tv/` segment on
    /// an instagram.com host. That is an input error for the caller to report,
    /// not something to resolve.
    pub fn parse(url: &str) -> Option<Self> {
        lazy_static::lazy_static! {
            static ref SHORTCODE_RE: Regex =
                Regex::new(r"instagram\.com/(?:p|reel|tv)/([A-Za-z0-9_-]+)").unwrap();
        }

        SHORTCODE_RE
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn shortcode(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strategy that did not produce media, with its cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub error: StrategyError,
}

impl StrategyFailure {
    /// Human-readable `"<strategy>: <cause>"` line
    pub fn message(&self) -> String {
        format!("{}: {}", self.strategy, self.error)
    }
}

/// Successful resolution
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Name of the strategy that produced the items
    pub strategy: &'static str,
    /// Non-empty, no duplicate URLs
    pub items: Vec<MediaItem>,
    /// Strategies that failed before the successful one, in order
    pub failures: Vec<StrategyFailure>,
}

/// Everything that went wrong when no strategy succeeded
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub shortcode: String,
    pub attempted: Vec<StrategyFailure>,
    pub auth_context_present: bool,
}

impl FailureReport {
    pub fn messages(&self) -> Vec<String> {
        self.attempted.iter().map(StrategyFailure::message).collect()
    }
}
