// Failure diagnostics - turns a failure report into advice for the user
//
// Distinguishes:
// - transient network trouble (try again)
// - rate limiting (wait)
// - missing or rejected session cookie (provide a fresh one)
// - a post that simply has nothing to download

use serde::{Deserialize, Serialize};

use crate::resolver::errors::StrategyError;
use crate::resolver::models::FailureReport;

/// Most likely reason every strategy failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureHint {
    /// Timeouts, connection errors or 5xx everywhere
    Transient,

    /// HTTP 429 from at least one endpoint
    RateLimited,

    /// No cookie configured and the site wants a login
    AuthRequired,

    /// A cookie was sent but the site still wants a login
    StaleCredentials,

    /// Requests went through but the post held no media we could find
    NoMedia,
}

impl FailureHint {
    /// Check if retrying the same call later might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::RateLimited)
    }

    /// Check if a (new) session cookie might help
    pub fn cookies_might_help(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::StaleCredentials | Self::NoMedia)
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transient => "Instagram did not respond",
            Self::RateLimited => "Rate limited by Instagram",
            Self::AuthRequired => "Login required",
            Self::StaleCredentials => "Session cookie rejected",
            Self::NoMedia => "No media found",
        }
    }

    /// What the user can do about it
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Transient => {
                "Instagram is not responding. Try:\n\
                 1) Check your internet connection\n\
                 2) Use a proxy (--proxy)\n\
                 3) Try again later"
            }
            Self::RateLimited => {
                "Too many requests from this IP. Try:\n\
                 1) Wait 10-15 minutes\n\
                 2) Use a different IP (proxy/VPN)\n\
                 3) Add a session cookie (set-cookie)"
            }
            Self::AuthRequired => {
                "Instagram wants a logged-in session. Try:\n\
                 1) Copy the Cookie header from a logged-in browser\n\
                 2) Save it with `insta-grab set-cookie '<cookie>'`"
            }
            Self::StaleCredentials => {
                "The saved cookie was not accepted. Try:\n\
                 1) Log in again in the browser\n\
                 2) Save the fresh cookie with `insta-grab set-cookie '<cookie>'`"
            }
            Self::NoMedia => {
                "Could not get media. The post may be private or removed,\n\
                 or the saved cookie may be outdated."
            }
        }
    }
}

/// Classify why every strategy failed.
pub fn diagnose(report: &FailureReport) -> FailureHint {
    let errors: Vec<&StrategyError> = report.attempted.iter().map(|f| &f.error).collect();

    if errors.iter().any(|e| **e == StrategyError::HttpStatus(429)) {
        return FailureHint::RateLimited;
    }

    if errors.iter().any(|e| e.suggests_auth()) {
        return if report.auth_context_present {
            FailureHint::StaleCredentials
        } else {
            FailureHint::AuthRequired
        };
    }

    if !errors.is_empty() && errors.iter().all(|e| e.is_transient()) {
        return FailureHint::Transient;
    }

    if !report.auth_context_present {
        return FailureHint::AuthRequired;
    }

    FailureHint::NoMedia
}
