// Resolver with ordered strategy fallback

use std::sync::Arc;
use tracing::{info, warn};

use super::auth::{AuthContext, AuthProvider};
use super::config::ResolverConfig;
use super::errors::{ResolveError, StrategyError};
use super::extractors::{default_chain, MediaStrategy, Upstream};
use super::http::ReqwestClient;
use super::models::{ExtractionResult, FailureReport, PostReference, StrategyFailure};

/// Tries each strategy in order until one yields media.
///
/// No retries, no locking: concurrent `resolve` calls for the same post
/// each run their own chain.
pub struct MediaResolver {
    strategies: Vec<Box<dyn MediaStrategy>>,
    auth: Arc<dyn AuthProvider>,
}

impl MediaResolver {
    /// Resolver with no strategies; add them with `add_strategy`.
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            strategies: Vec::new(),
            auth,
        }
    }

    /// Standard four-strategy chain over the given upstream
    pub fn with_default_chain(upstream: Upstream, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            strategies: default_chain(&upstream),
            auth,
        }
    }

    /// Standard chain talking to the real site through `reqwest`
    pub fn from_config(config: ResolverConfig, auth: Arc<dyn AuthProvider>) -> Result<Self, StrategyError> {
        let http = ReqwestClient::new(&config)?;
        Ok(Self::with_default_chain(Upstream::new(Arc::new(http), config), auth))
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn MediaStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Whether the auth provider currently has a usable cookie
    pub fn has_auth(&self) -> bool {
        self.auth.load().is_some()
    }

    /// Parse `url`, load the cookie from the provider, and resolve.
    pub async fn resolve_url(&self, url: &str) -> Result<ExtractionResult, ResolveError> {
        let reference = PostReference::parse(url)
            .ok_or_else(|| ResolveError::InvalidReference(url.to_string()))?;
        let auth = self.auth.load();
        self.resolve(&reference, auth.as_ref()).await
    }

    /// Run the chain for one post.
    pub async fn resolve(
        &self,
        reference: &PostReference,
        auth: Option<&AuthContext>,
    ) -> Result<ExtractionResult, ResolveError> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            info!(shortcode = %reference, strategy = strategy.name(), "trying strategy");

            let outcome = match strategy.attempt(reference, auth).await {
                Ok(items) if items.is_empty() => Err(StrategyError::NoMedia),
                other => other,
            };

            match outcome {
                Ok(items) => {
                    info!(
                        shortcode = %reference,
                        strategy = strategy.name(),
                        items = items.len(),
                        "strategy succeeded"
                    );
                    return Ok(ExtractionResult {
                        strategy: strategy.name(),
                        items,
                        failures,
                    });
                }
                Err(error) => {
                    warn!(shortcode = %reference, strategy = strategy.name(), %error, "strategy failed");
                    failures.push(StrategyFailure {
                        strategy: strategy.name(),
                        error,
                    });
                }
            }
        }

        Err(ResolveError::NoMediaFound(FailureReport {
            shortcode: reference.shortcode().to_string(),
            attempted: failures,
            auth_context_present: auth.is_some(),
        }))
    }
}
