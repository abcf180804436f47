// GraphQL POST with a persisted `doc_id`
//
// The answer shape changes with every doc_id rotation, so the whole
// payload goes through the deep scan instead of a fixed schema.

use async_trait::async_trait;
use serde_json::json;

use super::traits::{non_empty, parse_json_body, MediaStrategy, Upstream};
use crate::resolver::auth::AuthContext;
use crate::resolver::errors::StrategyError;
use crate::resolver::http::{browser_headers, HttpRequest};
use crate::resolver::models::{MediaItem, PostReference};
use crate::resolver::parse::{scan, MediaCollector};

/// Sent when the cookie carries no csrftoken; the endpoint still answers
/// public posts.
const MISSING_CSRF: &str = "missing";

pub struct GraphQlDocStrategy {
    upstream: Upstream,
}

impl GraphQlDocStrategy {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    fn build_request(&self, reference: &PostReference, auth: Option<&AuthContext>) -> HttpRequest {
        let config = &self.upstream.config;
        let variables = json!({
            "shortcode": reference.shortcode(),
            "fetch_comment_count": 0,
        });
        let form = vec![
            ("doc_id".to_string(), config.doc_id.clone()),
            ("variables".to_string(), variables.to_string()),
        ];
        let csrf = auth
            .and_then(AuthContext::csrf_token)
            .unwrap_or(MISSING_CSRF);

        HttpRequest::post_form(format!("{}/graphql/query", config.base_url), form, config.api_timeout)
            .headers(browser_headers(config, auth))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("X-CSRFToken", csrf)
    }
}

#[async_trait]
impl MediaStrategy for GraphQlDocStrategy {
    fn name(&self) -> &'static str {
        "GraphQL v2"
    }

    async fn attempt(
        &self,
        reference: &PostReference,
        auth: Option<&AuthContext>,
    ) -> Result<Vec<MediaItem>, StrategyError> {
        let response = self
            .upstream
            .http
            .send(self.build_request(reference, auth))
            .await?
            .ensure_success()?;

        let json = parse_json_body(&response)?;
        let mut collector = MediaCollector::new();
        scan(&json, &mut collector);

        non_empty(collector.into_items())
    }
}
