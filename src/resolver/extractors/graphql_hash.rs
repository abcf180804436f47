// Legacy GraphQL GET keyed by `query_hash`

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use super::traits::{non_empty, parse_json_body, MediaStrategy, Upstream};
use crate::resolver::auth::AuthContext;
use crate::resolver::errors::StrategyError;
use crate::resolver::http::{browser_headers, HttpRequest};
use crate::resolver::models::{MediaItem, PostReference};
use crate::resolver::parse::extract_post;

pub struct GraphQlHashStrategy {
    upstream: Upstream,
}

impl GraphQlHashStrategy {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    fn build_request(
        &self,
        reference: &PostReference,
        auth: Option<&AuthContext>,
    ) -> Result<HttpRequest, StrategyError> {
        let config = &self.upstream.config;
        let variables = json!({ "shortcode": reference.shortcode() }).to_string();
        let url = Url::parse_with_params(
            &format!("{}/graphql/query/", config.base_url),
            &[
                ("query_hash", config.query_hash.as_str()),
                ("variables", variables.as_str()),
            ],
        )
        .map_err(|e| StrategyError::Network(format!("bad endpoint URL: {e}")))?;

        Ok(HttpRequest::get(url.as_str(), config.api_timeout).headers(browser_headers(config, auth)))
    }
}

#[async_trait]
impl MediaStrategy for GraphQlHashStrategy {
    fn name(&self) -> &'static str {
        "GraphQL v1"
    }

    async fn attempt(
        &self,
        reference: &PostReference,
        auth: Option<&AuthContext>,
    ) -> Result<Vec<MediaItem>, StrategyError> {
        let request = self.build_request(reference, auth)?;
        let response = self.upstream.http.send(request).await?.ensure_success()?;

        let json = parse_json_body(&response)?;
        let post = json
            .pointer("/data/shortcode_media")
            .filter(|post| !post.is_null())
            .ok_or(StrategyError::MissingField("data.shortcode_media"))?;

        non_empty(extract_post(post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::{upstream_with, Reply};

    #[tokio::test]
    async fn test_query_string_and_sidecar() {
        let (upstream, log) = upstream_with(vec![(
            "query_hash",
            Reply::json(200, r#"{"data":{"shortcode_media":{"edge_sidecar_to_children":{"edges":[
                {"node":{"display_url":"https://cdn/1.jpg"}},
                {"node":{"display_url":"https://cdn/2.jpg"}}
            ]}}}}"#),
        )]);
        let strategy = GraphQlHashStrategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/Q_w-e/").unwrap();

        let items = strategy.attempt(&reference, None).await.unwrap();
        assert_eq!(items.len(), 2);

        let sent = Url::parse(&log.requests()[0].url).unwrap();
        let params: Vec<(String, String)> = sent.query_pairs().into_owned().collect();
        assert_eq!(params[0], ("query_hash".to_string(), "b3055c01b4b222b8a47dc12b090e4e64".to_string()));
        assert_eq!(params[1], ("variables".to_string(), r#"{"shortcode":"Q_w-e"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_null_media_is_missing_field() {
        let (upstream, _) = upstream_with(vec![(
            "query_hash",
            Reply::json(200, r#"{"data":{"shortcode_media":null},"status":"ok"}"#),
        )]);
        let strategy = GraphQlHashStrategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        let err = strategy.attempt(&reference, None).await.unwrap_err();
        assert_eq!(err, StrategyError::MissingField("data.shortcode_media"));
    }
}
