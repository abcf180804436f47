// `?__a=1` JSON view of the post page
//
// Cheapest call and the most reliable one with a valid session cookie.
// Answers either in the mobile v1 shape (`items[0]`) or the older web shape
// (`graphql.shortcode_media`).

use async_trait::async_trait;

use super::traits::{non_empty, parse_json_body, MediaStrategy, Upstream};
use crate::resolver::auth::AuthContext;
use crate::resolver::errors::StrategyError;
use crate::resolver::http::{browser_headers, HttpRequest};
use crate::resolver::models::{MediaItem, PostReference};
use crate::resolver::parse::extract_post;

pub struct ApiA1Strategy {
    upstream: Upstream,
}

impl ApiA1Strategy {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    fn build_request(&self, reference: &PostReference, auth: Option<&AuthContext>) -> HttpRequest {
        let config = &self.upstream.config;
        let url = format!("{}?__a=1&__d=dis", config.post_url(reference.shortcode()));
        HttpRequest::get(url, config.api_timeout).headers(browser_headers(config, auth))
    }
}

#[async_trait]
impl MediaStrategy for ApiA1Strategy {
    fn name(&self) -> &'static str {
        "API ?__a=1"
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
        let post = ["/items/0", "/graphql/shortcode_media"]
            .iter()
            .filter_map(|path| json.pointer(path))
            .find(|post| !post.is_null())
            .ok_or(StrategyError::MissingField("items[0] / graphql.shortcode_media"))?;

        non_empty(extract_post(post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::{upstream_with, Reply};

    #[tokio::test]
    async fn test_reads_v1_items() {
        let (upstream, _) = upstream_with(vec![(
            "__a=1",
            Reply::json(200, r#"{"items":[{"image_versions2":{"candidates":[{"url":"https://cdn/a.jpg"}]}}]}"#),
        )]);
        let strategy = ApiA1Strategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        let items = strategy.attempt(&reference, None).await.unwrap();
        assert_eq!(items, vec![MediaItem::image("https://cdn/a.jpg")]);
    }

    #[tokio::test]
    async fn test_reads_graphql_shape_and_sends_cookie() {
        let (upstream, log) = upstream_with(vec![(
            "__a=1",
            Reply::json(200, r#"{"graphql":{"shortcode_media":{"display_url":"https://cdn/g.jpg"}}}"#),
        )]);
        let strategy = ApiA1Strategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/reel/abc/").unwrap();
        let auth = AuthContext::from_raw("sessionid=1234567890").unwrap();

        let items = strategy.attempt(&reference, Some(&auth)).await.unwrap();
        assert_eq!(items.len(), 1);

        let sent = log.requests();
        assert_eq!(sent[0].url, "https://www.instagram.com/p/abc/?__a=1&__d=dis");
        assert_eq!(sent[0].header_value("Cookie"), Some("sessionid=1234567890"));
    }

    #[tokio::test]
    async fn test_null_first_item_falls_back_to_graphql_shape() {
        let (upstream, _) = upstream_with(vec![(
            "__a=1",
            Reply::json(200, r#"{"items":[null],"graphql":{"shortcode_media":{"display_url":"https://cdn/g.jpg"}}}"#),
        )]);
        let strategy = ApiA1Strategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        let items = strategy.attempt(&reference, None).await.unwrap();
        assert_eq!(items, vec![MediaItem::image("https://cdn/g.jpg")]);
    }

    #[tokio::test]
    async fn test_missing_post_object() {
        let (upstream, _) = upstream_with(vec![("__a=1", Reply::json(200, r#"{"items":[]}"#))]);
        let strategy = ApiA1Strategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        let err = strategy.attempt(&reference, None).await.unwrap_err();
        assert!(matches!(err, StrategyError::MissingField(_)));
    }
}
