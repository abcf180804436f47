// Rendered post page, parsed for Open Graph tags and embedded JSON
//
// Last resort: heaviest request, and without a cookie it often sees only
// the cover image. Works anonymously for most public posts.

use async_trait::async_trait;

use super::traits::{non_empty, MediaStrategy, Upstream};
use crate::resolver::auth::AuthContext;
use crate::resolver::errors::StrategyError;
use crate::resolver::http::{browser_headers, HttpRequest};
use crate::resolver::models::{MediaItem, PostReference};
use crate::resolver::parse::{extract_page, is_login_page};

const DOCUMENT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

pub struct HtmlPageStrategy {
    upstream: Upstream,
}

impl HtmlPageStrategy {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }

    fn build_request(&self, reference: &PostReference, auth: Option<&AuthContext>) -> HttpRequest {
        let config = &self.upstream.config;
        HttpRequest::get(config.post_url(reference.shortcode()), config.page_timeout)
            .headers(browser_headers(config, auth))
            .header("Accept", DOCUMENT_ACCEPT)
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Dest", "document")
    }
}

#[async_trait]
impl MediaStrategy for HtmlPageStrategy {
    fn name(&self) -> &'static str {
        "HTML Parser"
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

        let items = extract_page(&response.body);
        if items.is_empty() && is_login_page(&response.final_url, &response.body) {
            return Err(StrategyError::LoginRequired);
        }

        non_empty(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::{upstream_with, Reply};

    #[tokio::test]
    async fn test_document_headers() {
        let (upstream, log) = upstream_with(vec![(
            "/p/",
            Reply::html(r#"<meta property="og:image" content="https://cdn/c.jpg" />"#),
        )]);
        let strategy = HtmlPageStrategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        let items = strategy.attempt(&reference, None).await.unwrap();
        assert_eq!(items, vec![MediaItem::image("https://cdn/c.jpg")]);

        let sent = &log.requests()[0];
        assert_eq!(sent.url, "https://www.instagram.com/p/abc/");
        assert_eq!(sent.header_value("Accept"), Some(DOCUMENT_ACCEPT));
        assert_eq!(sent.header_value("Sec-Fetch-Mode"), Some("navigate"));
        assert_eq!(sent.header_value("Sec-Fetch-Dest"), Some("document"));
    }

    #[tokio::test]
    async fn test_login_redirect() {
        let (upstream, _) = upstream_with(vec![(
            "/p/",
            Reply::redirected("https://www.instagram.com/accounts/login/?next=%2Fp%2Fabc%2F", "<html></html>"),
        )]);
        let strategy = HtmlPageStrategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        assert_eq!(strategy.attempt(&reference, None).await.unwrap_err(), StrategyError::LoginRequired);
    }

    #[tokio::test]
    async fn test_server_error() {
        let (upstream, _) = upstream_with(vec![("/p/", Reply::json(503, "busy"))]);
        let strategy = HtmlPageStrategy::new(upstream);
        let reference = PostReference::parse("https://www.instagram.com/p/abc/").unwrap();

        assert_eq!(strategy.attempt(&reference, None).await.unwrap_err(), StrategyError::HttpStatus(503));
    }
}
