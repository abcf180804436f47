// MediaStrategy trait and helpers shared by the strategy implementations

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::resolver::auth::AuthContext;
use crate::resolver::config::ResolverConfig;
use crate::resolver::errors::StrategyError;
use crate::resolver::http::{HttpClient, HttpResponse};
use crate::resolver::models::{MediaItem, PostReference};

/// One self-contained request + parse technique
#[async_trait]
pub trait MediaStrategy: Send + Sync {
    /// Name of the strategy (for logging and failure reports)
    fn name(&self) -> &'static str;

    /// Issue one upstream request and parse it.
    ///
    /// Must return `Err` rather than an empty list when nothing was found.
    async fn attempt(
        &self,
        reference: &PostReference,
        auth: Option<&AuthContext>,
    ) -> Result<Vec<MediaItem>, StrategyError>;
}

/// Client and configuration every strategy talks to the site through
#[derive(Clone)]
pub struct Upstream {
    pub http: Arc<dyn HttpClient>,
    pub config: Arc<ResolverConfig>,
}

impl Upstream {
    pub fn new(http: Arc<dyn HttpClient>, config: ResolverConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }
}

/// Parse a JSON API body, turning login walls into `LoginRequired`.
pub(crate) fn parse_json_body(response: &HttpResponse) -> Result<Value, StrategyError> {
    let body = response.body.trim_start();
    if body.starts_with('<') {
        // HTML where JSON was expected: login redirect or interstitial
        if response.final_url.contains("/accounts/login") || body.contains("login") {
            return Err(StrategyError::LoginRequired);
        }
        return Err(StrategyError::Parse("expected JSON, got HTML".to_string()));
    }

    let value: Value = serde_json::from_str(body)?;
    if requires_login(&value) {
        return Err(StrategyError::LoginRequired);
    }
    Ok(value)
}

fn requires_login(value: &Value) -> bool {
    if value["require_login"].as_bool() == Some(true) {
        return true;
    }
    value["message"]
        .as_str()
        .map(|m| m.contains("login_required") || m.contains("checkpoint_required"))
        .unwrap_or(false)
}

/// Empty result sets are failures
pub(crate) fn non_empty(items: Vec<MediaItem>) -> Result<Vec<MediaItem>, StrategyError> {
    if items.is_empty() {
        Err(StrategyError::NoMedia)
    } else {
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            final_url: "https://www.instagram.com/p/x/".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_login_markers() {
        let cases = [
            r#"{"require_login": true, "status": "fail"}"#,
            r#"{"message": "login_required", "status": "fail"}"#,
            r#"{"message": "checkpoint_required"}"#,
            "<!DOCTYPE html><html><title>Login • Instagram</title>login</html>",
        ];
        for body in cases {
            assert_eq!(parse_json_body(&response(body)).unwrap_err(), StrategyError::LoginRequired, "{body}");
        }
    }

    #[test]
    fn test_html_without_login_is_parse_error() {
        let err = parse_json_body(&response("<html><body>oops</body></html>")).unwrap_err();
        assert!(matches!(err, StrategyError::Parse(_)));
    }

    #[test]
    fn test_plain_json_passes() {
        let value = parse_json_body(&response(r#"{"items": []}"#)).unwrap();
        assert!(value["items"].is_array());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_json_body(&response("{nope")).unwrap_err(),
            StrategyError::Parse(_)
        ));
    }
}
