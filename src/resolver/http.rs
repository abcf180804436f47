// Outbound HTTP for strategies
//
// Strategies build an `HttpRequest` and get back the raw body text, so each
// one owns its own parsing and error isolation. The trait lets tests script
// upstream responses without a network.

use async_trait::async_trait;
use std::time::Duration;

use super::auth::AuthContext;
use super::config::ResolverConfig;
use super::errors::StrategyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound call
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Sent as `application/x-www-form-urlencoded` when present
    pub form: Option<Vec<(String, String)>>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            form: None,
            timeout,
        }
    }

    pub fn post_form(url: impl Into<String>, form: Vec<(String, String)>, timeout: Duration) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            form: Some(form),
            timeout,
        }
    }

    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Add or replace a header (case-insensitive name match)
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw upstream answer
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// URL after redirects
    pub final_url: String,
    pub body: String,
}

impl HttpResponse {
    /// Non-2xx becomes a strategy failure
    pub fn ensure_success(self) -> Result<Self, StrategyError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(StrategyError::HttpStatus(self.status))
        }
    }
}

/// Anything that can carry a strategy's request upstream
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, StrategyError>;
}

/// Headers of the site's own XHR calls. Without them the API endpoints
/// answer with a login wall or an empty body.
pub fn browser_headers(config: &ResolverConfig, auth: Option<&AuthContext>) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = [
        ("User-Agent", config.user_agent.as_str()),
        ("Accept", "*/*"),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("X-IG-App-ID", config.app_id.as_str()),
        ("X-Requested-With", "XMLHttpRequest"),
        ("Sec-Fetch-Site", "same-origin"),
        ("Sec-Fetch-Mode", "cors"),
        ("Sec-Fetch-Dest", "empty"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    headers.push(("Referer".to_string(), format!("{}/", config.base_url)));
    headers.push(("Origin".to_string(), config.base_url.clone()));

    if let Some(auth) = auth {
        headers.push(("Cookie".to_string(), auth.cookie().to_string()));
    }

    headers
}

/// Production client backed by one pooled `reqwest::Client`
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &ResolverConfig) -> Result<Self, StrategyError> {
        let client = Self::builder(config)?
            .build()
            .map_err(|e| StrategyError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn builder(config: &ResolverConfig) -> Result<reqwest::ClientBuilder, StrategyError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = config.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| StrategyError::Network(format!("invalid proxy {proxy_url}: {e}")))?;
            tracing::info!(proxy = %proxy_url, "using proxy for upstream requests");
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }

    fn map_error(err: reqwest::Error, timeout: Duration) -> StrategyError {
        if err.is_timeout() {
            StrategyError::Timeout(timeout.as_millis() as u64)
        } else {
            StrategyError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, StrategyError> {
        let timeout = request.timeout;
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .timeout(timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        tracing::debug!(url = %request.url, status, bytes = body.len(), "upstream response");

        Ok(HttpResponse {
            status,
            final_url,
            body,
        })
    }
}
