// Resolver configuration

use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Public web-app id the site expects in `X-IG-App-ID`
pub const DEFAULT_APP_ID: &str = "936619743392459";

/// Persisted query for the POST GraphQL endpoint. Rotates every few weeks,
/// hence the env override.
pub const DEFAULT_DOC_ID: &str = "8845758582119845";

/// Legacy GET GraphQL query hash
pub const DEFAULT_QUERY_HASH: &str = "b3055c01b4b222b8a47dc12b090e4e64";

pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

/// Configuration shared by every strategy
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Scheme + host of the upstream site, without trailing slash
    pub base_url: String,
    /// Browser User-Agent sent with every request
    pub user_agent: String,
    /// `X-IG-App-ID` header value
    pub app_id: String,
    /// `doc_id` form field for the GraphQL POST strategy
    pub doc_id: String,
    /// `query_hash` for the GraphQL GET strategy
    pub query_hash: String,
    /// Timeout for structured API calls
    pub api_timeout: Duration,
    /// Timeout for the full page fetch
    pub page_timeout: Duration,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            doc_id: DEFAULT_DOC_ID.to_string(),
            query_hash: DEFAULT_QUERY_HASH.to_string(),
            api_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(12),
            proxy: None,
        }
    }
}

impl ResolverConfig {
    /// Defaults, then `INSTAGRAM_DOC_ID`, `INSTAGRAM_QUERY_HASH` and
    /// `INSTA_GRAB_PROXY` when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(doc_id) = non_empty("INSTAGRAM_DOC_ID") {
            config.doc_id = doc_id;
        }
        if let Some(hash) = non_empty("INSTAGRAM_QUERY_HASH") {
            config.query_hash = hash;
        }
        config.proxy = non_empty("INSTA_GRAB_PROXY");
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    pub fn with_query_hash(mut self, query_hash: impl Into<String>) -> Self {
        self.query_hash = query_hash.into();
        self
    }

    pub fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// `https://www.instagram.com/p/<shortcode>/`
    pub fn post_url(&self, shortcode: &str) -> String {
        format!("{}/p/{}/", self.base_url, shortcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.api_timeout, Duration::from_secs(10));
        assert_eq!(config.page_timeout, Duration::from_secs(12));
        assert_eq!(config.post_url("abc"), "https://www.instagram.com/p/abc/");
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = ResolverConfig::from_vars(vars(&[
            ("INSTAGRAM_DOC_ID", "1111"),
            ("INSTAGRAM_QUERY_HASH", " abcd "),
            ("INSTA_GRAB_PROXY", "socks5://127.0.0.1:1080"),
        ]));
        assert_eq!(config.doc_id, "1111");
        assert_eq!(config.query_hash, "abcd");
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let config = ResolverConfig::from_vars(vars(&[
            ("INSTAGRAM_DOC_ID", ""),
            ("INSTAGRAM_QUERY_HASH", "   "),
            ("INSTA_GRAB_PROXY", "\t"),
        ]));
        assert_eq!(config.doc_id, DEFAULT_DOC_ID);
        assert_eq!(config.query_hash, DEFAULT_QUERY_HASH);
        assert_eq!(config.proxy, None);

        let config = ResolverConfig::from_vars(vars(&[]));
        assert_eq!(config.doc_id, DEFAULT_DOC_ID);
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("INSTAGRAM_QUERY_HASH", "from_process_env");
        let config = ResolverConfig::from_env();
        std::env::remove_var("INSTAGRAM_QUERY_HASH");

        assert_eq!(config.query_hash, "from_process_env");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ResolverConfig::default().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.post_url("abc"), "http://127.0.0.1:9000/p/abc/");
    }
}
