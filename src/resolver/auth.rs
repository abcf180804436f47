// Session cookie lookup
//
// Resolution order is part of the provider contract, not the resolver's:
// 1. INSTAGRAM_COOKIE environment variable
// 2. `cookie` field of the JSON config file
// 3. absent (anonymous requests)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::ConfigError;

/// Environment variable that overrides the persisted cookie
pub const COOKIE_ENV: &str = "INSTAGRAM_COOKIE";

/// Placeholder values users leave in a hand-made config file; never treated
/// as a real cookie
pub const COOKIE_PLACEHOLDERS: &[&str] = &[
    "ВСТАВЬ_СЮДА_КУКИ_ИЗ_INSTAGRAM",
    "PASTE_YOUR_INSTAGRAM_COOKIE_HERE",
];

/// Anything shorter cannot hold a session id
const MIN_COOKIE_LEN: usize = 10;

/// A validated `Cookie` header value
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    cookie: String,
}

impl AuthContext {
    /// Returns `None` for blank, too-short or placeholder values.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let cookie = raw.trim();
        if COOKIE_PLACEHOLDERS.contains(&cookie) || cookie.chars().count() < MIN_COOKIE_LEN {
            return None;
        }
        Some(Self {
            cookie: cookie.to_string(),
        })
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// The anti-forgery token the GraphQL POST endpoint wants echoed back
    /// in `X-CSRFToken`.
    pub fn csrf_token(&self) -> Option<&str> {
        lazy_static::lazy_static! {
            static ref CSRF_RE: Regex = Regex::new(r"csrftoken=([^;]+)").unwrap();
        }

        CSRF_RE
            .captures(&self.cookie)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }
}

// Cookies are credentials; keep them out of logs.
impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("len", &self.cookie.len())
            .field("csrf", &self.csrf_token().is_some())
            .finish()
    }
}

/// Supplies the session cookie on demand
pub trait AuthProvider: Send + Sync {
    fn load(&self) -> Option<AuthContext>;
}

/// On-disk config shape: `{ "cookie": "..." }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieConfig {
    #[serde(default)]
    pub cookie: String,
}

impl CookieConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Persist a new cookie, replacing whatever was there.
pub fn save_cookie(path: &Path, cookie: &str) -> Result<(), ConfigError> {
    let auth = AuthContext::from_raw(cookie).ok_or(ConfigError::InvalidCookie)?;
    CookieConfig {
        cookie: auth.cookie,
    }
    .save(path)
}

/// Default location: `<config_dir>/insta-grab/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(custom) = std::env::var("INSTA_GRAB_CONFIG") {
        if !custom.trim().is_empty() {
            return Ok(PathBuf::from(custom));
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("insta-grab").join("config.json"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Environment first, then config file. Re-read on every `load`, so a
/// cookie saved mid-run is picked up by the next resolution.
#[derive(Debug, Clone)]
pub struct EnvFileAuthProvider {
    env_var: String,
    config_path: PathBuf,
}

impl EnvFileAuthProvider {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            env_var: COOKIE_ENV.to_string(),
            config_path: config_path.into(),
        }
    }

    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn from_env(&self) -> Option<AuthContext> {
        std::env::var(&self.env_var)
            .ok()
            .and_then(|raw| AuthContext::from_raw(&raw))
    }

    fn from_file(&self) -> Option<AuthContext> {
        match CookieConfig::load(&self.config_path) {
            Ok(config) => AuthContext::from_raw(&config.cookie),
            Err(e) => {
                tracing::debug!(path = %self.config_path.display(), error = %e, "no usable cookie config");
                None
            }
        }
    }
}

impl AuthProvider for EnvFileAuthProvider {
    fn load(&self) -> Option<AuthContext> {
        self.from_env().or_else(|| self.from_file())
    }
}

/// Fixed credential, or none at all
#[derive(Debug, Clone, Default)]
pub struct StaticAuthProvider(Option<AuthContext>);

impl StaticAuthProvider {
    pub fn new(auth: Option<AuthContext>) -> Self {
        Self(auth)
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl AuthProvider for StaticAuthProvider {
    fn load(&self) -> Option<AuthContext> {
        self.0.clone()
    }
}
