// Resolver module - Instagram post link to downloadable media URLs

pub mod auth;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod parse;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthContext, AuthProvider, EnvFileAuthProvider, StaticAuthProvider};
pub use config::ResolverConfig;
pub use errors::{ConfigError, ResolveError, StrategyError};
pub use extractors::{diagnose, FailureHint, MediaStrategy, Upstream};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use models::{ExtractionResult, FailureReport, MediaItem, MediaKind, PostReference, StrategyFailure};
pub use orchestrator::MediaResolver;
