// Scripted upstream for strategy and resolver tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::config::ResolverConfig;
use super::errors::StrategyError;
use super::extractors::Upstream;
use super::http::{HttpClient, HttpRequest, HttpResponse};

/// What the fake upstream answers for a matched route
#[derive(Debug, Clone)]
pub enum Reply {
    Ok { status: u16, final_url: Option<String>, body: String },
    Fail(StrategyError),
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self::Ok { status, final_url: None, body: body.to_string() }
    }

    pub fn html(body: &str) -> Self {
        Self::Ok { status: 200, final_url: None, body: body.to_string() }
    }

    pub fn redirected(final_url: &str, body: &str) -> Self {
        Self::Ok {
            status: 200,
            final_url: Some(final_url.to_string()),
            body: body.to_string(),
        }
    }

    pub fn timeout() -> Self {
        Self::Fail(StrategyError::Timeout(10_000))
    }
}

/// Every request the fake received, in order
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<HttpRequest>>>);

impl RequestLog {
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.0.lock().unwrap().clone()
    }
}

/// Routes are `(url substring, reply)`, first match wins; unmatched URLs
/// get a 404.
pub struct FakeHttp {
    routes: Vec<(&'static str, Reply)>,
    log: RequestLog,
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, StrategyError> {
        self.log.0.lock().unwrap().push(request.clone());

        let reply = self
            .routes
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::json(404, ""));

        match reply {
            Reply::Ok { status, final_url, body } => Ok(HttpResponse {
                status,
                final_url: final_url.unwrap_or(request.url),
                body,
            }),
            Reply::Fail(err) => Err(err),
        }
    }
}

pub fn upstream_with(routes: Vec<(&'static str, Reply)>) -> (Upstream, RequestLog) {
    let log = RequestLog::default();
    let http = FakeHttp { routes, log: log.clone() };
    (Upstream::new(Arc::new(http), ResolverConfig::default()), log)
}
