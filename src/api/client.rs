//! Backend API client.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::state::{
    AssistantContext, OpportunityBoard, PhaseStatus, Statistics, WagerRecord, WagerRequest,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Logical operations consumed from the backend.
///
/// The four retrieval operations are idempotent reads; `send_message`
/// triggers assistant computation on the backend and is not.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Exchange one chat message, optionally carrying the context snapshot.
    async fn send_message(&self, text: &str, context: Option<AssistantContext>)
    -> Result<String>;

    /// Fetch up to `limit` raw opportunity records plus suggested multiples.
    async fn get_opportunities(&self, limit: usize) -> Result<OpportunityBoard>;

    /// Fetch aggregate statistics.
    async fn get_statistics(&self) -> Result<Statistics>;

    /// Fetch the current phase status.
    async fn get_current_phase(&self) -> Result<PhaseStatus>;

    /// Fetch the `limit` most recent wagers.
    async fn get_history(&self, limit: usize) -> Result<Vec<WagerRecord>>;

    /// Register a tracked wager. Returns the backend's confirmation message.
    async fn register_wager(&self, request: &WagerRequest) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RegisterReply {
    #[allow(dead_code)]
    bet_id: String,
    message: String,
}

/// HTTP binding of [`BackendApi`].
pub struct HttpBackend {
    /// Configuration.
    config: ApiConfig,
    /// Shared HTTP client with the configured request timeout.
    http: reqwest::Client,
    /// Rate limiter state.
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl HttpBackend {
    /// Create a new HTTP backend client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            rate_limiter: Arc::new(RwLock::new(RateLimiter::new(config.rate_limit))),
            config,
        })
    }

    /// Test connection to the backend.
    pub async fn test_connection(&self) -> Result<bool> {
        self.rate_limit().await;
        let response = self.http.get(self.url("/")).send().await?;
        Ok(response.status().is_success())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map non-success statuses to [`Error::Backend`].
    fn check(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Error::backend(format!(
                "{path} returned {}",
                response.status()
            )))
        }
    }

    /// Apply rate limiting.
    async fn rate_limit(&self) {
        let mut limiter = self.rate_limiter.write().await;
        limiter.wait().await;
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn send_message(
        &self,
        text: &str,
        context: Option<AssistantContext>,
    ) -> Result<String> {
        self.rate_limit().await;

        let body = serde_json::json!({
            "message": text,
            "context": context,
        });

        let response = self.http.post(self.url("/chat")).json(&body).send().await?;
        let reply: ChatReply = Self::check("/chat", response)?.json().await?;
        Ok(reply.message)
    }

    async fn get_opportunities(&self, limit: usize) -> Result<OpportunityBoard> {
        self.rate_limit().await;

        let response = self
            .http
            .get(self.url("/opportunities"))
            .query(&[("limit", limit)])
            .send()
            .await?;

        Ok(Self::check("/opportunities", response)?.json().await?)
    }

    async fn get_statistics(&self) -> Result<Statistics> {
        self.rate_limit().await;

        let response = self.http.get(self.url("/statistics")).send().await?;
        Ok(Self::check("/statistics", response)?.json().await?)
    }

    async fn get_current_phase(&self) -> Result<PhaseStatus> {
        self.rate_limit().await;

        let response = self.http.get(self.url("/phase")).send().await?;
        Ok(Self::check("/phase", response)?.json().await?)
    }

    async fn get_history(&self, limit: usize) -> Result<Vec<WagerRecord>> {
        self.rate_limit().await;

        let response = self
            .http
            .get(self.url("/history"))
            .query(&[("limit", limit)])
            .send()
            .await?;

        let raw: Vec<super::RawWagerRecord> = Self::check("/history", response)?.json().await?;
        Ok(raw
            .into_iter()
            .map(super::DataConverter::convert_wager)
            .collect())
    }

    async fn register_wager(&self, request: &WagerRequest) -> Result<String> {
        self.rate_limit().await;

        let response = self
            .http
            .post(self.url("/register-bet"))
            .json(request)
            .send()
            .await?;

        let reply: RegisterReply = Self::check("/register-bet", response)?.json().await?;
        Ok(reply.message)
    }
}

/// Simple rate limiter enforcing a minimum gap between requests.
struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    fn new(requests_per_second: u32) -> Self {
        Self {
            min_interval: Duration::from_secs(1) / requests_per_second.max(1),
            last_request: None,
        }
    }

    async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
