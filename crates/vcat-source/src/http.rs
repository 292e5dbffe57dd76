//! Retrying HTTP client for the vPIC API.
//!
//! [`HttpTransport`] is the seam between the retry loop and the network:
//! production code uses `reqwest::Client`, tests script responses.

use std::future::Future;
use std::time::Duration;

use vcat_config::RemoteConfig;

use crate::error::SourceError;
use crate::retry::RetryPolicy;

/// Issues a single GET request.
pub trait HttpTransport: Send + Sync + 'static {
    /// Send one GET request to `url`.
    ///
    /// Errors are transport failures only; HTTP error statuses come back as
    /// a normal response.
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<reqwest::Response, SourceError>> + Send;
}

impl HttpTransport for reqwest::Client {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<reqwest::Response, SourceError>> + Send {
        let pending = self.get(url).send();
        let url = url.to_string();
        async move { pending.await.map_err(|e| remote_call(&url, &e)) }
    }
}

/// HTTP GET wrapped in a [`RetryPolicy`].
pub struct RemoteClient<T = reqwest::Client> {
    transport: T,
    policy: RetryPolicy,
}

impl RemoteClient {
    /// Build a `reqwest`-backed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the underlying client cannot be
    /// built (e.g. TLS backend initialisation fails).
    pub fn from_config(config: &RemoteConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self::new(http, RetryPolicy::from(&config.retry)))
    }
}

impl<T: HttpTransport> RemoteClient<T> {
    pub const fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and return the response body.
    ///
    /// Retries with backoff while the status is retryable and attempts remain.
    ///
    /// # Errors
    ///
    /// - [`SourceError::RemoteCall`] on transport failure (never retried).
    /// - [`SourceError::RemoteStatus`] on a non-retryable status, or a
    ///   retryable one once attempts are exhausted.
    pub async fn get(&self, url: &str) -> Result<String, SourceError> {
        let mut attempt = 1;
        loop {
            let response = self.transport.fetch(url).await?;
            let status = response.status();

            if status.is_success() {
                return response.text().await.map_err(|e| remote_call(url, &e));
            }

            let code = status.as_u16();
            if !self.policy.should_retry(code, attempt) {
                if self.policy.is_retryable(code) {
                    tracing::warn!(url, status = code, attempts = attempt, "retries exhausted");
                }
                return Err(SourceError::RemoteStatus {
                    url: url.to_string(),
                    status: code,
                    attempts: attempt,
                });
            }

            let delay = self.policy.delay_for(attempt);
            tracing::warn!(
                url,
                status = code,
                attempt,
                ?delay,
                retry_after = ?parse_retry_after(&response),
                "upstream throttled request, retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

fn remote_call(url: &str, error: &reqwest::Error) -> SourceError {
    SourceError::RemoteCall {
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// `Retry-After` in seconds, when the upstream sends one.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}
