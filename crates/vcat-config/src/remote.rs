//! Upstream vPIC API configuration.

use serde::{Deserialize, Serialize};

fn default_makes_url() -> String {
    "https://vpic.nhtsa.dot.gov/api/vehicles/getallmakes?format=xml".to_string()
}

fn default_types_url() -> String {
    "https://vpic.nhtsa.dot.gov/api/vehicles/GetVehicleTypesForMakeId".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "vcat/0.1".to_string()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    100
}

fn default_retry_statuses() -> Vec<u16> {
    vec![429, 403]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Endpoint returning the full make list as XML.
    #[serde(default = "default_makes_url")]
    pub makes_url: String,

    /// Base endpoint for per-make vehicle types; the make id and
    /// `?format=xml` are appended per request.
    #[serde(default = "default_types_url")]
    pub types_url: String,

    /// Per-request timeout enforced by the HTTP client, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            makes_url: default_makes_url(),
            types_url: default_types_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
        }
    }
}

impl RemoteConfig {
    /// URL for the vehicle types of a single make.
    #[must_use]
    pub fn types_url_for(&self, make_id: &str) -> String {
        format!("{}/{make_id}?format=xml", self.types_url.trim_end_matches('/'))
    }
}

/// Retry behaviour for upstream requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles with every further retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// HTTP statuses that trigger a retry. Everything else fails at once.
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            retry_statuses: default_retry_statuses(),
        }
    }
}
