use std::time::Duration;

use super::remote::{RemoteError, RemoteResult};

/// Default request timeout applied to every remote call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing how to reach the content store.
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Base URL of the store API, e.g. `http://localhost:3001/api`.
    pub base_url: String,
    /// Per-request timeout; an elapsed timeout counts as any other
    /// transport failure.
    pub timeout: Duration,
}

impl FacadeConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a configuration by reading the expected environment
    /// variables (`PARTY_ZONE_API_URL` required,
    /// `PARTY_ZONE_API_TIMEOUT_MS` optional).
    pub fn from_env() -> RemoteResult<Self> {
        let base_url =
            std::env::var("PARTY_ZONE_API_URL").map_err(|_| RemoteError::MissingEnvVar {
                var: "PARTY_ZONE_API_URL",
            })?;

        let mut config = Self::new(base_url);

        if let Some(timeout_ms) = std::env::var("PARTY_ZONE_API_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config = config.with_timeout(Duration::from_millis(timeout_ms));
        }

        Ok(config)
    }
}
