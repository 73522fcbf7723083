//! `AppConfig` struct and TOML loading.

use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rgl_api::{RateLimitConfig, RglClientBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Request pacing settings.
    #[serde(default)]
    pub rate_limit: RateLimitSection,
}

/// `[client]` table. Unset keys keep the library defaults.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.rgl.gg/v0/`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// `User-Agent` header value.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Timeout for one HTTP exchange, in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// `[rate_limit]` table.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RateLimitSection {
    /// Bucket size and initial burst.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Seconds between token refills.
    #[serde(default)]
    pub refill_interval_secs: Option<u64>,
}

impl RateLimitSection {
    /// Merges the configured values over [`RateLimitConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` or `refill_interval_secs` is zero.
    pub fn to_rate_limit(&self) -> Result<RateLimitConfig> {
        let defaults = RateLimitConfig::default();

        let capacity = match self.capacity {
            Some(raw) => NonZeroU32::new(raw).context("rate_limit.capacity must be at least 1")?,
            None => defaults.capacity,
        };
        let refill_interval = match self.refill_interval_secs {
            Some(0) => anyhow::bail!("rate_limit.refill_interval_secs must be at least 1"),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.refill_interval,
        };

        Ok(RateLimitConfig::new(capacity, refill_interval))
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Applies the configured overrides to a client builder.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the rate-limit
    /// values are zero.
    pub fn apply(&self, mut builder: RglClientBuilder) -> Result<RglClientBuilder> {
        if let Some(ref raw) = self.client.base_url {
            let url = Url::parse(raw).with_context(|| format!("invalid client.base_url: {raw}"))?;
            builder = builder.base_url(url);
        }
        if let Some(ref ua) = self.client.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = self.client.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        Ok(builder.rate_limit(self.rate_limit.to_rate_limit()?))
    }
}
