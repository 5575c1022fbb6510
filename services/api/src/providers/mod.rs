//! Third-party data providers
//!
//! Each provider performs its own network round trip with a bounded timeout
//! and a single retry, then degrades to deterministic, non-empty fallback
//! data. A provider never surfaces an upstream error to its caller; failures
//! are only logged for operators.

pub mod insight;
pub mod memes;
pub mod news;
pub mod prices;

use anyhow::Result;
use std::time::Duration;

use crate::config::ProviderConfig;

/// Bound on every outbound third-party call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client and credentials for all four providers
#[derive(Clone)]
pub struct Providers {
    pub(crate) client: reqwest::Client,
    pub(crate) config: ProviderConfig,
}

impl Providers {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, config })
    }
}
