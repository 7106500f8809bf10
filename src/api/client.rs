use crate::api::traits::AvailabilitySource;
use crate::api::types::{parse_response, AvailabilityQuery};
use crate::config::ApiConfig;
use crate::models::UnavailableInterval;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP client for the rental API's availability endpoint
pub struct AvailabilityClient {
    client: Client,
    base_url: Url,
}

impl AvailabilityClient {
    /// Create a client for the API rooted at `config.base_url`
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", config.base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// `{base}/properties/{id}/check_availability/`
    fn availability_url(&self, property_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["properties", property_id, "check_availability", ""]);
        Ok(url)
    }
}

#[async_trait]
impl AvailabilitySource for AvailabilityClient {
    async fn fetch_unavailable(&self, query: &AvailabilityQuery) -> Result<Vec<UnavailableInterval>> {
        let url = self.availability_url(&query.property_id)?;
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .query(&query.query_pairs())
            .send()
            .await
            .context("Failed to fetch availability")?;

        if !response.status().is_success() {
            warn!("Availability endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch availability: {}", response.status());
        }

        let body = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of availability", body.len());

        let intervals = parse_response(&body);
        info!(
            "Property {}: {} unavailable intervals between {} and {}",
            query.property_id,
            intervals.len(),
            query.start_date,
            query.end_date
        );
        Ok(intervals)
    }

    fn source_name(&self) -> &'static str {
        "rental-api"
    }
}
