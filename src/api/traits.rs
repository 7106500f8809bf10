use crate::api::types::AvailabilityQuery;
use crate::models::UnavailableInterval;
use anyhow::Result;
use async_trait::async_trait;

/// Anything that can list a property's blackout intervals
/// The HTTP client is the production source; tests plug in fakes
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Fetch unavailable intervals overlapping the query window
    async fn fetch_unavailable(&self, query: &AvailabilityQuery) -> Result<Vec<UnavailableInterval>>;

    /// Get the name of the availability source
    fn source_name(&self) -> &'static str;
}
