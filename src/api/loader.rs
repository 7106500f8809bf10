use crate::api::traits::AvailabilitySource;
use crate::api::types::{AvailabilityQuery, AvailabilitySnapshot, LOAD_FAILED_BANNER};
use crate::calendar::horizon_end;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a load finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The newest load; apply it
    Fresh(AvailabilitySnapshot),
    /// Superseded by a later load while in flight; discard it
    Stale { token: u64 },
}

/// Loads a property's blackout dates for the booking window
///
/// Every call takes a new request token. Only the response for the most
/// recent token is reported `Fresh`, so a slow response for a property the
/// user already navigated away from never overwrites a newer one.
/// Failures degrade to an empty snapshot with a banner.
pub struct AvailabilityLoader {
    source: Arc<dyn AvailabilitySource>,
    horizon_months: u32,
    latest: AtomicU64,
}

impl AvailabilityLoader {
    pub fn new(source: Arc<dyn AvailabilitySource>, horizon_months: u32) -> Self {
        Self {
            source,
            horizon_months,
            latest: AtomicU64::new(0),
        }
    }

    /// Query covering today through today + horizon
    pub fn query_for(&self, property_id: &str, today: NaiveDate) -> AvailabilityQuery {
        AvailabilityQuery::new(property_id, today, horizon_end(today, self.horizon_months))
    }

    pub async fn load(&self, property_id: &str, today: NaiveDate) -> LoadOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query_for(property_id, today);
        debug!(
            "Load #{} for property {} from {}",
            token,
            property_id,
            self.source.source_name()
        );

        let snapshot = match self.source.fetch_unavailable(&query).await {
            Ok(intervals) => AvailabilitySnapshot::loaded(intervals),
            Err(e) => {
                warn!("Failed to load availability for {}: {:#}", property_id, e);
                AvailabilitySnapshot::failed(LOAD_FAILED_BANNER)
            }
        };

        if self.latest.load(Ordering::SeqCst) != token {
            info!("Discarding stale load #{} for property {}", token, property_id);
            return LoadOutcome::Stale { token };
        }
        LoadOutcome::Fresh(snapshot)
    }
}
