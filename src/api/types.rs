use crate::models::UnavailableInterval;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Wire format of dates in availability requests
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Banner shown when blackout dates could not be loaded
pub const LOAD_FAILED_BANNER: &str =
    "We couldn't load this property's availability. Some dates shown as free may already be booked.";

/// Parameters of one `check_availability` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub property_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AvailabilityQuery {
    pub fn new(property_id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            property_id: property_id.into(),
            start_date,
            end_date,
        }
    }

    /// Query string pairs, dates as `YYYY-MM-DD`
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start_date.format(API_DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(API_DATE_FORMAT).to_string()),
        ]
    }
}

/// Label used when the API omits `booking_type`
pub const UNKNOWN_BOOKING_TYPE: &str = "unknown";

/// One blackout entry as the API sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInterval {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub booking_type: Option<String>,
}

impl ApiInterval {
    fn parse(&self) -> Option<UnavailableInterval> {
        let start_date = parse_api_date(self.start_date.as_deref()?)?;
        let end_date = parse_api_date(self.end_date.as_deref()?)?;
        if end_date < start_date {
            return None;
        }
        Some(UnavailableInterval {
            start_date,
            end_date,
            booking_type: self
                .booking_type
                .clone()
                .unwrap_or_else(|| UNKNOWN_BOOKING_TYPE.to_string()),
        })
    }
}

/// Body of `GET /properties/{id}/check_availability/`
///
/// Entries stay raw JSON so one unreadable row is skipped on its own
/// instead of failing the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub all_unavailable_dates: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub unavailable_dates: Option<Vec<serde_json::Value>>,
}

impl AvailabilityResponse {
    /// Prefers `all_unavailable_dates`, then `unavailable_dates`, else nothing
    pub fn into_intervals(self) -> Vec<UnavailableInterval> {
        let raw = self
            .all_unavailable_dates
            .or(self.unavailable_dates)
            .unwrap_or_default();

        raw.into_iter()
            .filter_map(|entry| {
                let parsed = serde_json::from_value::<ApiInterval>(entry.clone())
                    .ok()
                    .and_then(|interval| interval.parse());
                if parsed.is_none() {
                    warn!("Skipping malformed interval {}", entry);
                }
                parsed
            })
            .collect()
    }
}

/// Parses a response body; anything unreadable yields no intervals
pub fn parse_response(body: &str) -> Vec<UnavailableInterval> {
    match serde_json::from_str::<AvailabilityResponse>(body) {
        Ok(response) => response.into_intervals(),
        Err(e) => {
            warn!("Unreadable availability payload: {}", e);
            Vec::new()
        }
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, API_DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Result of one load, ready to hand to the calendar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    pub intervals: Vec<UnavailableInterval>,
    /// Set when loading failed and the calendar is showing a degraded view
    pub banner: Option<String>,
}

impl AvailabilitySnapshot {
    pub fn loaded(intervals: Vec<UnavailableInterval>) -> Self {
        Self {
            intervals,
            banner: None,
        }
    }

    pub fn failed(banner: impl Into<String>) -> Self {
        Self {
            intervals: Vec::new(),
            banner: Some(banner.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.banner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_unavailable_dates_preferred() {
        let body = r#"{
            "all_unavailable_dates": [
                {"start_date": "2024-06-15", "end_date": "2024-06-18", "booking_type": "booking"}
            ],
            "unavailable_dates": [
                {"start_date": "2024-07-01", "end_date": "2024-07-02", "booking_type": "booking"}
            ]
        }"#;
        let intervals = parse_response(body);
        assert_eq!(
            intervals,
            vec![UnavailableInterval::new(date(2024, 6, 15), date(2024, 6, 18), "booking")]
        );
    }

    #[test]
    fn test_falls_back_to_unavailable_dates() {
        let body = r#"{"unavailable_dates": [
            {"start_date": "2024-07-01", "end_date": "2024-07-02", "booking_type": "owner_block"}
        ]}"#;
        let intervals = parse_response(body);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].booking_type, "owner_block");
    }

    #[test]
    fn test_missing_or_malformed_payload_is_empty() {
        assert!(parse_response("{}").is_empty());
        assert!(parse_response("not json").is_empty());
        assert!(parse_response(r#"{"all_unavailable_dates": null}"#).is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let body = r#"{"all_unavailable_dates": [
            {"start_date": "2024-06-15", "end_date": "2024-06-18"},
            {"start_date": "soon", "end_date": "2024-06-18"},
            {"start_date": "2024-06-20", "end_date": "2024-06-19"}
        ]}"#;
        let intervals = parse_response(body);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].booking_type, UNKNOWN_BOOKING_TYPE);
    }

    #[test]
    fn test_null_or_mistyped_entry_keeps_the_rest() {
        let body = r#"{"all_unavailable_dates": [
            {"start_date": "2024-06-15", "end_date": "2024-06-18", "booking_type": "booking"},
            {"start_date": "2024-07-01", "end_date": null},
            {"start_date": "2024-07-05"},
            {"start_date": 20240710, "end_date": "2024-07-12"},
            "2024-08-01",
            {"start_date": "2024-08-10", "end_date": "2024-08-11", "booking_type": "owner_block"}
        ]}"#;
        let intervals = parse_response(body);
        assert_eq!(
            intervals,
            vec![
                UnavailableInterval::new(date(2024, 6, 15), date(2024, 6, 18), "booking"),
                UnavailableInterval::new(date(2024, 8, 10), date(2024, 8, 11), "owner_block"),
            ]
        );
    }

    #[test]
    fn test_timestamps_are_truncated_to_dates() {
        assert_eq!(parse_api_date("2024-06-15"), Some(date(2024, 6, 15)));
        assert_eq!(parse_api_date("2024-06-15T00:00:00Z"), Some(date(2024, 6, 15)));
        assert_eq!(parse_api_date("2024-06-15T13:30:00"), Some(date(2024, 6, 15)));
        assert_eq!(parse_api_date("15/06/2024"), None);
    }

    #[test]
    fn test_query_pairs_use_iso_dates() {
        let query = AvailabilityQuery::new("42", date(2024, 6, 10), date(2025, 1, 10));
        assert_eq!(
            query.query_pairs(),
            [
                ("start_date", "2024-06-10".to_string()),
                ("end_date", "2025-01-10".to_string())
            ]
        );
    }
}
