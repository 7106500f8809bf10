use crate::models::UnavailableInterval;
use chrono::NaiveDate;
use tracing::debug;

/// Answers "can this date be booked?" for one property
///
/// Past days are always unavailable, and so are days after the last
/// bookable day when one is set. Fetched intervals are sorted and merged on
/// construction so every lookup is a binary search over disjoint spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityOracle {
    today: NaiveDate,
    intervals: Vec<UnavailableInterval>,
    /// Disjoint, sorted, inclusive `(start, end)` spans
    spans: Vec<(NaiveDate, NaiveDate)>,
    last_bookable: Option<NaiveDate>,
}

impl AvailabilityOracle {
    pub fn new(today: NaiveDate, intervals: Vec<UnavailableInterval>) -> Self {
        let spans = merge_spans(&intervals);
        debug!(
            "Oracle built from {} intervals ({} merged spans)",
            intervals.len(),
            spans.len()
        );
        Self {
            today,
            intervals,
            spans,
            last_bookable: None,
        }
    }

    /// Treats every day after `last_bookable` as unavailable
    ///
    /// Intervals are only fetched up to the horizon, so nothing past it is
    /// known to be free.
    pub fn until(mut self, last_bookable: NaiveDate) -> Self {
        self.last_bookable = Some(last_bookable);
        self
    }

    /// Oracle with no blackout intervals: only past days are unavailable
    pub fn open(today: NaiveDate) -> Self {
        Self::new(today, Vec::new())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn intervals(&self) -> &[UnavailableInterval] {
        &self.intervals
    }

    pub fn last_bookable(&self) -> Option<NaiveDate> {
        self.last_bookable
    }

    pub fn is_past(&self, date: NaiveDate) -> bool {
        date < self.today
    }

    pub fn is_beyond_horizon(&self, date: NaiveDate) -> bool {
        self.last_bookable.is_some_and(|last| date > last)
    }

    /// True for past days, days past the horizon and days inside any
    /// interval, ends included
    pub fn is_unavailable(&self, date: NaiveDate) -> bool {
        self.is_past(date) || self.is_beyond_horizon(date) || self.is_blocked(date)
    }

    /// True when `date` falls inside a fetched interval, ignoring `today`
    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        let idx = self.spans.partition_point(|(start, _)| *start <= date);
        idx > 0 && self.spans[idx - 1].1 >= date
    }

    /// The fetched interval covering `date`, if any
    pub fn interval_at(&self, date: NaiveDate) -> Option<&UnavailableInterval> {
        self.intervals.iter().find(|interval| interval.contains(date))
    }

    /// Earliest unavailable day in `[start, end]`; arguments may be reversed
    pub fn first_unavailable_in(&self, start: NaiveDate, end: NaiveDate) -> Option<NaiveDate> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        if self.is_past(start) {
            return Some(start);
        }

        // Spans are disjoint and sorted, so their ends are sorted too
        let idx = self.spans.partition_point(|(_, span_end)| *span_end < start);
        let blocked = match self.spans.get(idx) {
            Some((span_start, _)) if *span_start <= end => Some((*span_start).max(start)),
            _ => None,
        };

        // `end > last` means `last` has a successor
        let beyond = self
            .last_bookable
            .filter(|last| end > *last)
            .and_then(|last| last.succ_opt())
            .map(|first_beyond| first_beyond.max(start));

        blocked.into_iter().chain(beyond).min()
    }

    /// True iff every day from `start` to `end` inclusive is bookable
    pub fn check_range_is_available(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.first_unavailable_in(start, end).is_none()
    }
}

/// Sorts intervals and merges overlapping or touching ones
fn merge_spans(intervals: &[UnavailableInterval]) -> Vec<(NaiveDate, NaiveDate)> {
    let mut sorted: Vec<(NaiveDate, NaiveDate)> = intervals
        .iter()
        .filter(|interval| interval.start_date <= interval.end_date)
        .map(|interval| (interval.start_date, interval.end_date))
        .collect();
    sorted.sort();

    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if last.1.succ_opt().map_or(true, |next| start <= next) => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_oracle() -> AvailabilityOracle {
        AvailabilityOracle::new(
            date(2024, 6, 10),
            vec![
                UnavailableInterval::new(date(2024, 6, 15), date(2024, 6, 18), "booking"),
                UnavailableInterval::new(date(2024, 7, 1), date(2024, 7, 3), "owner_block"),
            ],
        )
    }

    /// Per-day scan used as the reference for the binary-search lookups
    fn scan(oracle: &AvailabilityOracle, start: NaiveDate, end: NaiveDate) -> bool {
        DateRange::new(start, end)
            .days()
            .all(|day| !oracle.is_unavailable(day))
    }

    #[test]
    fn test_past_days_are_unavailable() {
        let oracle = june_oracle();
        for offset in 1..=60 {
            assert!(oracle.is_unavailable(date(2024, 6, 10) - Duration::days(offset)));
        }
        assert!(!oracle.is_unavailable(date(2024, 6, 10)));
    }

    #[test]
    fn test_interval_days_are_unavailable() {
        let oracle = june_oracle();
        for day in 15..=18 {
            assert!(oracle.is_unavailable(date(2024, 6, day)));
        }
        assert!(!oracle.is_unavailable(date(2024, 6, 14)));
        assert!(!oracle.is_unavailable(date(2024, 6, 19)));
        assert!(oracle.is_unavailable(date(2024, 7, 3)));
        assert!(!oracle.is_unavailable(date(2024, 7, 4)));
    }

    #[test]
    fn test_range_check_matches_day_scan() {
        let oracle = june_oracle();
        let first = date(2024, 6, 5);
        for a in 0..40 {
            for len in 0..12 {
                let start = first + Duration::days(a);
                let end = start + Duration::days(len);
                assert_eq!(
                    oracle.check_range_is_available(start, end),
                    scan(&oracle, start, end),
                    "{start}..{end}"
                );
            }
        }
    }

    #[test]
    fn test_first_unavailable_in_reports_earliest_day() {
        let oracle = june_oracle();
        assert_eq!(
            oracle.first_unavailable_in(date(2024, 6, 12), date(2024, 6, 20)),
            Some(date(2024, 6, 15))
        );
        assert_eq!(
            oracle.first_unavailable_in(date(2024, 6, 16), date(2024, 6, 20)),
            Some(date(2024, 6, 16))
        );
        assert_eq!(
            oracle.first_unavailable_in(date(2024, 6, 20), date(2024, 6, 12)),
            Some(date(2024, 6, 15))
        );
        assert_eq!(oracle.first_unavailable_in(date(2024, 6, 20), date(2024, 6, 25)), None);
    }

    #[test]
    fn test_overlapping_and_adjacent_intervals_merge() {
        let oracle = AvailabilityOracle::new(
            date(2024, 1, 1),
            vec![
                UnavailableInterval::new(date(2024, 3, 10), date(2024, 3, 12), "booking"),
                UnavailableInterval::new(date(2024, 3, 1), date(2024, 3, 5), "booking"),
                UnavailableInterval::new(date(2024, 3, 4), date(2024, 3, 8), "maintenance"),
                UnavailableInterval::new(date(2024, 3, 9), date(2024, 3, 9), "booking"),
            ],
        );
        assert_eq!(oracle.spans, vec![(date(2024, 3, 1), date(2024, 3, 12))]);
        assert_eq!(oracle.intervals().len(), 4);
        assert_eq!(
            oracle.interval_at(date(2024, 3, 9)).map(|i| i.booking_type.as_str()),
            Some("booking")
        );
    }

    #[test]
    fn test_reversed_interval_is_ignored() {
        let oracle = AvailabilityOracle::new(
            date(2024, 1, 1),
            vec![UnavailableInterval::new(date(2024, 3, 10), date(2024, 3, 1), "booking")],
        );
        assert!(!oracle.is_unavailable(date(2024, 3, 5)));
    }

    #[test]
    fn test_interval_ending_on_last_representable_date() {
        let oracle = AvailabilityOracle::new(
            date(2024, 6, 10),
            vec![
                UnavailableInterval::new(date(2024, 6, 15), NaiveDate::MAX, "owner_block"),
                UnavailableInterval::new(date(2024, 7, 1), date(2024, 7, 2), "booking"),
            ],
        );
        assert_eq!(oracle.spans, vec![(date(2024, 6, 15), NaiveDate::MAX)]);
        assert!(oracle.is_unavailable(NaiveDate::MAX));
        assert!(oracle.is_unavailable(date(2030, 1, 1)));
        assert!(!oracle.is_unavailable(date(2024, 6, 14)));
        assert_eq!(
            oracle.first_unavailable_in(date(2024, 6, 12), NaiveDate::MAX),
            Some(date(2024, 6, 15))
        );
    }

    #[test]
    fn test_days_after_last_bookable_are_unavailable() {
        let oracle = june_oracle().until(date(2025, 1, 10));
        assert!(!oracle.is_unavailable(date(2025, 1, 10)));
        assert!(oracle.is_unavailable(date(2025, 1, 11)));
        assert!(oracle.is_unavailable(date(2030, 1, 1)));
        assert_eq!(
            oracle.first_unavailable_in(date(2025, 1, 8), date(2025, 1, 12)),
            Some(date(2025, 1, 11))
        );
        assert_eq!(
            oracle.first_unavailable_in(date(2030, 1, 1), date(2030, 1, 5)),
            Some(date(2030, 1, 1))
        );
        // An earlier blackout still wins
        assert_eq!(
            oracle.first_unavailable_in(date(2024, 6, 12), date(2025, 2, 1)),
            Some(date(2024, 6, 15))
        );
        assert!(oracle.check_range_is_available(date(2025, 1, 5), date(2025, 1, 10)));
    }

    #[test]
    fn test_last_bookable_at_max_date_never_overflows() {
        let oracle = AvailabilityOracle::open(date(2024, 6, 10)).until(NaiveDate::MAX);
        assert!(!oracle.is_unavailable(NaiveDate::MAX));
        assert!(oracle.check_range_is_available(date(2024, 6, 10), NaiveDate::MAX));
    }

    #[test]
    fn test_open_oracle_only_blocks_past() {
        let oracle = AvailabilityOracle::open(date(2024, 6, 10));
        assert!(oracle.is_unavailable(date(2024, 6, 9)));
        assert!(oracle.check_range_is_available(date(2024, 6, 10), date(2025, 6, 10)));
    }
}
