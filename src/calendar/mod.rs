//! Booking calendar engine.
//!
//! [`AvailabilityCalendar`] ties together the [`AvailabilityOracle`], the
//! selection reducer and the month grid. It holds one property's blackout
//! intervals, the visible month and the start/end selection, and notifies a
//! listener each time a bookable range is committed.

pub mod grid;
pub mod selection;

pub use grid::{build_month_grid, WeekLayout, WEEKDAY_LABELS};
pub use selection::{reduce, Outcome, SelectionEvent, Transition};

use crate::api::AvailabilitySnapshot;
use crate::availability::AvailabilityOracle;
use crate::error::RangeError;
use crate::models::{DateRange, MonthCursor, MonthGrid, SelectionState, UnavailableInterval};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Default forward window, in months, that can be browsed and booked
pub const DEFAULT_HORIZON_MONTHS: u32 = 7;

type CommitListener = Box<dyn FnMut(DateRange) + Send>;

pub struct AvailabilityCalendar {
    oracle: AvailabilityOracle,
    selection: SelectionState,
    layout: WeekLayout,
    horizon_months: u32,
    visible: MonthCursor,
    banner: Option<String>,
    on_commit: Option<CommitListener>,
}

impl AvailabilityCalendar {
    /// Empty calendar: nothing blocked but the past and the days beyond the
    /// default horizon, no selection
    pub fn new(today: NaiveDate) -> Self {
        Self {
            oracle: AvailabilityOracle::open(today)
                .until(horizon_end(today, DEFAULT_HORIZON_MONTHS)),
            selection: SelectionState::default(),
            layout: WeekLayout::default(),
            horizon_months: DEFAULT_HORIZON_MONTHS,
            visible: MonthCursor::of(today),
            banner: None,
            on_commit: None,
        }
    }

    pub fn with_layout(mut self, layout: WeekLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the bookable window; days after it become unavailable
    pub fn with_horizon(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self.oracle = self.bounded_oracle(self.oracle.intervals().to_vec());
        self
    }

    fn bounded_oracle(&self, intervals: Vec<UnavailableInterval>) -> AvailabilityOracle {
        AvailabilityOracle::new(self.today(), intervals).until(self.horizon_end())
    }

    /// Registers the callback fired once per committed range
    pub fn on_commit<F>(mut self, listener: F) -> Self
    where
        F: FnMut(DateRange) + Send + 'static,
    {
        self.on_commit = Some(Box::new(listener));
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.oracle.today()
    }

    pub fn oracle(&self) -> &AvailabilityOracle {
        &self.oracle
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn committed_range(&self) -> Option<DateRange> {
        self.selection.committed()
    }

    /// User-facing message left by the last failed load
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_unavailable(&self, date: NaiveDate) -> bool {
        self.oracle.is_unavailable(date)
    }

    pub fn check_range_is_available(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.oracle.check_range_is_available(start, end)
    }

    /// Replaces the blackout intervals and re-checks the current selection
    ///
    /// A committed range that now overlaps a blackout loses its end date and
    /// the overlap is returned as an error. A pending start date that became
    /// unavailable clears the selection.
    pub fn set_intervals(&mut self, intervals: Vec<UnavailableInterval>) -> Result<(), RangeError> {
        self.oracle = self.bounded_oracle(intervals);

        if let Some(range) = self.selection.committed() {
            if let Some(first_blocked) = self.oracle.first_unavailable_in(range.start, range.end) {
                info!("Committed range {} no longer available", range);
                self.selection.end_date = None;
                return Err(RangeError::Unavailable {
                    start: range.start,
                    end: range.end,
                    first_blocked,
                });
            }
        } else if let Some(start) = self.selection.start_date {
            if self.oracle.is_unavailable(start) {
                debug!("Pending start {} became unavailable, clearing selection", start);
                self.selection = SelectionState::default();
            }
        }
        Ok(())
    }

    /// Applies a finished load, keeping its banner for display
    pub fn apply_snapshot(&mut self, snapshot: AvailabilitySnapshot) -> Result<(), RangeError> {
        self.banner = snapshot.banner;
        self.set_intervals(snapshot.intervals)
    }

    /// Feeds one event through the selection reducer
    pub fn dispatch(&mut self, event: SelectionEvent) -> Outcome {
        let transition = reduce(&self.selection, event, &self.oracle);
        self.selection = transition.state;

        if let Outcome::Committed(range) = &transition.outcome {
            info!("Committed {}", range);
            if let Some(listener) = self.on_commit.as_mut() {
                listener(*range);
            }
        }
        transition.outcome
    }

    /// Clicks a day; `Ok(Some(range))` when the click completed a booking range
    pub fn click(&mut self, date: NaiveDate) -> Result<Option<DateRange>, RangeError> {
        match self.dispatch(SelectionEvent::Click(date)) {
            Outcome::Committed(range) => Ok(Some(range)),
            Outcome::Rejected(error) => Err(error),
            _ => Ok(None),
        }
    }

    pub fn hover(&mut self, date: NaiveDate) {
        self.dispatch(SelectionEvent::Hover(date));
    }

    pub fn clear_hover(&mut self) {
        self.dispatch(SelectionEvent::HoverCleared);
    }

    pub fn reset(&mut self) {
        self.dispatch(SelectionEvent::Reset);
    }

    /// Last day of the bookable window
    pub fn horizon_end(&self) -> NaiveDate {
        horizon_end(self.today(), self.horizon_months)
    }

    pub fn visible_month(&self) -> MonthCursor {
        self.visible
    }

    /// Moves to the month containing `date`, clamped to the bookable window
    pub fn show_month_of(&mut self, date: NaiveDate) {
        let first = MonthCursor::of(self.today());
        let last = first.plus(self.horizon_months);
        self.visible = MonthCursor::of(date).clamp(first, last);
    }

    /// Returns false when already at the last browsable month
    pub fn next_month(&mut self) -> bool {
        let last = MonthCursor::of(self.today()).plus(self.horizon_months);
        if self.visible >= last {
            return false;
        }
        self.visible = self.visible.next();
        true
    }

    /// Returns false when already showing the current month
    pub fn previous_month(&mut self) -> bool {
        if self.visible <= MonthCursor::of(self.today()) {
            return false;
        }
        self.visible = self.visible.previous();
        true
    }

    /// Grid for the visible month
    pub fn month_grid(&self) -> MonthGrid {
        let reference = self.visible.first_day().unwrap_or_else(|| self.today());
        self.month_grid_for(reference)
    }

    /// Grid for the month containing `reference`
    pub fn month_grid_for(&self, reference: NaiveDate) -> MonthGrid {
        build_month_grid(reference, self.layout, &self.selection, &self.oracle)
    }
}

/// `today` plus `months` calendar months, saturating at the last valid date
pub fn horizon_end(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_add_months(chrono::Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
