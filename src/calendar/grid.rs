use crate::availability::AvailabilityOracle;
use crate::models::{CalendarDay, MonthGrid, SelectionState, Week};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Column headers, matching the Sunday-first week layout
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// How many weeks a month grid spans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekLayout {
    /// Just enough complete weeks to cover the month (4 to 6)
    #[default]
    Complete,
    /// Always six weeks, so the grid height never changes between months
    SixWeeks,
}

/// Builds the grid for the month containing `reference`
///
/// The first cell is the Sunday on or before the 1st. Days from the
/// neighbouring months pad the first and last weeks and are flagged
/// `is_current_month = false`.
pub fn build_month_grid(
    reference: NaiveDate,
    layout: WeekLayout,
    selection: &SelectionState,
    oracle: &AvailabilityOracle,
) -> MonthGrid {
    let first = first_of_month(reference);
    let leading = first.weekday().num_days_from_sunday() as i64;
    let grid_start = first - Duration::days(leading);

    let week_count = match layout {
        WeekLayout::Complete => (leading + days_in_month(first) + 6) / 7,
        WeekLayout::SixWeeks => 6,
    };

    let weeks = (0..week_count)
        .map(|week| {
            let week_start = grid_start + Duration::days(week * 7);
            Week {
                days: std::array::from_fn(|offset| {
                    let date = week_start + Duration::days(offset as i64);
                    calendar_day(date, first.month(), selection, oracle)
                }),
            }
        })
        .collect();

    MonthGrid {
        year: first.year(),
        month: first.month(),
        weeks,
    }
}

/// Derives every display flag of a single day
pub fn calendar_day(
    date: NaiveDate,
    month: u32,
    selection: &SelectionState,
    oracle: &AvailabilityOracle,
) -> CalendarDay {
    let is_selection_start = selection.start_date == Some(date);
    let is_selection_end = selection.end_date == Some(date);
    let is_selected = match (selection.start_date, selection.end_date) {
        (Some(start), Some(end)) => start <= date && date <= end,
        (Some(start), None) => start == date,
        _ => false,
    };

    CalendarDay {
        date,
        is_current_month: date.month() == month,
        is_past: oracle.is_past(date),
        is_today: date == oracle.today(),
        is_unavailable: oracle.is_unavailable(date),
        is_selected,
        is_selection_start,
        is_selection_end,
        is_hovering: is_in_hover_preview(date, selection, oracle),
    }
}

/// Days in `(start, hover]` while the end date is being picked
fn is_in_hover_preview(
    date: NaiveDate,
    selection: &SelectionState,
    oracle: &AvailabilityOracle,
) -> bool {
    if !selection.is_selecting_end {
        return false;
    }
    match (selection.start_date, selection.hover_date) {
        (Some(start), Some(hover)) => {
            hover > start && !oracle.is_unavailable(hover) && start < date && date <= hover
        }
        _ => false,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn days_in_month(first: NaiveDate) -> i64 {
    // 31 days past the 1st always lands early in the next month
    let probe = first + Duration::days(31);
    let next_first = probe - Duration::days(probe.day0() as i64);
    (next_first - first).num_days()
}
