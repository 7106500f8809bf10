use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed date interval during which a property cannot be booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableInterval {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Why the dates are blocked (booking, owner block, maintenance...)
    pub booking_type: String,
}

impl UnavailableInterval {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, booking_type: impl Into<String>) -> Self {
        Self {
            start_date,
            end_date,
            booking_type: booking_type.into(),
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A committed stay: check-in `start`, check-out `end`, with `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every calendar day from `start` to `end`, both included
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |day| day.succ_opt())
            .take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} ({} night{})",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.nights(),
            if self.nights() == 1 { "" } else { "s" }
        )
    }
}

/// Start/end picking state of the calendar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub hover_date: Option<NaiveDate>,
    /// True between the first click and the second one
    pub is_selecting_end: bool,
}

impl SelectionState {
    /// The committed range, if both endpoints are set
    pub fn committed(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }
}

/// One cell of a rendered month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_past: bool,
    pub is_today: bool,
    pub is_unavailable: bool,
    pub is_selected: bool,
    pub is_selection_start: bool,
    pub is_selection_end: bool,
    pub is_hovering: bool,
}

impl CalendarDay {
    /// Padding days from the neighbouring months are never clickable
    pub fn is_clickable(&self) -> bool {
        self.is_current_month && !self.is_past && !self.is_unavailable
    }
}

/// Seven consecutive days, Sunday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week {
    pub days: [CalendarDay; 7],
}

/// Rendered month: weeks covering every day of `month`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days().find(|day| day.date == date)
    }

    pub fn title(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

/// A year/month pair used to page through the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Moves forward `months` months
    pub fn plus(self, months: u32) -> Self {
        (0..months).fold(self, |cursor, _| cursor.next())
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.next().first_day().and_then(|first| first.pred_opt())
    }
}
