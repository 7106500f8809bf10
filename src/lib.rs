//! Stay Calendar: availability and date-range selection for rental bookings
//!
//! Builds month grids for a property, checks days against its blackout
//! intervals and drives the two-click check-in/check-out picker.

pub mod api;
pub mod availability;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;

pub use api::{
    AvailabilityClient, AvailabilityLoader, AvailabilityQuery, AvailabilitySnapshot,
    AvailabilitySource, LoadOutcome,
};
pub use availability::AvailabilityOracle;
pub use calendar::{AvailabilityCalendar, Outcome, SelectionEvent, WeekLayout};
pub use config::Config;
pub use error::{ConfigError, RangeError};
pub use models::{
    CalendarDay, DateRange, MonthCursor, MonthGrid, SelectionState, UnavailableInterval, Week,
};
