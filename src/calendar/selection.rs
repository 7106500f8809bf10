use crate::availability::AvailabilityOracle;
use crate::error::RangeError;
use crate::models::{DateRange, SelectionState};
use chrono::NaiveDate;
use tracing::debug;

/// User input driving the date picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Click(NaiveDate),
    Hover(NaiveDate),
    HoverCleared,
    Reset,
}

/// What a single event did to the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed (past or unavailable day clicked)
    Ignored,
    StartSelected(NaiveDate),
    Committed(DateRange),
    /// The end click was refused; `start_date` is kept, `end_date` cleared
    Rejected(RangeError),
    HoverChanged,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SelectionState,
    pub outcome: Outcome,
}

impl Transition {
    fn unchanged(state: &SelectionState) -> Self {
        Self {
            state: *state,
            outcome: Outcome::Ignored,
        }
    }
}

/// Applies one event to the selection and reports what happened
pub fn reduce(
    state: &SelectionState,
    event: SelectionEvent,
    oracle: &AvailabilityOracle,
) -> Transition {
    match event {
        SelectionEvent::Click(day) => click(state, day, oracle),
        SelectionEvent::Hover(day) => hover(state, Some(day)),
        SelectionEvent::HoverCleared => hover(state, None),
        SelectionEvent::Reset => Transition {
            state: SelectionState::default(),
            outcome: Outcome::Cleared,
        },
    }
}

fn click(state: &SelectionState, day: NaiveDate, oracle: &AvailabilityOracle) -> Transition {
    if oracle.is_unavailable(day) {
        debug!("Ignoring click on unavailable day {}", day);
        return Transition::unchanged(state);
    }

    let start = match state.start_date {
        Some(start) if state.is_selecting_end => start,
        _ => {
            return Transition {
                state: SelectionState {
                    start_date: Some(day),
                    end_date: None,
                    hover_date: None,
                    is_selecting_end: true,
                },
                outcome: Outcome::StartSelected(day),
            };
        }
    };

    let (start, end) = if day < start { (day, start) } else { (start, day) };

    let rejected = |error: RangeError| Transition {
        state: SelectionState {
            start_date: Some(start),
            end_date: None,
            hover_date: None,
            is_selecting_end: false,
        },
        outcome: Outcome::Rejected(error),
    };

    if start == end {
        return rejected(RangeError::ZeroNights(start));
    }
    if let Some(first_blocked) = oracle.first_unavailable_in(start, end) {
        debug!("Range {} → {} blocked at {}", start, end, first_blocked);
        return rejected(RangeError::Unavailable {
            start,
            end,
            first_blocked,
        });
    }

    Transition {
        state: SelectionState {
            start_date: Some(start),
            end_date: Some(end),
            hover_date: None,
            is_selecting_end: false,
        },
        outcome: Outcome::Committed(DateRange::new(start, end)),
    }
}

fn hover(state: &SelectionState, day: Option<NaiveDate>) -> Transition {
    // Hover only matters while the end date is being picked
    let hover_date = if state.is_selecting_end { day } else { None };
    if hover_date == state.hover_date {
        return Transition::unchanged(state);
    }
    Transition {
        state: SelectionState {
            hover_date,
            ..*state
        },
        outcome: Outcome::HoverChanged,
    }
}
