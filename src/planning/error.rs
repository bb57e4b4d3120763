use thiserror::Error;

/// Rejected input to the meal plan. These are caller bugs, never remote failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Unknown meal slot '{0}'")]
    InvalidMealSlot(String),
    #[error("Invalid date '{0}', expected DD/MM/YYYY")]
    InvalidDate(String),
    #[error("No meal at position {index} for {date} - {slot}")]
    InvalidEntryIndex {
        date: String,
        slot: String,
        index: usize,
    },
}
