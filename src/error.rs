use std::fmt;

use crate::workout::WorkoutId;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// A form field was not a finite, positive number.
    InvalidInput {
        field: &'static str,
        value: String,
    },
    NotFound(WorkoutId),
    /// A submit arrived while the form had no create or edit session open.
    NoActiveSession,
    GeolocationUnavailable {
        code: u16,
        message: String,
    },
    /// Storage could not be opened, written, read, or decoded.
    Storage(String),
}

impl TrackerError {
    /// Whether the error should be surfaced to the user rather than only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TrackerError::InvalidInput { .. }
                | TrackerError::GeolocationUnavailable { .. }
                | TrackerError::Storage(_)
        )
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::InvalidInput { field, value } => write!(
                f,
                "Inputs have to be positive numbers ({} was '{}')",
                field, value
            ),
            TrackerError::NotFound(id) => write!(f, "No workout with id {}", id),
            TrackerError::NoActiveSession => {
                write!(f, "Click on the map or edit a workout before submitting")
            }
            TrackerError::GeolocationUnavailable { code, message } => write!(
                f,
                "Couldn't load map because of an error {}: {}",
                code, message
            ),
            TrackerError::Storage(reason) => write!(
                f,
                "Workouts can't be saved in this browser ({}); changes are kept until the page is closed",
                reason
            ),
        }
    }
}

impl std::error::Error for TrackerError {}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Storage(e.to_string())
    }
}
