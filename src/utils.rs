use crate::error::TrackerError;
use crate::workout::{WorkoutInput, WorkoutKind};

/// Raw contents of the workout form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutFields {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl WorkoutFields {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: WorkoutKind::Cycling,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }
}

/// Parse a form value that must be a finite number greater than zero.
///
/// `"inf"` and `"NaN"` parse as `f64` but are rejected like any other
/// non-finite value.
pub fn validate_positive(input: &str, field: &'static str) -> Result<f64, TrackerError> {
    let invalid = || TrackerError::InvalidInput {
        field,
        value: input.to_string(),
    };

    let value: f64 = input.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Validate every field the selected kind needs. The field of the other kind
/// is ignored.
pub fn parse_workout_fields(fields: &WorkoutFields) -> Result<WorkoutInput, TrackerError> {
    let distance = validate_positive(&fields.distance, "distance")?;
    let duration = validate_positive(&fields.duration, "duration")?;

    match fields.kind {
        WorkoutKind::Running => {
            let cadence = validate_positive(&fields.cadence, "cadence")?;
            Ok(WorkoutInput::running(distance, duration, cadence))
        }
        WorkoutKind::Cycling => {
            let elevation = validate_positive(&fields.elevation, "elevation gain")?;
            Ok(WorkoutInput::cycling(distance, duration, elevation))
        }
    }
}

/// Format a derived metric the way the entry list shows it.
pub fn format_metric(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_numbers_with_whitespace() {
        assert_eq!(validate_positive(" 10 ", "distance"), Ok(10.0));
        assert_eq!(validate_positive("2.5", "distance"), Ok(2.5));
        assert_eq!(validate_positive("1e1", "distance"), Ok(10.0));
    }

    #[test]
    fn rejects_empty_zero_negative_and_non_finite() {
        for bad in ["", "   ", "0", "-3", "abc", "inf", "NaN", "1.2.3"] {
            let err = validate_positive(bad, "duration").unwrap_err();
            assert_eq!(
                err,
                TrackerError::InvalidInput {
                    field: "duration",
                    value: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn running_needs_cadence_only() {
        let mut fields = WorkoutFields::running("10", "40", "170");
        fields.elevation = "garbage".to_string();
        assert_eq!(
            parse_workout_fields(&fields),
            Ok(WorkoutInput::running(10.0, 40.0, 170.0))
        );

        let missing = WorkoutFields::running("10", "40", "");
        assert!(matches!(
            parse_workout_fields(&missing),
            Err(TrackerError::InvalidInput { field: "cadence", .. })
        ));
    }

    #[test]
    fn cycling_needs_positive_elevation() {
        assert_eq!(
            parse_workout_fields(&WorkoutFields::cycling("25", "95", "523")),
            Ok(WorkoutInput::cycling(25.0, 95.0, 523.0))
        );
        assert!(matches!(
            parse_workout_fields(&WorkoutFields::cycling("25", "95", "-1")),
            Err(TrackerError::InvalidInput {
                field: "elevation gain",
                ..
            })
        ));
    }

    #[test]
    fn first_bad_field_is_reported() {
        let err = parse_workout_fields(&WorkoutFields::running("0", "-1", "x")).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::InvalidInput { field: "distance", .. }
        ));
    }

    #[test]
    fn metrics_have_one_decimal() {
        assert_eq!(format_metric(4.0), "4.0");
        assert_eq!(format_metric(15.789_473), "15.8");
    }
}
