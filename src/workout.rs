//! Workout entities and their derived metrics.
//!
//! A [`Workout`] is immutable apart from its interaction counter: pace, speed
//! and the description are computed once in [`Workout::new`], and an edit
//! builds a replacement value instead of mutating fields in place.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::utils::WorkoutFields;

static ID_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Stable identifier of a workout, kept across edits and restores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Build an id from the creation time, a per-session sequence number and
    /// 32 random bits, so two workouts created in the same millisecond differ.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let salt: u32 = rand::random();
        WorkoutId(format!(
            "{:x}-{:04x}-{:08x}",
            now.timestamp_millis(),
            seq & 0xffff,
            salt
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        WorkoutId(s.to_string())
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        WorkoutId(s)
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude in degrees, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[default]
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Value used in the kind `<select>` and in persisted records.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴🏻",
        }
    }

    /// CSS class of the map popup for this kind.
    pub fn popup_class(self) -> &'static str {
        match self {
            WorkoutKind::Running => "running-popup",
            WorkoutKind::Cycling => "cycling-popup",
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(format!("Unknown workout kind '{}'", other)),
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind-specific raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    CadenceSpm(f64),
    ElevationGainM(f64),
}

/// Validated inputs for building a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub distance_km: f64,
    pub duration_min: f64,
    pub metric: Metric,
}

impl WorkoutInput {
    pub fn running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self {
            distance_km,
            duration_min,
            metric: Metric::CadenceSpm(cadence_spm),
        }
    }

    pub fn cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self {
            distance_km,
            duration_min,
            metric: Metric::ElevationGainM(elevation_gain_m),
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.metric {
            Metric::CadenceSpm(_) => WorkoutKind::Running,
            Metric::ElevationGainM(_) => WorkoutKind::Cycling,
        }
    }
}

/// Kind-specific fields, including the metric derived from distance and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

impl Activity {
    fn derive(distance_km: f64, duration_min: f64, metric: Metric) -> Self {
        match metric {
            Metric::CadenceSpm(cadence_spm) => Activity::Running {
                cadence_spm,
                pace_min_per_km: duration_min / distance_km,
            },
            Metric::ElevationGainM(elevation_gain_m) => Activity::Cycling {
                elevation_gain_m,
                speed_km_per_h: distance_km / (duration_min / 60.0),
            },
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        match self {
            Activity::Running { .. } => WorkoutKind::Running,
            Activity::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// `"Running on October 16"`
pub fn describe(kind: WorkoutKind, date: NaiveDate) -> String {
    format!("{} on {}", kind.label(), date.format("%B %-d"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    activity: Activity,
    description: String,
    interaction_count: u32,
}

impl Workout {
    /// Build a workout from pre-validated inputs.
    pub fn new(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coordinates,
        input: WorkoutInput,
    ) -> Self {
        let activity = Activity::derive(input.distance_km, input.duration_min, input.metric);
        let local_date = created_at.with_timezone(&Local).date_naive();
        Self {
            id,
            created_at,
            coords,
            distance_km: input.distance_km,
            duration_min: input.duration_min,
            description: describe(activity.kind(), local_date),
            activity,
            interaction_count: 0,
        }
    }

    /// New workout stamped with the current time and a fresh id.
    pub fn create(coords: Coordinates, input: WorkoutInput) -> Self {
        let now = Utc::now();
        Self::new(WorkoutId::generate(now), now, coords, input)
    }

    pub fn record_interaction(&mut self) {
        self.interaction_count += 1;
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn interaction_count(&self) -> u32 {
        self.interaction_count
    }

    /// Pace in min/km; `None` for cycling.
    pub fn pace(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { pace_min_per_km, .. } => Some(pace_min_per_km),
            Activity::Cycling { .. } => None,
        }
    }

    /// Speed in km/h; `None` for running.
    pub fn speed(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            Activity::Running { .. } => None,
        }
    }

    /// The raw input this workout was built from.
    pub fn input(&self) -> WorkoutInput {
        let metric = match self.activity {
            Activity::Running { cadence_spm, .. } => Metric::CadenceSpm(cadence_spm),
            Activity::Cycling {
                elevation_gain_m, ..
            } => Metric::ElevationGainM(elevation_gain_m),
        };
        WorkoutInput {
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            metric,
        }
    }

    /// Popup text shown on the map marker.
    pub fn marker_label(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }

    /// Form contents that reproduce this workout, used when editing.
    pub fn to_fields(&self) -> WorkoutFields {
        let (cadence, elevation) = match self.activity {
            Activity::Running { cadence_spm, .. } => (cadence_spm.to_string(), String::new()),
            Activity::Cycling {
                elevation_gain_m, ..
            } => (String::new(), elevation_gain_m.to_string()),
        };
        WorkoutFields {
            kind: self.kind(),
            distance: self.distance_km.to_string(),
            duration: self.duration_min.to_string(),
            cadence,
            elevation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn here() -> Coordinates {
        Coordinates::new(44.4792832, 26.099712)
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::create(here(), WorkoutInput::running(10.0, 40.0, 170.0));
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.pace(), Some(4.0));
        assert_eq!(w.speed(), None);

        let w = Workout::create(here(), WorkoutInput::running(7.3, 41.9, 160.0));
        assert_eq!(w.pace(), Some(41.9 / 7.3));
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = Workout::create(here(), WorkoutInput::cycling(25.0, 95.0, 523.0));
        let speed = w.speed().unwrap();
        assert_eq!(speed, 25.0 / (95.0 / 60.0));
        assert!((speed - 15.789).abs() < 1e-3);
        assert_eq!(w.pace(), None);
    }

    #[test]
    fn description_uses_kind_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(describe(WorkoutKind::Cycling, date), "Cycling on March 5");
        assert_eq!(describe(WorkoutKind::Running, date), "Running on March 5");
    }

    #[test]
    fn description_follows_creation_date() {
        let created = Utc.with_ymd_and_hms(2023, 7, 14, 12, 0, 0).unwrap();
        let w = Workout::new(
            WorkoutId::from("fixed"),
            created,
            here(),
            WorkoutInput::running(5.0, 25.0, 180.0),
        );
        let expected = format!(
            "Running on {}",
            created.with_timezone(&Local).format("%B %-d")
        );
        assert_eq!(w.description(), expected);
        assert_eq!(w.marker_label(), format!("🏃‍♂️ {}", expected));
    }

    #[test]
    fn interactions_are_counted() {
        let mut w = Workout::create(here(), WorkoutInput::cycling(10.0, 30.0, 50.0));
        assert_eq!(w.interaction_count(), 0);
        w.record_interaction();
        w.record_interaction();
        assert_eq!(w.interaction_count(), 2);
    }

    #[test]
    fn generated_ids_are_distinct_within_one_millisecond() {
        let now = Utc::now();
        let a = WorkoutId::generate(now);
        let b = WorkoutId::generate(now);
        assert_ne!(a, b);
    }

    #[test]
    fn fields_reproduce_the_input() {
        let w = Workout::create(here(), WorkoutInput::cycling(12.5, 40.0, 300.0));
        let fields = w.to_fields();
        assert_eq!(fields.kind, WorkoutKind::Cycling);
        assert_eq!(fields.distance, "12.5");
        assert_eq!(fields.duration, "40");
        assert_eq!(fields.cadence, "");
        assert_eq!(fields.elevation, "300");
        assert_eq!(w.input(), WorkoutInput::cycling(12.5, 40.0, 300.0));
    }

    #[test]
    fn kind_parses_from_select_value() {
        assert_eq!("running".parse::<WorkoutKind>(), Ok(WorkoutKind::Running));
        assert_eq!("cycling".parse::<WorkoutKind>(), Ok(WorkoutKind::Cycling));
        assert!("swimming".parse::<WorkoutKind>().is_err());
    }
}
