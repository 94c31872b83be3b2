//! Key-value persistence for the workout list.
//!
//! The list is stored as one JSON array under a single key. Records carry a
//! `type` tag and use the field names `coords`, `distance`, `duration`,
//! `cadence` and `elevationGain`, so lists saved by earlier versions of the
//! page restore unchanged. Derived values (pace, speed, description) are not
//! stored; they are recomputed when records are turned back into workouts.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsValue;

use crate::error::TrackerError;
use crate::workout::{Activity, Coordinates, Metric, Workout, WorkoutId, WorkoutInput};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError>;
    fn remove(&mut self, key: &str) -> Result<(), TrackerError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), TrackerError> {
        (**self).remove(key)
    }
}

/// In-memory store. Clones share the same entries, the way every tab of one
/// browser profile sees the same `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TrackerError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// The page's `window.localStorage`.
pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    pub fn local() -> Result<Self, TrackerError> {
        let window =
            web_sys::window().ok_or_else(|| TrackerError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_storage_error)?
            .ok_or_else(|| TrackerError::Storage("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        self.storage.get_item(key).map_err(js_storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        self.storage.set_item(key, value).map_err(js_storage_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), TrackerError> {
        self.storage.remove_item(key).map_err(js_storage_error)
    }
}

fn js_storage_error(e: JsValue) -> TrackerError {
    TrackerError::Storage(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// One persisted workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutRecord {
    Running {
        id: WorkoutId,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        cadence: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<DateTime<Utc>>,
    },
    Cycling {
        id: WorkoutId,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<DateTime<Utc>>,
    },
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        let id = w.id().clone();
        let coords = w.coords();
        let distance = w.distance_km();
        let duration = w.duration_min();
        let date = Some(w.created_at());
        match *w.activity() {
            Activity::Running { cadence_spm, .. } => WorkoutRecord::Running {
                id,
                coords,
                distance,
                duration,
                cadence: cadence_spm,
                date,
            },
            Activity::Cycling {
                elevation_gain_m, ..
            } => WorkoutRecord::Cycling {
                id,
                coords,
                distance,
                duration,
                elevation_gain: elevation_gain_m,
                date,
            },
        }
    }
}

impl WorkoutRecord {
    pub fn id(&self) -> &WorkoutId {
        match self {
            WorkoutRecord::Running { id, .. } | WorkoutRecord::Cycling { id, .. } => id,
        }
    }

    /// Rebuild the workout, keeping id and coordinates verbatim. Records
    /// without a `date` are stamped with `now`.
    ///
    /// Returns `None` when a stored number is not finite and positive.
    pub fn into_workout(self, now: DateTime<Utc>) -> Option<Workout> {
        let (id, coords, input, date) = match self {
            WorkoutRecord::Running {
                id,
                coords,
                distance,
                duration,
                cadence,
                date,
            } => (id, coords, WorkoutInput::running(distance, duration, cadence), date),
            WorkoutRecord::Cycling {
                id,
                coords,
                distance,
                duration,
                elevation_gain,
                date,
            } => (
                id,
                coords,
                WorkoutInput::cycling(distance, duration, elevation_gain),
                date,
            ),
        };

        let metric = match input.metric {
            Metric::CadenceSpm(v) | Metric::ElevationGainM(v) => v,
        };
        let usable = [input.distance_km, input.duration_min, metric]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !usable {
            return None;
        }

        Some(Workout::new(id, date.unwrap_or(now), coords, input))
    }
}

pub fn encode_workouts(workouts: &[Workout]) -> Result<String, TrackerError> {
    let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Decode a persisted list. Records of an unknown type, records that do not
/// parse and records with unusable numbers are dropped with a warning; only a
/// document that is not a JSON array fails the whole restore.
pub fn decode_workouts(json: &str, now: DateTime<Utc>) -> Result<Vec<Workout>, TrackerError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    debug!("Decoded {} persisted workout records", values.len());

    let mut workouts = Vec::with_capacity(values.len());
    for (i, value) in values.into_iter().enumerate() {
        let record = match serde_json::from_value::<WorkoutRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable persisted record #{}: {}", i, e);
                continue;
            }
        };
        let id = record.id().clone();
        match record.into_workout(now) {
            Some(w) => workouts.push(w),
            None => warn!("Skipping persisted workout {} with invalid numbers", id),
        }
    }
    Ok(workouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::WorkoutKind;

    #[test]
    fn reads_records_written_by_the_legacy_page() {
        let json = r#"[
            {"type":"running","id":"8472913405","coords":[44.4792832,26.099712],"distance":10,"duration":40,"cadence":170},
            {"type":"cycling","id":"8472913999","coords":[44.48,26.1],"distance":25,"duration":95,"elevationGain":523}
        ]"#;
        let now = Utc::now();
        let workouts = decode_workouts(json, now).unwrap();
        assert_eq!(workouts.len(), 2);

        assert_eq!(workouts[0].id().as_str(), "8472913405");
        assert_eq!(workouts[0].kind(), WorkoutKind::Running);
        assert_eq!(workouts[0].coords(), Coordinates::new(44.4792832, 26.099712));
        assert_eq!(workouts[0].pace(), Some(4.0));
        assert_eq!(workouts[0].created_at(), now);

        assert_eq!(workouts[1].kind(), WorkoutKind::Cycling);
        assert_eq!(
            workouts[1].input(),
            WorkoutInput::cycling(25.0, 95.0, 523.0)
        );
    }

    #[test]
    fn writes_tagged_records_with_array_coords() {
        let w = Workout::create(
            Coordinates::new(1.5, -2.25),
            WorkoutInput::cycling(20.0, 60.0, 100.0),
        );
        let json = encode_workouts(std::slice::from_ref(&w)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = &value[0];
        assert_eq!(record["type"], "cycling");
        assert_eq!(record["id"], w.id().as_str());
        assert_eq!(record["coords"], serde_json::json!([1.5, -2.25]));
        assert_eq!(record["distance"], 20.0);
        assert_eq!(record["duration"], 60.0);
        assert_eq!(record["elevationGain"], 100.0);
        assert!(record.get("cadence").is_none());
        assert!(record.get("date").is_some());
    }

    #[test]
    fn drops_records_with_unusable_numbers() {
        let json = r#"[
            {"type":"running","id":"a","coords":[0,0],"distance":0,"duration":40,"cadence":170},
            {"type":"running","id":"b","coords":[0,0],"distance":5,"duration":30,"cadence":160}
        ]"#;
        let workouts = decode_workouts(json, Utc::now()).unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].id().as_str(), "b");
    }

    #[test]
    fn unreadable_document_is_a_storage_error() {
        assert!(matches!(
            decode_workouts("{not json", Utc::now()),
            Err(TrackerError::Storage(_))
        ));
        assert!(matches!(
            decode_workouts(r#"{"type":"running"}"#, Utc::now()),
            Err(TrackerError::Storage(_))
        ));
    }

    #[test]
    fn unknown_and_malformed_records_are_skipped() {
        let json = r#"[
            {"type":"running","id":"keep-me","coords":[0,0],"distance":5,"duration":30,"cadence":160},
            {"type":"swimming","id":"x","coords":[0,0],"distance":1,"duration":20},
            {"type":"cycling","id":"y","coords":"nowhere","distance":1,"duration":2,"elevationGain":3},
            {"type":"cycling","id":"also-kept","coords":[1,1],"distance":20,"duration":60,"elevationGain":90}
        ]"#;
        let workouts = decode_workouts(json, Utc::now()).unwrap();
        let ids: Vec<&str> = workouts.iter().map(|w| w.id().as_str()).collect();
        assert_eq!(ids, vec!["keep-me", "also-kept"]);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        a.remove("k").unwrap();
        assert!(b.is_empty());
    }
}
