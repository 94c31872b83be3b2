#![allow(dead_code)]

use std::collections::HashMap;
use workout_map::{
    Coordinates, KeyValueStore, MapView, MarkerHandle, MemoryStore, Tracker, TrackerError,
    TrackerOptions, Workout, WorkoutFields, WorkoutId, WorkoutView,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub coords: Coordinates,
    pub label: String,
    pub style: String,
}

#[derive(Debug, Default)]
pub struct RecordingMap {
    next: u32,
    pub live: HashMap<MarkerHandle, PlacedMarker>,
    pub removed: Vec<MarkerHandle>,
    pub pans: Vec<(Coordinates, u8)>,
}

impl MapView for RecordingMap {
    fn render_marker(&mut self, coords: Coordinates, label: &str, style: &str) -> MarkerHandle {
        self.next += 1;
        let handle = MarkerHandle(self.next);
        self.live.insert(
            handle,
            PlacedMarker {
                coords,
                label: label.to_string(),
                style: style.to_string(),
            },
        );
        handle
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        assert!(
            self.live.remove(&marker).is_some(),
            "marker {:?} released twice or never placed",
            marker
        );
        self.removed.push(marker);
    }

    fn pan_to(&mut self, coords: Coordinates, zoom: u8) {
        self.pans.push((coords, zoom));
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub entries: Vec<Workout>,
    pub form_visible: bool,
    pub form_hides: usize,
    pub shown_at: Option<Coordinates>,
    pub populated: Option<WorkoutFields>,
    pub notices: Vec<String>,
}

impl WorkoutView for RecordingView {
    fn render_entry(&mut self, workout: &Workout) {
        match self.entries.iter().position(|w| w.id() == workout.id()) {
            Some(i) => self.entries[i] = workout.clone(),
            None => self.entries.push(workout.clone()),
        }
    }

    fn remove_entry(&mut self, id: &WorkoutId) {
        self.entries.retain(|w| w.id() != id);
    }

    fn show_form(&mut self, coords: Coordinates) {
        self.form_visible = true;
        self.shown_at = Some(coords);
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
        self.form_hides += 1;
        self.populated = None;
    }

    fn populate_form_for(&mut self, workout: &Workout) {
        self.populated = Some(workout.to_fields());
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// A store whose writes always fail, like a full or disabled `localStorage`.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, TrackerError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), TrackerError> {
        Err(TrackerError::Storage("QuotaExceededError".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), TrackerError> {
        Err(TrackerError::Storage("QuotaExceededError".to_string()))
    }
}

/// A store that cannot be read at all, like `localStorage` blocked by the
/// browser's privacy settings.
#[derive(Debug, Default)]
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, TrackerError> {
        Err(TrackerError::Storage("SecurityError".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), TrackerError> {
        Err(TrackerError::Storage("SecurityError".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), TrackerError> {
        Err(TrackerError::Storage("SecurityError".to_string()))
    }
}

pub type TestTracker<S = MemoryStore> = Tracker<S, RecordingMap, RecordingView>;

pub fn bucharest() -> Coordinates {
    Coordinates::new(44.4792832, 26.099712)
}

pub fn tracker_with(store: MemoryStore) -> TestTracker {
    Tracker::new(store, RecordingView::default(), TrackerOptions::default())
}

/// Tracker on a fresh store with the map already attached.
pub fn tracker_with_map() -> (TestTracker, MemoryStore) {
    let store = MemoryStore::new();
    let mut tracker = tracker_with(store.clone());
    tracker.attach_map(RecordingMap::default());
    (tracker, store)
}

pub fn stored_json(store: &MemoryStore) -> Option<String> {
    store.get("workouts").unwrap()
}
