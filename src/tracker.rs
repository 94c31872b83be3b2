//! The authoritative workout list and its create/edit/delete lifecycle.
//!
//! [`Tracker`] owns the ordered list, the marker table and the form session,
//! and mirrors every change to storage, the map and the entry list. All
//! methods run to completion on the UI thread; there is no internal locking.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;

use crate::config::TrackerOptions;
use crate::error::TrackerError;
use crate::storage::{decode_workouts, encode_workouts, KeyValueStore};
use crate::utils::{parse_workout_fields, WorkoutFields};
use crate::view::{MapView, MarkerHandle, WorkoutView};
use crate::workout::{Coordinates, Workout, WorkoutId, WorkoutInput};

/// What the input form is currently open for. At most one session exists;
/// opening a new one replaces the previous.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormSession {
    #[default]
    Idle,
    Creating {
        coords: Coordinates,
    },
    Editing {
        id: WorkoutId,
    },
}

pub struct Tracker<S, M, V> {
    options: TrackerOptions,
    store: S,
    map: Option<M>,
    view: V,
    workouts: Vec<Workout>,
    // Marker handles belong to the map; this is only the id -> handle relation.
    markers: HashMap<WorkoutId, MarkerHandle>,
    session: FormSession,
    durable: bool,
}

impl<S: KeyValueStore, M: MapView, V: WorkoutView> Tracker<S, M, V> {
    /// Empty tracker. The map is attached later, once the user's position is known.
    pub fn new(store: S, view: V, options: TrackerOptions) -> Self {
        Self {
            options,
            store,
            map: None,
            view,
            workouts: Vec::new(),
            markers: HashMap::new(),
            session: FormSession::Idle,
            durable: true,
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn get(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    /// `false` once a storage operation has failed this session.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn marker_for(&self, id: &WorkoutId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    /// Attach the map and place a marker for every workout already listed.
    pub fn attach_map(&mut self, map: M) {
        self.detach_map();
        self.map = Some(map);
        for i in 0..self.workouts.len() {
            self.render_marker(i);
        }
        info!("Map attached with {} markers", self.markers.len());
    }

    /// Release every marker and hand the map back.
    pub fn detach_map(&mut self) -> Option<M> {
        let mut map = self.map.take()?;
        for (_, marker) in self.markers.drain() {
            map.remove_marker(marker);
        }
        Some(map)
    }

    /// Open a create session at the clicked point.
    pub fn map_clicked(&mut self, coords: Coordinates) {
        if let FormSession::Editing { id } = &self.session {
            debug!("Map click cancels edit of {}", id);
            // Drop the edited workout's values before the form reopens empty.
            self.view.hide_form();
        }
        self.session = FormSession::Creating { coords };
        self.view.show_form(coords);
    }

    /// Open an edit session for `id`, replacing whatever session was open.
    pub fn begin_edit(&mut self, id: &WorkoutId) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        let workout = &self.workouts[index];
        self.view.populate_form_for(workout);
        self.view.show_form(workout.coords());
        self.session = FormSession::Editing { id: id.clone() };
        debug!("Editing workout {}", id);
        Ok(())
    }

    pub fn cancel_session(&mut self) {
        self.session = FormSession::Idle;
        self.view.hide_form();
    }

    /// Commit the form for the open session.
    pub fn submit(&mut self, fields: &WorkoutFields) -> Result<WorkoutId, TrackerError> {
        match self.session.clone() {
            FormSession::Idle => {
                debug!("Form submitted without an open session");
                Err(TrackerError::NoActiveSession)
            }
            FormSession::Creating { coords } => self.add_workout(coords, fields),
            FormSession::Editing { id } => self.edit_workout(&id, fields).map(|()| id),
        }
    }

    /// Validate, append and render a new workout.
    pub fn add_workout(
        &mut self,
        coords: Coordinates,
        fields: &WorkoutFields,
    ) -> Result<WorkoutId, TrackerError> {
        let input = self.validate(fields)?;
        let now = Utc::now();
        let workout = Workout::new(self.fresh_id(now), now, coords, input);
        let id = workout.id().clone();
        info!("Adding {} workout {}", workout.kind(), id);

        self.workouts.push(workout);
        let index = self.workouts.len() - 1;
        self.render_marker(index);
        self.view.render_entry(&self.workouts[index]);
        self.close_form();
        self.sync();
        Ok(id)
    }

    /// Replace the workout `id` with one built from `fields`. The id,
    /// coordinates, creation time and list position are kept.
    pub fn edit_workout(
        &mut self,
        id: &WorkoutId,
        fields: &WorkoutFields,
    ) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        let input = self.validate(fields)?;
        let old = &self.workouts[index];
        let replacement = Workout::new(old.id().clone(), old.created_at(), old.coords(), input);
        info!(
            "Replacing workout {} ({} -> {})",
            id,
            old.kind(),
            replacement.kind()
        );

        self.workouts[index] = replacement;
        self.release_marker(id);
        self.render_marker(index);
        self.view.render_entry(&self.workouts[index]);
        self.close_form();
        self.sync();
        Ok(())
    }

    pub fn delete_workout(&mut self, id: &WorkoutId) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        let removed = self.workouts.remove(index);
        info!("Deleted workout {}", removed.id());

        self.release_marker(id);
        self.view.remove_entry(id);
        if matches!(&self.session, FormSession::Editing { id: editing } if editing == id) {
            self.close_form();
        }
        self.sync();
        Ok(())
    }

    /// Pan the map to the workout. Nothing happens before the map is attached.
    pub fn recenter_on(&mut self, id: &WorkoutId) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        let coords = self.workouts[index].coords();
        match self.map.as_mut() {
            Some(map) => map.pan_to(coords, self.options.zoom_level),
            None => debug!("Map not ready; cannot recenter on {}", id),
        }
        Ok(())
    }

    /// A click on a list entry: count it and recenter on it.
    pub fn entry_clicked(&mut self, id: &WorkoutId) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        self.workouts[index].record_interaction();
        self.recenter_on(id)
    }

    /// Write the whole list under the configured key.
    pub fn persist(&mut self) -> Result<(), TrackerError> {
        let json = encode_workouts(&self.workouts)?;
        self.store.set(&self.options.storage_key, &json)
    }

    /// Replace the in-memory list with the persisted one and render it.
    /// Returns the number of workouts restored.
    pub fn restore(&mut self) -> Result<usize, TrackerError> {
        self.clear_in_memory();

        let json = match self.store.get(&self.options.storage_key) {
            Ok(Some(json)) => json,
            Ok(None) => return Ok(0),
            Err(e) => {
                self.storage_unavailable(e.clone());
                return Err(e);
            }
        };

        let restored = match decode_workouts(&json, Utc::now()) {
            Ok(restored) => restored,
            Err(e) => {
                warn!("Persisted workouts could not be read: {}", e);
                self.set_aside(&json);
                return Err(e);
            }
        };

        for workout in restored {
            if self.get(workout.id()).is_some() {
                warn!("Skipping duplicate persisted workout {}", workout.id());
                continue;
            }
            self.workouts.push(workout);
            let index = self.workouts.len() - 1;
            self.render_marker(index);
            self.view.render_entry(&self.workouts[index]);
        }

        info!("Restored {} workouts", self.workouts.len());
        Ok(self.workouts.len())
    }

    /// Forget every workout, in storage and in memory.
    pub fn reset_all(&mut self) -> Result<(), TrackerError> {
        self.clear_in_memory();
        self.close_form();
        info!("All workouts reset");

        self.store.remove(&self.options.storage_key).map_err(|e| {
            self.storage_unavailable(e.clone());
            e
        })
    }

    /// Surface an error raised outside the tracker, such as a failed
    /// position lookup.
    pub fn report(&mut self, error: &TrackerError) {
        if error.is_user_facing() {
            warn!("{}", error);
            self.view.notify(&error.to_string());
        } else {
            debug!("{}", error);
        }
    }

    /// Switch to memory-only mode. The user is told the first time only.
    pub fn storage_unavailable(&mut self, error: TrackerError) {
        warn!("Storage failure: {}", error);
        if self.durable {
            self.durable = false;
            self.view.notify(&error.to_string());
        }
    }

    fn sync(&mut self) {
        if let Err(e) = self.persist() {
            self.storage_unavailable(e);
        }
    }

    /// Copy an unreadable stored list to the backup key so the next save
    /// does not destroy it. If even that fails, storage is reported unavailable.
    fn set_aside(&mut self, json: &str) {
        let key = self.options.backup_key();
        match self.store.set(&key, json) {
            Ok(()) => info!("Unreadable workout list kept under {}", key),
            Err(e) => self.storage_unavailable(e),
        }
    }

    fn validate(&mut self, fields: &WorkoutFields) -> Result<WorkoutInput, TrackerError> {
        parse_workout_fields(fields).map_err(|e| {
            self.report(&e);
            e
        })
    }

    fn index_of(&self, id: &WorkoutId) -> Result<usize, TrackerError> {
        self.workouts
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| {
                debug!("No workout with id {}", id);
                TrackerError::NotFound(id.clone())
            })
    }

    fn fresh_id(&self, now: DateTime<Utc>) -> WorkoutId {
        loop {
            let id = WorkoutId::generate(now);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn render_marker(&mut self, index: usize) {
        let Some(map) = self.map.as_mut() else {
            return;
        };
        let workout = &self.workouts[index];
        let marker = map.render_marker(
            workout.coords(),
            &workout.marker_label(),
            workout.kind().popup_class(),
        );
        self.markers.insert(workout.id().clone(), marker);
    }

    fn release_marker(&mut self, id: &WorkoutId) {
        if let Some(marker) = self.markers.remove(id) {
            if let Some(map) = self.map.as_mut() {
                map.remove_marker(marker);
            }
        }
    }

    fn close_form(&mut self) {
        self.session = FormSession::Idle;
        self.view.hide_form();
    }

    fn clear_in_memory(&mut self) {
        for workout in std::mem::take(&mut self.workouts) {
            self.release_marker(workout.id());
            self.view.remove_entry(workout.id());
        }
        self.markers.clear();
    }
}
