//! Contracts for the two UI collaborators the tracker drives.

use crate::workout::{Coordinates, Workout, WorkoutId};

/// Opaque handle to a marker owned by the map. The tracker only stores it to
/// hand it back to [`MapView::remove_marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u32);

pub trait MapView {
    /// Place a marker with an open popup showing `label`; `style` is the
    /// popup's CSS class.
    fn render_marker(&mut self, coords: Coordinates, label: &str, style: &str) -> MarkerHandle;
    fn remove_marker(&mut self, marker: MarkerHandle);
    fn pan_to(&mut self, coords: Coordinates, zoom: u8);
}

/// The input form plus the list of workout entries.
pub trait WorkoutView {
    /// Show `workout` in the list, replacing an entry with the same id.
    fn render_entry(&mut self, workout: &Workout);
    fn remove_entry(&mut self, id: &WorkoutId);
    fn show_form(&mut self, coords: Coordinates);
    /// Hide the form and clear its fields.
    fn hide_form(&mut self);
    fn populate_form_for(&mut self, workout: &Workout);
    /// Tell the user something went wrong.
    fn notify(&mut self, message: &str);
}
