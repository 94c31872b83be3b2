//! Map-based workout log.
//!
//! The library holds everything that does not touch the DOM: the workout
//! model, form validation, persistence and the [`Tracker`] controller. The
//! binary wires it to Leaflet, geolocation and Yew components through the
//! [`MapView`] and [`WorkoutView`] traits.

pub mod config;
pub mod error;
pub mod storage;
pub mod tracker;
pub mod utils;
pub mod view;
pub mod workout;

pub use config::TrackerOptions;
pub use error::TrackerError;
pub use storage::{BrowserStore, KeyValueStore, MemoryStore};
pub use tracker::{FormSession, Tracker};
pub use utils::WorkoutFields;
pub use view::{MapView, MarkerHandle, WorkoutView};
pub use workout::{Activity, Coordinates, Workout, WorkoutId, WorkoutInput, WorkoutKind};
