//! Application-level configuration constants.

// Persistence
pub const STORAGE_KEY: &str = "workouts";
pub const UNREADABLE_SUFFIX: &str = ".unreadable";

// Map
pub const MAP_CONTAINER_ID: &str = "map";
pub const MAP_ZOOM_LEVEL: u8 = 15;
pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const PAN_DURATION_SEC: f64 = 1.0;

// Popup sizing (px)
pub const POPUP_MAX_WIDTH: u32 = 250;
pub const POPUP_MIN_WIDTH: u32 = 100;

// UI Behavior
pub const FORM_SETTLE_MS: u32 = 1000;

/// Tunables injected into the tracker at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOptions {
    /// Key under which the workout list is persisted.
    pub storage_key: String,
    /// Zoom level used when recentering on a workout.
    pub zoom_level: u8,
}

impl TrackerOptions {
    /// Where a stored list that could not be read is set aside before the
    /// next save replaces it.
    pub fn backup_key(&self) -> String {
        format!("{}{}", self.storage_key, UNREADABLE_SUFFIX)
    }
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            zoom_level: MAP_ZOOM_LEVEL,
        }
    }
}
