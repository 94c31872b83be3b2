//! Leaflet bindings. The JavaScript side lives in map_helpers.js and keeps the
//! map instance and the marker objects; Rust only sees numeric marker ids.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use workout_map::config::{
    MAP_CONTAINER_ID, MAP_ZOOM_LEVEL, PAN_DURATION_SEC, POPUP_MAX_WIDTH, POPUP_MIN_WIDTH,
    TILE_ATTRIBUTION, TILE_URL,
};
use workout_map::{Coordinates, MapView, MarkerHandle};

#[wasm_bindgen(module = "/map_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(
        container_id: &str,
        lat: f64,
        lng: f64,
        zoom: u8,
        tile_url: &str,
        tile_options: JsValue,
        on_click: &js_sys::Function,
    ) -> u32;

    #[wasm_bindgen(js_name = addMarker)]
    fn add_marker(map_id: u32, lat: f64, lng: f64, content: &str, popup_options: JsValue) -> u32;

    #[wasm_bindgen(js_name = removeMarker)]
    fn remove_marker(map_id: u32, id: u32);

    #[wasm_bindgen(js_name = setView)]
    fn set_view(map_id: u32, lat: f64, lng: f64, zoom: u8, pan_duration_sec: f64);

    #[wasm_bindgen(js_name = destroyMap)]
    fn destroy_map(map_id: u32);
}

#[derive(Serialize)]
struct TileOptions<'a> {
    attribution: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopupOptions<'a> {
    max_width: u32,
    min_width: u32,
    auto_close: bool,
    close_on_click: bool,
    class_name: &'a str,
}

/// One Leaflet map instance. Dropping it tears down that instance only.
pub struct LeafletMap {
    id: u32,
    // Kept alive for as long as Leaflet may call it.
    _on_click: Closure<dyn FnMut(f64, f64)>,
}

impl LeafletMap {
    /// Render the map centred on `center` and route clicks to `on_click`.
    pub fn init(center: Coordinates, mut on_click: impl FnMut(Coordinates) + 'static) -> Self {
        let on_click = Closure::<dyn FnMut(f64, f64)>::new(move |lat: f64, lng: f64| {
            on_click(Coordinates::new(lat, lng));
        });
        let tile_options = serde_wasm_bindgen::to_value(&TileOptions {
            attribution: TILE_ATTRIBUTION,
        })
        .unwrap_or(JsValue::UNDEFINED);

        let id = init_map(
            MAP_CONTAINER_ID,
            center.lat,
            center.lng,
            MAP_ZOOM_LEVEL,
            TILE_URL,
            tile_options,
            on_click.as_ref().unchecked_ref(),
        );
        log::info!("Map loaded at {:.5}, {:.5}", center.lat, center.lng);

        Self {
            id,
            _on_click: on_click,
        }
    }
}

impl MapView for LeafletMap {
    fn render_marker(&mut self, coords: Coordinates, label: &str, style: &str) -> MarkerHandle {
        let popup_options = serde_wasm_bindgen::to_value(&PopupOptions {
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: false,
            close_on_click: false,
            class_name: style,
        })
        .unwrap_or(JsValue::UNDEFINED);
        MarkerHandle(add_marker(self.id, coords.lat, coords.lng, label, popup_options))
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        remove_marker(self.id, marker.0);
    }

    fn pan_to(&mut self, coords: Coordinates, zoom: u8) {
        set_view(self.id, coords.lat, coords.lng, zoom, PAN_DURATION_SEC);
    }
}

impl Drop for LeafletMap {
    fn drop(&mut self) {
        destroy_map(self.id);
    }
}
