//! One-shot position lookup through `navigator.geolocation`.

use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Position, PositionError};
use workout_map::{Coordinates, TrackerError};

type PositionResult = Result<Coordinates, TrackerError>;

fn unavailable(message: &str) -> TrackerError {
    TrackerError::GeolocationUnavailable {
        code: 0,
        message: message.to_string(),
    }
}

/// Ask the browser for the current position. There is no timeout: if the
/// browser never answers, the future never resolves.
pub async fn current_position() -> PositionResult {
    let geolocation = gloo_utils::window()
        .navigator()
        .geolocation()
        .map_err(|_| unavailable("geolocation is not supported"))?;

    let (tx, rx) = oneshot::channel::<PositionResult>();
    // Exactly one of the two callbacks fires; whichever does takes the sender.
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::once_into_js(move |position: Position| {
            let coords = position.coords();
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(Coordinates::new(coords.latitude(), coords.longitude())));
            }
        })
    };
    let on_error = Closure::once_into_js(move |err: PositionError| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(Err(TrackerError::GeolocationUnavailable {
                code: err.code(),
                message: err.message(),
            }));
        }
    });

    geolocation
        .get_current_position_with_error_callback(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
        )
        .map_err(|_| unavailable("position request was rejected"))?;

    rx.await
        .unwrap_or_else(|_| Err(unavailable("position request was dropped")))
}
