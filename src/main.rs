//! Workout map application using Yew.
//! Wires the tracker to storage, the Leaflet map and the form/list components.

use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use workout_map::config::MAP_CONTAINER_ID;
use workout_map::{
    BrowserStore, KeyValueStore, MemoryStore, Tracker, TrackerError, TrackerOptions,
    WorkoutFields, WorkoutId, WorkoutKind,
};
use yew::prelude::*;

mod components;
mod geolocation;
mod hooks;
mod map;
mod state;

use components::{WorkoutEntry, WorkoutForm};
use map::LeafletMap;
use state::{FormField, UiAction, UiState, YewView};

// ──────────────────────────────────────────────────────────────────────────────
type AppTracker = Tracker<Box<dyn KeyValueStore>, LeafletMap, YewView>;
type SharedTracker = Rc<RefCell<Option<AppTracker>>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Run `f` against the tracker if it is ready and not already in use.
fn with_tracker<R>(shared: &SharedTracker, f: impl FnOnce(&mut AppTracker) -> R) -> Option<R> {
    match shared.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => {
            warn!("Tracker busy; event dropped");
            None
        }
    }
}

fn with_weak_tracker<R>(
    weak: &Weak<RefCell<Option<AppTracker>>>,
    f: impl FnOnce(&mut AppTracker) -> R,
) -> Option<R> {
    weak.upgrade().and_then(|shared| with_tracker(&shared, f))
}

/// User-facing errors were already shown by the tracker; the rest is only logged.
fn log_outcome<T>(action: &str, result: Result<T, TrackerError>) {
    if let Err(e) = result {
        debug!("{} failed: {}", action, e);
    }
}

/// Build the tracker, restore saved workouts and start the position lookup
/// that brings up the map.
fn start(shared: SharedTracker, view: YewView) {
    let (store, store_error): (Box<dyn KeyValueStore>, Option<TrackerError>) =
        match BrowserStore::local() {
            Ok(store) => (Box::new(store), None),
            Err(e) => (Box::new(MemoryStore::new()), Some(e)),
        };

    let mut tracker = Tracker::new(store, view, TrackerOptions::default());
    if let Some(e) = store_error {
        tracker.storage_unavailable(e);
    }
    match tracker.restore() {
        Ok(n) => info!("Loaded {} saved workouts", n),
        Err(e) => warn!("Saved workouts not loaded: {}", e),
    }
    *shared.borrow_mut() = Some(tracker);

    let weak = Rc::downgrade(&shared);
    wasm_bindgen_futures::spawn_local(async move {
        let position = geolocation::current_position().await;
        match position {
            Ok(center) => {
                let clicks = weak.clone();
                let map = LeafletMap::init(center, move |coords| {
                    with_weak_tracker(&clicks, |t| t.map_clicked(coords));
                });
                with_weak_tracker(&weak, |t| t.attach_map(map));
            }
            Err(e) => {
                with_weak_tracker(&weak, |t| t.report(&e));
            }
        }
    });
}

// ──────────────────────────────────────────────────────────────────────────────

/// Sidebar with the form and entries, next to the map container.
#[function_component(App)]
fn app() -> Html {
    let ui = use_reducer(UiState::default);
    let tracker: SharedTracker = use_mut_ref(|| None);

    {
        let tracker = tracker.clone();
        let dispatcher = ui.dispatcher();
        use_effect_with((), move |_| {
            start(tracker, YewView::new(dispatcher));
            || ()
        });
    }

    let on_submit = {
        let tracker = tracker.clone();
        Callback::from(move |fields: WorkoutFields| {
            with_tracker(&tracker, |t| log_outcome("Submit", t.submit(&fields)));
        })
    };
    let on_cancel = {
        let tracker = tracker.clone();
        Callback::from(move |()| {
            with_tracker(&tracker, |t| t.cancel_session());
        })
    };
    let on_kind = {
        let dispatcher = ui.dispatcher();
        Callback::from(move |kind: WorkoutKind| dispatcher.dispatch(UiAction::SetKind(kind)))
    };
    let on_field = {
        let dispatcher = ui.dispatcher();
        Callback::from(move |(field, value): (FormField, String)| {
            dispatcher.dispatch(UiAction::SetField(field, value))
        })
    };
    let on_select = {
        let tracker = tracker.clone();
        Callback::from(move |id: WorkoutId| {
            with_tracker(&tracker, |t| log_outcome("Recenter", t.entry_clicked(&id)));
        })
    };
    let on_edit = {
        let tracker = tracker.clone();
        Callback::from(move |id: WorkoutId| {
            with_tracker(&tracker, |t| log_outcome("Edit", t.begin_edit(&id)));
        })
    };
    let on_delete = {
        let tracker = tracker.clone();
        Callback::from(move |id: WorkoutId| {
            with_tracker(&tracker, |t| log_outcome("Delete", t.delete_workout(&id)));
        })
    };
    let on_reset = {
        let tracker = tracker.clone();
        Callback::from(move |_: MouseEvent| {
            with_tracker(&tracker, |t| log_outcome("Reset", t.reset_all()));
        })
    };

    html! {
        <>
            <div class="sidebar">
                <ul class="workouts">
                    <WorkoutForm
                        form={ui.form.clone()}
                        {on_kind}
                        {on_field}
                        {on_submit}
                        {on_cancel} />
                    { for ui.entries.iter().map(|w| html! {
                        <WorkoutEntry
                            key={w.id().to_string()}
                            workout={w.clone()}
                            on_select={on_select.clone()}
                            on_edit={on_edit.clone()}
                            on_delete={on_delete.clone()} />
                    }) }
                </ul>
                <button class="reset" onclick={on_reset}>{ "Reset all" }</button>
            </div>
            <div id={MAP_CONTAINER_ID}></div>
        </>
    }
}

/// Entry point: installs the panic hook and renders the App.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
