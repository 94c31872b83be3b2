//! Reducer-backed state for the form and the entry list, and the
//! [`WorkoutView`] the tracker renders through.

use log::warn;
use std::rc::Rc;
use workout_map::{Coordinates, Workout, WorkoutFields, WorkoutId, WorkoutKind, WorkoutView};
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub visible: bool,
    pub fields: WorkoutFields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Newest first, like entries inserted directly below the form.
    pub entries: Vec<Workout>,
    pub form: FormState,
}

pub enum UiAction {
    RenderEntry(Workout),
    RemoveEntry(WorkoutId),
    ShowForm,
    HideForm,
    Populate(WorkoutFields),
    SetKind(WorkoutKind),
    SetField(FormField, String),
}

impl Reducible for UiState {
    type Action = UiAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            UiAction::RenderEntry(workout) => {
                match next.entries.iter().position(|w| w.id() == workout.id()) {
                    Some(i) => next.entries[i] = workout,
                    None => next.entries.insert(0, workout),
                }
            }
            UiAction::RemoveEntry(id) => next.entries.retain(|w| w.id() != &id),
            UiAction::ShowForm => next.form.visible = true,
            UiAction::HideForm => {
                let kind = next.form.fields.kind;
                next.form = FormState {
                    visible: false,
                    fields: WorkoutFields {
                        kind,
                        ..WorkoutFields::default()
                    },
                };
            }
            UiAction::Populate(fields) => next.form.fields = fields,
            UiAction::SetKind(kind) => next.form.fields.kind = kind,
            UiAction::SetField(field, value) => {
                let fields = &mut next.form.fields;
                match field {
                    FormField::Distance => fields.distance = value,
                    FormField::Duration => fields.duration = value,
                    FormField::Cadence => fields.cadence = value,
                    FormField::Elevation => fields.elevation = value,
                }
            }
        }
        next.into()
    }
}

/// Forwards tracker output into the reducer.
pub struct YewView {
    dispatcher: UseReducerDispatcher<UiState>,
}

impl YewView {
    pub fn new(dispatcher: UseReducerDispatcher<UiState>) -> Self {
        Self { dispatcher }
    }
}

impl WorkoutView for YewView {
    fn render_entry(&mut self, workout: &Workout) {
        self.dispatcher.dispatch(UiAction::RenderEntry(workout.clone()));
    }

    fn remove_entry(&mut self, id: &WorkoutId) {
        self.dispatcher.dispatch(UiAction::RemoveEntry(id.clone()));
    }

    fn show_form(&mut self, _coords: Coordinates) {
        self.dispatcher.dispatch(UiAction::ShowForm);
    }

    fn hide_form(&mut self) {
        self.dispatcher.dispatch(UiAction::HideForm);
    }

    fn populate_form_for(&mut self, workout: &Workout) {
        self.dispatcher.dispatch(UiAction::Populate(workout.to_fields()));
    }

    fn notify(&mut self, message: &str) {
        if gloo_utils::window().alert_with_message(message).is_err() {
            warn!("Could not show alert: {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_map::WorkoutInput;

    fn reduce(state: UiState, action: UiAction) -> UiState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn entries_are_prepended_and_replaced_in_place() {
        let a = Workout::create(
            Coordinates::new(1.0, 1.0),
            WorkoutInput::running(5.0, 30.0, 170.0),
        );
        let b = Workout::create(
            Coordinates::new(2.0, 2.0),
            WorkoutInput::cycling(20.0, 60.0, 100.0),
        );

        let state = reduce(UiState::default(), UiAction::RenderEntry(a.clone()));
        let state = reduce(state, UiAction::RenderEntry(b.clone()));
        assert_eq!(state.entries[0].id(), b.id());
        assert_eq!(state.entries[1].id(), a.id());

        let edited = Workout::new(
            a.id().clone(),
            a.created_at(),
            a.coords(),
            WorkoutInput::cycling(8.0, 30.0, 40.0),
        );
        let state = reduce(state, UiAction::RenderEntry(edited));
        assert_eq!(state.entries.len(), 2);
        assert_eq!(state.entries[1].kind(), WorkoutKind::Cycling);

        let state = reduce(state, UiAction::RemoveEntry(b.id().clone()));
        assert_eq!(state.entries.len(), 1);
    }

    #[test]
    fn hiding_the_form_clears_values_but_keeps_kind() {
        let state = reduce(UiState::default(), UiAction::ShowForm);
        let state = reduce(
            state,
            UiAction::Populate(WorkoutFields::cycling("25", "95", "523")),
        );
        assert!(state.form.visible);

        let state = reduce(state, UiAction::HideForm);
        assert!(!state.form.visible);
        assert_eq!(state.form.fields.kind, WorkoutKind::Cycling);
        assert_eq!(state.form.fields.distance, "");
        assert_eq!(state.form.fields.elevation, "");
    }

    #[test]
    fn field_edits_land_in_the_right_slot() {
        let state = reduce(
            UiState::default(),
            UiAction::SetField(FormField::Cadence, "180".into()),
        );
        let state = reduce(state, UiAction::SetKind(WorkoutKind::Running));
        assert_eq!(state.form.fields.cadence, "180");
        assert_eq!(state.form.fields.elevation, "");
    }
}
