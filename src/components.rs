//! Yew view components: the workout form and the entries below it.

use web_sys::{HtmlInputElement, HtmlSelectElement};
use workout_map::config::FORM_SETTLE_MS;
use workout_map::utils::format_metric;
use workout_map::{Activity, Workout, WorkoutFields, WorkoutId, WorkoutKind};
use yew::prelude::*;

use crate::hooks::use_settling;
use crate::state::{FormField, FormState};

/// Renders one `icon value unit` block of an entry.
fn render_details(icon: &str, value: String, unit: &str) -> Html {
    html! {
        <div class="workout__details">
            <span class="workout__icon">{ icon.to_string() }</span>
            <span class="workout__value">{ value }</span>
            <span class="workout__unit">{ unit.to_string() }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WorkoutEntryProps {
    pub workout: Workout,
    pub on_select: Callback<WorkoutId>,
    pub on_edit: Callback<WorkoutId>,
    pub on_delete: Callback<WorkoutId>,
}

/// A single list entry with its edit and delete buttons.
#[function_component(WorkoutEntry)]
pub fn workout_entry(props: &WorkoutEntryProps) -> Html {
    let w = &props.workout;
    let kind = w.kind();

    let onclick = {
        let id = w.id().clone();
        props.on_select.reform(move |_: MouseEvent| id.clone())
    };
    let on_edit = {
        let id = w.id().clone();
        let cb = props.on_edit.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(id.clone());
        })
    };
    let on_delete = {
        let id = w.id().clone();
        let cb = props.on_delete.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(id.clone());
        })
    };

    let specific = match *w.activity() {
        Activity::Running {
            cadence_spm,
            pace_min_per_km,
        } => html! {
            <>
                { render_details("⚡️", format_metric(pace_min_per_km), "min/km") }
                { render_details("🦶🏼", cadence_spm.to_string(), "spm") }
            </>
        },
        Activity::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => html! {
            <>
                { render_details("⚡️", format_metric(speed_km_per_h), "km/h") }
                { render_details("⛰", elevation_gain_m.to_string(), "m") }
            </>
        },
    };

    html! {
        <li class={classes!("workout", format!("workout--{}", kind.as_str()))}
            data-id={w.id().to_string()}
            {onclick}>
            <h2 class="workout__title">{ w.description() }</h2>
            <button class="edit" onclick={on_edit}>{ "Edit" }</button>
            <button class="delete" onclick={on_delete}>{ "Delete" }</button>
            { render_details(kind.icon(), w.distance_km().to_string(), "km") }
            { render_details("⏱", w.duration_min().to_string(), "min") }
            { specific }
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct WorkoutFormProps {
    pub form: FormState,
    pub on_kind: Callback<WorkoutKind>,
    pub on_field: Callback<(FormField, String)>,
    pub on_submit: Callback<WorkoutFields>,
    pub on_cancel: Callback<()>,
}

/// The input form. Enter in any field submits it; Escape closes it.
#[function_component(WorkoutForm)]
pub fn workout_form(props: &WorkoutFormProps) -> Html {
    let visible = props.form.visible;
    let fields = &props.form.fields;
    let settling = use_settling(visible, FORM_SETTLE_MS);
    let distance_ref = use_node_ref();

    {
        let distance_ref = distance_ref.clone();
        use_effect_with(visible, move |&visible| {
            if visible {
                if let Some(input) = distance_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                }
            }
            || ()
        });
    }

    let onsubmit = {
        let on_submit = props.on_submit.clone();
        let fields = fields.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(fields.clone());
        })
    };
    let onkeydown = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                on_cancel.emit(());
            }
        })
    };
    let onchange_kind = props.on_kind.reform(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        select.value().parse().unwrap_or_default()
    });
    let field_input = |field: FormField| {
        props.on_field.reform(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            (field, input.value())
        })
    };

    let is_running = fields.kind == WorkoutKind::Running;

    html! {
        <form class={classes!("form", (!visible).then_some("hidden"))}
            style={if settling { "display: none" } else { "" }}
            {onsubmit}
            {onkeydown}>
            <div class="form__row">
                <label class="form__label">{ "Type" }</label>
                <select class="form__input form__input--type" onchange={onchange_kind}>
                    <option value="running" selected={is_running}>{ "Running" }</option>
                    <option value="cycling" selected={!is_running}>{ "Cycling" }</option>
                </select>
            </div>
            <div class="form__row">
                <label class="form__label">{ "Distance" }</label>
                <input class="form__input form__input--distance"
                    placeholder="km"
                    ref={distance_ref}
                    value={fields.distance.clone()}
                    oninput={field_input(FormField::Distance)} />
            </div>
            <div class="form__row">
                <label class="form__label">{ "Duration" }</label>
                <input class="form__input form__input--duration"
                    placeholder="min"
                    value={fields.duration.clone()}
                    oninput={field_input(FormField::Duration)} />
            </div>
            <div class={classes!("form__row", (!is_running).then_some("form__row--hidden"))}>
                <label class="form__label">{ "Cadence" }</label>
                <input class="form__input form__input--cadence"
                    placeholder="step/min"
                    value={fields.cadence.clone()}
                    oninput={field_input(FormField::Cadence)} />
            </div>
            <div class={classes!("form__row", is_running.then_some("form__row--hidden"))}>
                <label class="form__label">{ "Elev Gain" }</label>
                <input class="form__input form__input--elevation"
                    placeholder="meters"
                    value={fields.elevation.clone()}
                    oninput={field_input(FormField::Elevation)} />
            </div>
            <button class="form__btn">{ "OK" }</button>
        </form>
    }
}
