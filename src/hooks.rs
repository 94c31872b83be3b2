use gloo_timers::callback::Timeout;
use yew::prelude::*;

/// Returns `true` for `settle_ms` after `visible` turns false.
///
/// The form slides out through a CSS transition on its `hidden` class; while
/// this returns true the form is also taken out of layout so the transition
/// does not replay as the entry below it moves up.
#[hook]
pub fn use_settling(visible: bool, settle_ms: u32) -> bool {
    let settling = use_state(|| false);
    let timer = use_mut_ref(|| None::<Timeout>);

    {
        let settling = settling.clone();
        use_effect_with(visible, move |&visible| {
            if visible {
                // Dropping the pending timeout cancels it.
                timer.borrow_mut().take();
                settling.set(false);
            } else {
                settling.set(true);
                let done = settling.clone();
                *timer.borrow_mut() = Some(Timeout::new(settle_ms, move || done.set(false)));
            }
            || ()
        });
    }

    *settling
}
