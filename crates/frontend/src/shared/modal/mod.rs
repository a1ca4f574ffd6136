use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

#[component]
pub fn Modal(
    /// Title of the modal
    #[prop(into)]
    title: String,
    /// Callback when modal should close
    on_close: Callback<()>,
    /// Optional footer buttons (Save, Cancel, etc.)
    #[prop(optional)]
    footer: Option<ChildrenFn>,
    /// Modal content
    children: Children,
) -> impl IntoView {
    // Escape closes the modal; listener removed with the component
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
            if keyboard_event.key() == "Escape" {
                on_close.run(());
            }
        }
    });
    if let Some(window) = web_sys::window() {
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    let closure = StoredValue::new_local(Some(closure));
    on_cleanup(move || {
        closure.update_value(|c| {
            if let (Some(c), Some(window)) = (c.take(), web_sys::window()) {
                let _ = window
                    .remove_event_listener_with_callback("keydown", c.as_ref().unchecked_ref());
            }
        });
    });

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=stop_propagation>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                    <button class="button button--icon modal__close" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                <div class="modal-body">
                    {children()}
                </div>
                {footer.map(|f| view! { <div class="modal-footer">{f()}</div> })}
            </div>
        </div>
    }
}

/// Browser confirmation dialog, `false` when unavailable
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
