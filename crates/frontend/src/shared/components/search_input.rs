use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::shared::icons::icon;

const DEBOUNCE_MS: u32 = 300;

/// Поле поиска с задержкой отправки значения
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра
    #[prop(into)]
    value: Signal<String>,
    /// Вызывается после паузы ввода
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск...".to_string()
    } else {
        placeholder
    };

    let input_value = RwSignal::new(value.get_untracked());
    // Timeout отменяется при drop
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input = move |new_value: String| {
        input_value.set(new_value.clone());
        let timeout = Timeout::new(DEBOUNCE_MS, move || on_change.run(new_value));
        pending.set_value(Some(timeout));
    };

    let clear = move |_| {
        pending.set_value(None);
        input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class="form__input"
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
            <Show when=move || !value.get().is_empty()>
                <button class="search-input__clear" title="Очистить" on:click=clear>
                    {icon("x")}
                </button>
            </Show>
        </div>
    }
}
