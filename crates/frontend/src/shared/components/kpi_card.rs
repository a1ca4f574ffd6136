use crate::shared::icons::icon;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KpiTone {
    #[default]
    Neutral,
    Good,
    Bad,
}

#[component]
pub fn KpiCard(
    /// Подпись над значением
    #[prop(into)]
    label: String,
    /// Имя иконки для icon()
    #[prop(into)]
    icon_name: String,
    /// Уже отформатированное значение ("—" для пустого)
    #[prop(into)]
    value: Signal<String>,
    /// Пояснение под значением
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
    #[prop(into, optional)]
    tone: Signal<KpiTone>,
    /// Идёт обновление
    #[prop(into, optional)]
    busy: Signal<bool>,
) -> impl IntoView {
    let card_class = move || {
        let tone = match tone.get() {
            KpiTone::Good => " stat-card--success",
            KpiTone::Bad => " stat-card--error",
            KpiTone::Neutral => "",
        };
        let busy = if busy.get() { " stat-card--updating" } else { "" };
        format!("stat-card{}{}", tone, busy)
    };

    view! {
        <div class=card_class>
            <div class="stat-card__icon">{icon(&icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{move || value.get()}</div>
                {move || subtitle.get().map(|s| view! {
                    <div class="stat-card__subtitle">{s}</div>
                })}
            </div>
        </div>
    }
}
