//! Рамка виджета: заголовок, состояния загрузки и ошибки, повтор.

use leptos::prelude::*;
use thaw::*;

use crate::analytics::SlotStatus;
use crate::shared::icons::icon;

pub const EMPTY_TEXT: &str = "Нет данных";
pub const FAILED_TEXT: &str = "Не удалось загрузить данные";

#[component]
pub fn WidgetCard(
    #[prop(into)]
    title: String,
    #[prop(into)]
    status: Signal<SlotStatus>,
    /// Повторный запрос виджета
    #[prop(optional)]
    on_retry: Option<Callback<()>>,
    /// Элементы управления в заголовке
    #[prop(optional, into)]
    toolbar: Option<ViewFn>,
    #[prop(optional, into)]
    class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let body = move || match status.get() {
        SlotStatus::Loading => view! {
            <div class="widget__placeholder">
                <Spinner />
                <span>"Загрузка..."</span>
            </div>
        }
        .into_any(),
        SlotStatus::Empty => view! {
            <div class="widget__placeholder widget__placeholder--empty">{EMPTY_TEXT}</div>
        }
        .into_any(),
        SlotStatus::Failed(message) => view! {
            <div class="widget__placeholder widget__placeholder--error">
                <span title=message>{FAILED_TEXT}</span>
                {on_retry.map(|retry| view! {
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| retry.run(())
                    >
                        {icon("refresh")}
                        " Повторить"
                    </Button>
                })}
            </div>
        }
        .into_any(),
        SlotStatus::Ready | SlotStatus::Updating => children().into_any(),
    };

    let card_class = move || {
        let updating = if status.get() == SlotStatus::Updating {
            " widget--updating"
        } else {
            ""
        };
        format!("widget {}{}", class, updating)
    };

    view! {
        <section class=card_class>
            <header class="widget__header">
                <h3 class="widget__title">{title}</h3>
                {toolbar.map(|t| view! { <div class="widget__toolbar">{t.run()}</div> })}
            </header>
            <div class="widget__body">{body}</div>
        </section>
    }
}
