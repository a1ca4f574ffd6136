//! Компонент сортируемой ячейки заголовка таблицы
//!
//! ```rust,ignore
//! <SortableHeaderCell
//!     label="Итог"
//!     is_current=Signal::derive(move || table.with(|t| t.sort().map(|(c, _)| c) == Some(column)))
//!     order=Signal::derive(move || table.with(|t| t.sort().map(|(_, o)| o).unwrap_or_default()))
//!     on_sort=Callback::new(move |_| toggle(column))
//!     align="right"
//! />
//! ```

use crate::shared::list_utils::{get_sort_indicator, SortOrder};
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn SortableHeaderCell(
    /// Текст заголовка
    #[prop(into)]
    label: String,

    /// Колонка сейчас является ключом сортировки
    #[prop(into)]
    is_current: Signal<bool>,

    /// Направление сортировки
    #[prop(into)]
    order: Signal<SortOrder>,

    /// Клик по заголовку
    on_sort: Callback<()>,

    /// Сортировка временно недоступна (идёт обновление)
    #[prop(into, optional)]
    disabled: Signal<bool>,

    #[prop(optional, default = 90.0)]
    min_width: f64,

    /// Выравнивание заголовка (left/right)
    #[prop(optional, default = "left")]
    align: &'static str,
) -> impl IntoView {
    let header_style = if align == "right" {
        "cursor: pointer; justify-content: flex-end; padding-right: 12px;"
    } else {
        "cursor: pointer; padding-right: 12px;"
    };

    let indicator_class = move || {
        if is_current.get() {
            "table__sort-indicator table__sort-indicator--active"
        } else {
            "table__sort-indicator"
        }
    };

    view! {
        <TableHeaderCell min_width=min_width>
            <div
                class=move || if disabled.get() { "table__sortable-header is-disabled" } else { "table__sortable-header" }
                style=header_style
                on:click=move |_| {
                    if !disabled.get_untracked() {
                        on_sort.run(());
                    }
                }
            >
                {label}
                <span class=indicator_class>
                    {move || get_sort_indicator(is_current.get(), order.get())}
                </span>
            </div>
        </TableHeaderCell>
    }
}
