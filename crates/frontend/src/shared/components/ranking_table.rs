//! Таблица рейтинга: заголовки с сортировкой, выбор колонок, подсветка своей строки.

use leptos::prelude::*;
use thaw::*;

use super::sortable_header_cell::SortableHeaderCell;
use crate::controllers::ranking_table::{RankedRow, RankingColumn};
use crate::shared::list_utils::SortOrder;

#[component]
pub fn RankingTableView(
    /// Все колонки таблицы (для выбора видимых)
    columns: Vec<RankingColumn>,
    #[prop(into)]
    visible: Signal<Vec<RankingColumn>>,
    #[prop(into)]
    rows: Signal<Vec<RankedRow>>,
    #[prop(into)]
    sort: Signal<Option<(RankingColumn, SortOrder)>>,
    /// Идёт обновление: сортировка заблокирована
    #[prop(into)]
    busy: Signal<bool>,
    on_sort: Callback<RankingColumn>,
    on_toggle_column: Callback<RankingColumn>,
) -> impl IntoView {
    let column_picker = columns
        .into_iter()
        .map(|column| {
            view! {
                <label class="column-picker__item">
                    <input
                        type="checkbox"
                        prop:checked=move || visible.get().contains(&column)
                        on:change=move |_| on_toggle_column.run(column)
                    />
                    {column.label()}
                </label>
            }
        })
        .collect_view();

    let header = move || {
        visible
            .get()
            .into_iter()
            .map(|column| {
                view! {
                    <SortableHeaderCell
                        label=column.label()
                        is_current=Signal::derive(move || sort.get().map(|(c, _)| c) == Some(column))
                        order=Signal::derive(move || sort.get().map(|(_, o)| o).unwrap_or_default())
                        on_sort=Callback::new(move |_| on_sort.run(column))
                        disabled=busy
                        align=if column.is_numeric() { "right" } else { "left" }
                    />
                }
            })
            .collect_view()
    };

    let body = move || {
        let columns = visible.get();
        rows.get()
            .into_iter()
            .map(|row| {
                let cells = columns
                    .iter()
                    .map(|&column| {
                        let class = if column.is_numeric() { "cell--numeric" } else { "" };
                        let text = column.cell(&row);
                        view! {
                            <TableCell class=class>
                                <TableCellLayout truncate=true>{text}</TableCellLayout>
                            </TableCell>
                        }
                    })
                    .collect::<Vec<_>>();
                let row_class = if row.is_me { "ranking__row ranking__row--me" } else { "ranking__row" };
                view! { <TableRow class=row_class>{cells}</TableRow> }
            })
            .collect_view()
    };

    view! {
        <div class="ranking">
            <div class="column-picker">{column_picker}</div>
            <div class="table-wrapper">
                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>{header}</TableRow>
                    </TableHeader>
                    <TableBody>{body}</TableBody>
                </Table>
            </div>
            <Show when=move || rows.with(|r| r.is_empty())>
                <div class="widget__placeholder widget__placeholder--empty">"Ничего не найдено"</div>
            </Show>
        </div>
    }
}
