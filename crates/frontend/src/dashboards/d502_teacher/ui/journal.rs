use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use contracts::domain::academic::StudentGroup;

use super::{scroll_metrics, subject_options};
use crate::controllers::journal::{JournalTable, TodayCell, MARK_HINT};
use crate::controllers::subject_roster::{GroupContent, GroupsState};
use crate::dashboards::d502_teacher::api::{get_journal, get_relevant_groups, save_journal_entry};
use crate::dashboards::d502_teacher::state::TeacherState;
use crate::analytics::SlotStatus;
use crate::shared::components::{SearchInput, WidgetCard};
use crate::shared::config::config;
use crate::shared::date_utils::today;
use crate::shared::toast::{use_toasts, ToastService};

fn load_content(state: RwSignal<TeacherState>, groups: Vec<i64>) {
    for group_id in groups {
        let Some((subject, generation)) = state.try_update(|s| s.journal.begin_content(group_id)).flatten() else {
            continue;
        };
        spawn_local(async move {
            let result = get_journal(group_id, subject).await;
            state.try_update(|s| s.finish_journal(group_id, generation, result, today()));
        });
    }
}

pub(super) fn select_subject(state: RwSignal<TeacherState>, subject: Option<i64>) {
    let Some(generation) = state.try_update(|s| s.journal.select_subject(subject)).flatten() else {
        return;
    };
    let Some(subject) = subject else {
        return;
    };
    spawn_local(async move {
        let result = get_relevant_groups(subject).await;
        if let Some(preload) = state.try_update(|s| s.journal.finish_groups(generation, result)) {
            load_content(state, preload);
        }
    });
}

fn save_mark(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64, student_id: i64, input: String) {
    let hours = config().journal.absence_hours;
    match state.try_update(|s| s.begin_mark(group_id, student_id, &input, hours)) {
        Some(Ok(Some(write))) => spawn_local(async move {
            let result = save_journal_entry(&write).await;
            match &result {
                Ok(()) => toasts.success("Сохранено"),
                Err(e) => toasts.error(e),
            }
            state.try_update(|s| s.finish_mark(group_id, &write, &result));
        }),
        Some(Err(e)) => toasts.error(&e),
        _ => {}
    }
}

fn today_cell(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64, student_id: i64) -> impl IntoView {
    let cell = Memo::new(move |_| state.with(|s| s.journal_today(group_id, student_id)));
    move || match cell.get() {
        Some(TodayCell::Open) => view! {
            <input
                class="journal__input"
                placeholder="1-10 / н"
                title=MARK_HINT
                on:change=move |ev| save_mark(state, toasts, group_id, student_id, event_target_value(&ev))
            />
        }
        .into_any(),
        Some(TodayCell::Saving) => view! { <Spinner /> }.into_any(),
        Some(TodayCell::Recorded(value)) => view! {
            <span class="journal__mark journal__mark--today">{value}</span>
        }
        .into_any(),
        None => ().into_any(),
    }
}

fn journal_table(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64, table: JournalTable) -> AnyView {
    if table.rows().is_empty() {
        return view! { <p class="roster__hint">"Пустая группа"</p> }.into_any();
    }
    let headers = table.headers();
    let today_header = table.today_header();
    let rows = table.rows().to_vec();

    view! {
        <div class="journal__scroll">
            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell min_width=200.0>"Студент"</TableHeaderCell>
                        {headers.into_iter().map(|h| view! { <TableHeaderCell>{h}</TableHeaderCell> }).collect_view()}
                        <TableHeaderCell min_width=120.0>{today_header}</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {rows
                        .into_iter()
                        .map(|row| {
                            let cells = row
                                .cells
                                .into_iter()
                                .map(|cell| view! { <TableCell><span class="journal__mark">{cell}</span></TableCell> })
                                .collect_view();
                            view! {
                                <TableRow>
                                    <TableCell>
                                        <TableCellLayout truncate=true>{row.name}</TableCellLayout>
                                    </TableCell>
                                    {cells}
                                    <TableCell>{today_cell(state, toasts, group_id, row.student_id)}</TableCell>
                                </TableRow>
                            }
                        })
                        .collect_view()}
                </TableBody>
            </Table>
        </div>
    }
    .into_any()
}

/// Body of an open group. Rebuilt only when the group's content is
/// (re)loaded; saving a mark touches just the row's today cell.
fn group_body(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64) -> impl IntoView {
    let stamp = Memo::new(move |_| state.with(|s| s.journal.content_stamp(group_id)));
    move || match stamp.get() {
        Some((_, GroupContent::Ready(()))) => {
            let table = state.with_untracked(|s| match s.journal.content(group_id) {
                Some(GroupContent::Ready(table)) => Some(table.clone()),
                _ => None,
            });
            match table {
                Some(table) => journal_table(state, toasts, group_id, table),
                None => view! { <Spinner /> }.into_any(),
            }
        }
        Some((_, GroupContent::Failed(message))) => view! {
            <div class="roster__error">
                <span>{message}</span>
                <Button size=ButtonSize::Small on_click=move |_| load_content(state, vec![group_id])>
                    "Повторить"
                </Button>
            </div>
        }
        .into_any(),
        _ => view! { <Spinner /> }.into_any(),
    }
}

fn group_item(state: RwSignal<TeacherState>, toasts: ToastService, group: StudentGroup) -> impl IntoView {
    let group_id = group.id;
    let is_open = Memo::new(move |_| state.with(|s| s.journal.groups.is_open(group_id)));
    view! {
        <div class="roster__item" class:roster__item--open=move || is_open.get()>
            <div
                class="roster__header"
                on:click=move |_| state.update(|s| s.journal.groups.toggle(group_id))
            >
                <span>{group.name}</span>
                <span class="roster__count">{format!("{} студ.", group.student_count)}</span>
            </div>
            <Show when=move || is_open.get()>
                {group_body(state, toasts, group_id)}
            </Show>
        </div>
    }
}

#[component]
pub fn JournalWidget(state: RwSignal<TeacherState>) -> impl IntoView {
    let toasts = use_toasts();
    let threshold = config().roster.scroll_threshold_px as f64;
    let selected = Signal::derive(move || state.with(|s| s.journal.subject()));

    let groups_state = Memo::new(move |_| state.with(|s| s.journal.groups_state().clone()));
    let visible = Memo::new(move |_| {
        state.with(|s| s.journal.groups.visible().into_iter().cloned().collect::<Vec<StudentGroup>>())
    });

    let groups = move || match groups_state.get() {
        GroupsState::Idle => view! { <p class="roster__hint">"Выберите предмет"</p> }.into_any(),
        GroupsState::Loading => view! { <p class="roster__hint">"Загрузка групп..."</p> }.into_any(),
        GroupsState::Failed(message) => view! { <p class="roster__error">{message}</p> }.into_any(),
        GroupsState::Ready => view! {
            <Show
                when=move || visible.with(|v| !v.is_empty())
                fallback=|| view! { <p class="roster__hint">"Группы не найдены"</p> }
            >
                <For
                    each=move || visible.get()
                    key=|group| group.id
                    children=move |group: StudentGroup| group_item(state, toasts, group)
                />
            </Show>
        }
        .into_any(),
    };

    view! {
        <WidgetCard
            title="Журнал успеваемости"
            class="widget--wide"
            status=Signal::derive(|| SlotStatus::Ready)
            toolbar=move || view! {
                <div class="roster-controls">
                    <select
                        class="form__select"
                        on:change=move |ev| select_subject(state, event_target_value(&ev).parse::<i64>().ok())
                    >
                        {subject_options(state, selected)}
                    </select>
                    <SearchInput
                        value=Signal::derive(move || state.with(|s| s.journal.groups.search().to_string()))
                        on_change=Callback::new(move |term: String| {
                            if let Some(missing) = state.try_update(|s| s.journal.set_search(&term)) {
                                load_content(state, missing);
                            }
                        })
                        placeholder="Поиск группы"
                    />
                </div>
            }
        >
            <div
                class="roster"
                on:scroll=move |ev| {
                    if let Some((top, client, height)) = scroll_metrics(&ev) {
                        let appended = state.try_maybe_update(|s| {
                            let appended = s.journal.on_scroll(top, client, height, threshold);
                            (appended.is_some(), appended)
                        });
                        if let Some(missing) = appended.flatten() {
                            load_content(state, missing);
                        }
                    }
                }
            >
                {groups}
            </div>
        </WidgetCard>
    }
}
