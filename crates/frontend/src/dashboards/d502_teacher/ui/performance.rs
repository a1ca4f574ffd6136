use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use contracts::domain::academic::StudentGroup;

use super::{scroll_metrics, subject_options};
use crate::analytics::SlotStatus;
use crate::controllers::subject_roster::{GroupContent, GroupsState};
use crate::dashboards::d502_teacher::api::{get_performance, get_relevant_groups, grant_achievement};
use crate::dashboards::d502_teacher::state::{mark_class, PerformanceRow, TeacherState};
use crate::shared::components::{SearchInput, WidgetCard};
use crate::shared::config::config;
use crate::shared::format::format_mark;
use crate::shared::toast::{use_toasts, ToastService};

fn load_content(state: RwSignal<TeacherState>, groups: Vec<i64>) {
    for group_id in groups {
        let Some((subject, generation)) = state.try_update(|s| s.performance.begin_content(group_id)).flatten() else {
            continue;
        };
        spawn_local(async move {
            let result = get_performance(group_id, subject).await;
            state.try_update(|s| s.finish_performance(group_id, generation, result));
        });
    }
}

pub(super) fn select_subject(state: RwSignal<TeacherState>, subject: Option<i64>) {
    let Some(generation) = state.try_update(|s| s.performance.select_subject(subject)).flatten() else {
        return;
    };
    let Some(subject) = subject else {
        return;
    };
    spawn_local(async move {
        let result = get_relevant_groups(subject).await;
        if let Some(preload) = state.try_update(|s| s.performance.finish_groups(generation, result)) {
            load_content(state, preload);
        }
    });
}

fn grant(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64, student_id: i64) {
    match state.try_update(|s| s.begin_grant(group_id, student_id)) {
        Some(Ok(Some((generation, dto)))) => spawn_local(async move {
            let result = grant_achievement(&dto).await;
            match &result {
                Ok(()) => toasts.success("Достижение начислено"),
                Err(e) => toasts.error(e),
            }
            state.try_update(|s| s.finish_grant(group_id, student_id, generation, result));
        }),
        Some(Err(e)) => toasts.error(&e),
        _ => {}
    }
}

fn grant_cell(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64, student_id: i64) -> impl IntoView {
    let grant_state = Memo::new(move |_| state.with(|s| s.grant_state(group_id, student_id)));
    move || {
        let Some(grant_state) = grant_state.get() else {
            return ().into_any();
        };
        if let Some(name) = grant_state.granted() {
            return view! { <span class="grant__done">{format!("Начислено: {}", name)}</span> }.into_any();
        }
        let enabled = grant_state.is_select_enabled();
        let selected = grant_state.selected();
        let error = grant_state.error().map(str::to_string);
        let types = state.with_untracked(|s| s.achievement_types().to_vec());

        view! {
            <div class="grant">
                <select
                    class="form__select form__select--small"
                    disabled=!enabled
                    on:change=move |ev| {
                        let type_id = event_target_value(&ev).parse::<i64>().ok();
                        state.update(|s| s.select_achievement(group_id, student_id, type_id));
                    }
                >
                    <option value="" selected=selected.is_none()>"Достижение..."</option>
                    {types
                        .into_iter()
                        .map(|t| view! {
                            <option value=t.id.to_string() selected=selected == Some(t.id)>{t.name}</option>
                        })
                        .collect_view()}
                </select>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Secondary
                    disabled=!enabled
                    on_click=move |_| grant(state, toasts, group_id, student_id)
                >
                    "Начислить"
                </Button>
                {error.map(|e| view! { <span class="field-error">{e}</span> })}
            </div>
        }
        .into_any()
    }
}

fn performance_rows(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64, rows: Vec<PerformanceRow>) -> AnyView {
    if rows.is_empty() {
        return view! { <p class="roster__hint">"Пустая группа"</p> }.into_any();
    }
    rows.into_iter()
        .map(|row| {
            let average = row.student.average_mark;
            let grant = row
                .student
                .student_id
                .map(|student_id| grant_cell(state, toasts, group_id, student_id));
            view! {
                <div class="performance__row">
                    <div class="performance__name">{row.student.student_full_name}</div>
                    <div class=mark_class(average)>{format_mark(average)}</div>
                    {grant}
                </div>
            }
        })
        .collect_view()
        .into_any()
}

/// Body of an open group, rebuilt only when its content is (re)loaded.
fn group_body(state: RwSignal<TeacherState>, toasts: ToastService, group_id: i64) -> impl IntoView {
    let stamp = Memo::new(move |_| state.with(|s| s.performance.content_stamp(group_id)));
    move || match stamp.get() {
        Some((_, GroupContent::Ready(()))) => {
            let rows = state.with_untracked(|s| match s.performance.content(group_id) {
                Some(GroupContent::Ready(rows)) => Some(rows.clone()),
                _ => None,
            });
            match rows {
                Some(rows) => performance_rows(state, toasts, group_id, rows),
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
    let is_open = Memo::new(move |_| state.with(|s| s.performance.groups.is_open(group_id)));
    view! {
        <div class="roster__item" class:roster__item--open=move || is_open.get()>
            <div
                class="roster__header"
                on:click=move |_| state.update(|s| s.performance.groups.toggle(group_id))
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
pub fn PerformanceWidget(state: RwSignal<TeacherState>) -> impl IntoView {
    let toasts = use_toasts();
    let threshold = config().roster.scroll_threshold_px as f64;
    let selected = Signal::derive(move || state.with(|s| s.performance.subject()));

    let groups_state = Memo::new(move |_| state.with(|s| s.performance.groups_state().clone()));
    let visible = Memo::new(move |_| {
        state.with(|s| s.performance.groups.visible().into_iter().cloned().collect::<Vec<StudentGroup>>())
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
            title="Успеваемость групп"
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
                        value=Signal::derive(move || state.with(|s| s.performance.groups.search().to_string()))
                        on_change=Callback::new(move |term: String| {
                            if let Some(missing) = state.try_update(|s| s.performance.set_search(&term)) {
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
                            let appended = s.performance.on_scroll(top, client, height, threshold);
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
