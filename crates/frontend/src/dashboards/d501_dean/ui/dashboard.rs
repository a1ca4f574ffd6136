use contracts::analytics::{widget_ids as w, DeanFilters};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::analytics::{spawn_query, PendingQuery};
use crate::controllers::cascade::{OptionsState, COURSES};
use crate::controllers::ranking_table::RankingColumn;
use crate::dashboards::d501_dean::state::DeanState;
use crate::shared::chart::{provide_chart_registry, ChartCanvas};
use crate::shared::components::{RankingTableView, SearchInput, WidgetCard};
use crate::shared::date_utils::{recent_formation_years, today};
use crate::shared::reference_api::get_faculty_groups;
use crate::shared::toast::use_toasts;
use crate::system::auth::session::SessionContext;

#[component]
pub fn DeanDashboard(session: SessionContext) -> impl IntoView {
    provide_chart_registry();
    let toasts = use_toasts();
    let state = RwSignal::new(DeanState::new(session.faculty_id()));
    let faculty_name = session.faculty_name().unwrap_or_default().to_string();
    let years = recent_formation_years(today(), COURSES.len() as u8);

    let send = move |batch: Option<PendingQuery<DeanFilters>>| {
        if let Some(batch) = batch {
            spawn_query(state, batch, toasts);
        }
    };
    let reload = move |ids: &'static [&'static str]| {
        send(state.try_update(|s| s.reload(ids)));
    };

    send(state.try_update(|s| s.load_all()));

    let on_year = move |value: String| {
        let year = value.parse::<i32>().ok();
        let Some((faculty, year, generation)) = state.try_update(|s| s.select_year(year)).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = get_faculty_groups(faculty, year).await;
            if let Err(e) = &result {
                toasts.error(e);
            }
            state.try_update(|s| s.finish_groups(generation, result));
        });
    };

    let on_group = move |value: String| {
        state.update(|s| s.select_group(value.parse::<i64>().ok()));
    };

    let on_apply = move |_| send(state.try_update(|s| s.apply_filters()));

    let on_semester = move |value: String| {
        let semester = value.parse::<u32>().ok();
        send(state.try_update(|s| s.select_semester(semester)).flatten());
    };

    let group_placeholder = move || {
        state.with(|s| match s.groups.state() {
            OptionsState::Disabled => "Сначала выберите год набора",
            OptionsState::Loading => "Загрузка...",
            OptionsState::Failed(_) => "Не удалось загрузить группы",
            OptionsState::Ready(_) => "Все группы",
        })
    };

    view! {
        <div class="dashboard dashboard--dean">
            <div class="filter-bar">
                <span class="filter-bar__title">{faculty_name}</span>
                <select class="form__select" on:change=move |ev| on_year(event_target_value(&ev))>
                    <option value="">"Все годы набора"</option>
                    {years
                        .into_iter()
                        .map(|year| view! { <option value=year.to_string()>{format!("Набор {}", year)}</option> })
                        .collect_view()}
                </select>
                <select
                    class="form__select"
                    disabled=move || state.with(|s| !s.groups.is_enabled())
                    on:change=move |ev| on_group(event_target_value(&ev))
                >
                    <option value="">{group_placeholder}</option>
                    {move || state.with(|s| s.groups.options().to_vec())
                        .into_iter()
                        .map(|g| view! { <option value=g.id.to_string()>{g.name}</option> })
                        .collect_view()}
                </select>
                <Button appearance=ButtonAppearance::Primary on_click=on_apply>
                    "Применить"
                </Button>
            </div>

            <div class="dashboard__grid">
                <WidgetCard
                    title="Динамика среднего балла"
                    status=Signal::derive(move || state.with(|s| s.dynamics.status()))
                    on_retry=Callback::new(move |_| reload(&[w::AVERAGE_SCORE_DYNAMICS]))
                >
                    <ChartCanvas
                        slot_id="dean-dynamics"
                        spec=Signal::derive(move || state.with(|s| s.dynamics_spec()))
                    />
                </WidgetCard>
                <WidgetCard
                    title="Распределение успеваемости"
                    status=Signal::derive(move || state.with(|s| s.distribution.status()))
                    on_retry=Callback::new(move |_| reload(&[w::PERFORMANCE_DISTRIBUTION]))
                >
                    <ChartCanvas
                        slot_id="dean-distribution"
                        spec=Signal::derive(move || state.with(|s| s.distribution_spec()))
                    />
                </WidgetCard>
                <WidgetCard
                    title="Вклад внеучебной деятельности"
                    status=Signal::derive(move || state.with(|s| s.contribution.status()))
                    on_retry=Callback::new(move |_| reload(&[w::CONTRIBUTION_ANALYSIS]))
                >
                    <ChartCanvas
                        slot_id="dean-contribution"
                        spec=Signal::derive(move || state.with(|s| s.contribution_spec()))
                    />
                </WidgetCard>
            </div>

            <WidgetCard
                title="Рейтинг студентов факультета"
                status=Signal::derive(move || state.with(|s| s.ranking.slot().status()))
                on_retry=Callback::new(move |_| reload(&[w::STUDENT_RANKING_LIST]))
                toolbar=move || view! {
                    <div class="ranking-controls">
                        <select
                            class="form__select"
                            on:change=move |ev| on_semester(event_target_value(&ev))
                        >
                            <option value="" selected=move || state.with(|s| s.ranking.semester().is_none())>"Все семестры"</option>
                            {move || state.with(|s| s.ranking.available_semesters())
                                .into_iter()
                                .map(|sem| view! {
                                    <option
                                        value=sem.to_string()
                                        selected=move || state.with(|s| s.ranking.semester() == Some(sem))
                                    >
                                        {format!("Семестр {}", sem)}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                        <SearchInput
                            value=Signal::derive(move || state.with(|s| s.ranking.search().to_string()))
                            on_change=Callback::new(move |term: String| state.update(|s| s.ranking.set_search(&term)))
                            placeholder="Поиск по ФИО или группе"
                        />
                    </div>
                }
            >
                <RankingTableView
                    columns=RankingColumn::DEAN.to_vec()
                    visible=Signal::derive(move || state.with(|s| s.ranking.visible_columns()))
                    rows=Signal::derive(move || state.with(|s| s.ranking.rows()))
                    sort=Signal::derive(move || state.with(|s| s.ranking.sort()))
                    busy=Signal::derive(move || state.with(|s| s.ranking.slot().is_busy()))
                    on_sort=Callback::new(move |column| { state.update(|s| { s.ranking.toggle_sort(column); }); })
                    on_toggle_column=Callback::new(move |column| { state.update(|s| { s.ranking.toggle_column(column); }); })
                />
            </WidgetCard>
        </div>
    }
}
