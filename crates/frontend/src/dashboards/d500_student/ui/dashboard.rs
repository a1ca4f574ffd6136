use contracts::analytics::{dynamics_lines, widget_ids as w, ComparisonContext, StudentFilters};
use leptos::prelude::*;
use thaw::*;

use crate::analytics::{spawn_query, PendingQuery};
use crate::controllers::dynamics::line_label;
use crate::controllers::ranking_table::RankingColumn;
use crate::dashboards::d500_student::state::StudentState;
use crate::shared::chart::{provide_chart_registry, ChartCanvas};
use crate::shared::components::kpi_card::KpiTone;
use crate::shared::components::{KpiCard, RankingTableView, SearchInput, WidgetCard};
use crate::shared::toast::use_toasts;
use crate::system::auth::session::SessionContext;

#[component]
pub fn StudentDashboard(session: SessionContext) -> impl IntoView {
    provide_chart_registry();
    let toasts = use_toasts();
    let state = RwSignal::new(StudentState::new(session.id()));

    let send = move |batch: Option<PendingQuery<StudentFilters>>| {
        if let Some(batch) = batch {
            spawn_query(state, batch, toasts);
        }
    };
    let reload = move |ids: &'static [&'static str]| {
        send(state.try_update(|s| s.reload(ids)));
    };

    send(state.try_update(|s| s.load_all()));

    // -- KPI ---------------------------------------------------------------
    let kpi_busy = Signal::derive(move || state.with(|s| s.scores.is_busy()));
    let rank_busy = Signal::derive(move || state.with(|s| s.rank.is_busy()));

    let on_context = move |code: String| {
        if let Some(context) = ComparisonContext::from_code(&code) {
            send(state.try_update(|s| s.set_context(context)).flatten());
        }
    };

    // -- dynamics ----------------------------------------------------------
    let compare_input = RwSignal::new(String::new());
    let lines_error = RwSignal::new(None::<String>);
    let compare_field_error = RwSignal::new(None::<String>);

    let apply_lines = move |_| match state.try_update(|s| s.apply_lines()) {
        Some(Ok(batch)) => {
            lines_error.set(None);
            send(batch);
        }
        Some(Err(e)) => lines_error.set(Some(e.to_string())),
        None => {}
    };

    let apply_compare = move |_| {
        let input = compare_input.get_untracked();
        match state.try_update(|s| s.request_compare(&input)) {
            Some(Ok(batch)) => {
                compare_field_error.set(None);
                send(batch);
            }
            Some(Err(e)) => compare_field_error.set(Some(e.to_string())),
            None => {}
        }
    };

    let compare_error = move || {
        compare_field_error
            .get()
            .or_else(|| state.with(|s| s.dynamics.compare_error().map(str::to_string)))
    };

    let line_picker = move || {
        dynamics_lines::ALL
            .iter()
            .map(|line| {
                let line = *line;
                view! {
                    <label class="line-picker__item">
                        <input
                            type="checkbox"
                            prop:checked=move || state.with(|s| s.dynamics.draft().contains(line))
                            on:change=move |_| state.update(|s| s.dynamics.toggle_draft(line))
                        />
                        {line_label(line)}
                    </label>
                }
            })
            .collect_view()
    };

    // -- ranking -------------------------------------------------------------
    let on_semester = move |value: String| {
        let semester = value.parse::<u32>().ok();
        send(state.try_update(|s| s.select_semester(semester)).flatten());
    };

    view! {
        <div class="dashboard dashboard--student">
            <div class="kpi-row">
                <KpiCard
                    label="Итоговый балл"
                    icon_name="award"
                    value=Signal::derive(move || state.with(|s| s.total_text()))
                    subtitle=Signal::derive(move || state.with(|s| s.formula_text()))
                    busy=kpi_busy
                />
                <KpiCard
                    label="Средний балл"
                    icon_name="book"
                    value=Signal::derive(move || state.with(|s| s.average_text()))
                    busy=kpi_busy
                />
                <div class="kpi-with-control">
                    <KpiCard
                        label="Место в рейтинге"
                        icon_name="trophy"
                        value=Signal::derive(move || state.with(|s| s.rank_text()))
                        subtitle=Signal::derive(move || {
                            Some(state.with(|s| s.filters().comparison_context.label().to_string()))
                        })
                        busy=rank_busy
                    />
                    <select
                        class="form__select"
                        disabled=move || rank_busy.get()
                        on:change=move |ev| on_context(event_target_value(&ev))
                    >
                        {ComparisonContext::ALL
                            .into_iter()
                            .map(|c| view! {
                                <option
                                    value=c.code()
                                    selected=move || state.with(|s| s.filters().comparison_context == c)
                                >
                                    {c.label()}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </div>
                <KpiCard
                    label="Пропуски (уваж. / неуваж.)"
                    icon_name="clock"
                    value=Signal::derive(move || state.with(|s| s.absence_text()))
                    subtitle=Signal::derive(move || Some(state.with(|s| s.penalty_text())))
                    tone=Signal::derive(move || {
                        let penalty = state.with(|s| s.components().and_then(|c| c.absence_penalty));
                        if penalty.is_some_and(|p| p > 0.0) { KpiTone::Bad } else { KpiTone::Neutral }
                    })
                    busy=kpi_busy
                />
            </div>

            <div class="dashboard__grid">
                <WidgetCard
                    title="Структура баллов"
                    status=Signal::derive(move || state.with(|s| s.breakdown.status()))
                    on_retry=Callback::new(move |_| reload(&[w::MY_SCORE_BREAKDOWN]))
                >
                    <ChartCanvas
                        slot_id="student-breakdown"
                        spec=Signal::derive(move || state.with(|s| s.breakdown_spec()))
                    />
                </WidgetCard>

                <WidgetCard
                    title="Динамика рейтинга"
                    class="widget--wide"
                    status=Signal::derive(move || state.with(|s| s.dynamics.slot().status()))
                    on_retry=Callback::new(move |_| reload(&[w::MY_RANK_DYNAMICS]))
                    toolbar=move || view! {
                        <div class="dynamics-controls">
                            <div class="line-picker">{line_picker()}</div>
                            <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=apply_lines>
                                "Применить"
                            </Button>
                            {move || lines_error.get().map(|e| view! { <span class="field-error">{e}</span> })}
                            <div class="compare-input">
                                <Input value=compare_input placeholder="ID студента для сравнения" />
                                <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=apply_compare>
                                    "Сравнить"
                                </Button>
                                {move || compare_error().map(|e| view! { <span class="field-error">{e}</span> })}
                            </div>
                        </div>
                    }
                >
                    <ChartCanvas
                        slot_id="student-dynamics"
                        spec=Signal::derive(move || state.with(|s| s.dynamics.chart_spec()))
                        height=320
                    />
                </WidgetCard>
            </div>

            <WidgetCard
                title="Рейтинг студентов"
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
                            placeholder="Поиск по ID"
                        />
                    </div>
                }
            >
                <RankingTableView
                    columns=RankingColumn::STUDENT.to_vec()
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
