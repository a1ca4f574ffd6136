use contracts::analytics::{widget_ids as w, RectorateFilters};
use contracts::domain::academic::Faculty;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::analytics::{spawn_query, PendingQuery};
use crate::controllers::cascade::COURSES;
use crate::dashboards::d504_rectorate::state::RectorateState;
use crate::shared::chart::{provide_chart_registry, ChartCanvas};
use crate::shared::components::kpi_card::KpiTone;
use crate::shared::components::{KpiCard, WidgetCard};
use crate::shared::date_utils::today;
use crate::shared::icons::icon;
use crate::shared::reference_api::get_faculties;
use crate::shared::reports::{admin_report, dean_report, fetch_report};
use crate::shared::toast::use_toasts;
use crate::system::auth::session::SessionContext;

#[component]
pub fn RectorateDashboard(session: SessionContext) -> impl IntoView {
    provide_chart_registry();
    let toasts = use_toasts();
    let state = RwSignal::new(RectorateState::new(session.id()));

    let send = move |batch: Option<PendingQuery<RectorateFilters>>| {
        if let Some(batch) = batch {
            spawn_query(state, batch, toasts);
        }
    };
    let reload = move |ids: &'static [&'static str]| {
        send(state.try_update(|s| s.reload(ids)));
    };

    send(state.try_update(|s| s.load_all()));

    // -- reports -------------------------------------------------------------
    let faculties = RwSignal::new(Vec::<Faculty>::new());
    let report_faculty = RwSignal::new(None::<i64>);
    let report_course = RwSignal::new(1u8);
    let admin_busy = RwSignal::new(false);
    let dean_busy = RwSignal::new(false);

    spawn_local(async move {
        match get_faculties().await {
            Ok(items) => faculties.set(items),
            Err(e) => toasts.error(&e),
        }
    });

    let on_admin_report = move |_| {
        if admin_busy.get_untracked() {
            return;
        }
        admin_busy.set(true);
        let request = admin_report(today());
        spawn_local(async move {
            fetch_report(&request, toasts).await;
            admin_busy.try_set(false);
        });
    };

    let on_dean_report = move |_| {
        if dean_busy.get_untracked() {
            return;
        }
        let request = match dean_report(report_faculty.get_untracked(), report_course.get_untracked(), today()) {
            Ok(request) => request,
            Err(e) => return toasts.error(&e),
        };
        dean_busy.set(true);
        spawn_local(async move {
            fetch_report(&request, toasts).await;
            dean_busy.try_set(false);
        });
    };

    let metric_busy = Signal::derive(move || {
        state.with(|s| s.faculties.is_busy() || s.education.is_busy() || s.activity.is_busy())
    });

    view! {
        <div class="dashboard dashboard--rectorate">
            <div class="kpi-row">
                {move || state.with(|s| s.metrics())
                    .into_iter()
                    .zip(["users", "book", "trophy"])
                    .map(|((label, value), icon_name)| view! {
                        <KpiCard
                            label=label
                            icon_name=icon_name
                            value=Signal::derive(move || value.clone())
                            tone=KpiTone::Neutral
                            busy=metric_busy
                        />
                    })
                    .collect_view()}
            </div>

            <div class="dashboard__grid">
                <WidgetCard
                    title="Успеваемость факультетов"
                    status=Signal::derive(move || state.with(|s| s.faculties.status()))
                    on_retry=Callback::new(move |_| reload(&[w::FACULTY_PERFORMANCE_COMPARISON]))
                >
                    <div class="perf-list">
                        {move || state.with(|s| s.faculty_lines())
                            .into_iter()
                            .map(|line| view! {
                                <div class="perf-item">
                                    <span class="perf-name" title=line.full_name>{line.short_name}</span>
                                    <span class=line.class>{line.average}</span>
                                </div>
                            })
                            .collect_view()}
                    </div>
                </WidgetCard>
                <WidgetCard
                    title="Формы обучения"
                    status=Signal::derive(move || state.with(|s| s.education.status()))
                    on_retry=Callback::new(move |_| reload(&[w::EDUCATION_FORM_DISTRIBUTION]))
                >
                    <ChartCanvas
                        slot_id="rectorate-education"
                        spec=Signal::derive(move || state.with(|s| s.education_spec()))
                    />
                </WidgetCard>
                <WidgetCard
                    title="Внеучебная активность по факультетам"
                    class="widget--wide"
                    status=Signal::derive(move || state.with(|s| s.activity.status()))
                    on_retry=Callback::new(move |_| reload(&[w::EXTRACURRICULAR_ACTIVITY_OVERVIEW]))
                >
                    <ChartCanvas
                        slot_id="rectorate-activity"
                        spec=Signal::derive(move || state.with(|s| s.activity_spec()))
                        height=320
                    />
                </WidgetCard>
            </div>

            <section class="widget reports">
                <header class="widget__header">
                    <h3 class="widget__title">"Отчеты"</h3>
                </header>
                <div class="widget__body reports__body">
                    <div class="reports__item">
                        <span>"Сводный отчет администратора"</span>
                        <Button appearance=ButtonAppearance::Secondary disabled=admin_busy on_click=on_admin_report>
                            {icon("download")}
                            {move || if admin_busy.get() { " Генерация..." } else { " Скачать" }}
                        </Button>
                    </div>
                    <div class="reports__item">
                        <select
                            class="form__select"
                            on:change=move |ev| report_faculty.set(event_target_value(&ev).parse::<i64>().ok())
                        >
                            <option value="">"-- Выберите факультет --"</option>
                            {move || faculties
                                .get()
                                .into_iter()
                                .map(|f| view! { <option value=f.id.to_string()>{f.name}</option> })
                                .collect_view()}
                        </select>
                        <select
                            class="form__select"
                            on:change=move |ev| {
                                if let Ok(course) = event_target_value(&ev).parse::<u8>() {
                                    report_course.set(course);
                                }
                            }
                        >
                            {COURSES
                                .into_iter()
                                .map(|c| view! { <option value=c.to_string()>{format!("{} курс", c)}</option> })
                                .collect_view()}
                        </select>
                        <Button appearance=ButtonAppearance::Secondary disabled=dean_busy on_click=on_dean_report>
                            {icon("download")}
                            {move || if dean_busy.get() { " Генерация..." } else { " Отчет деканата" }}
                        </Button>
                    </div>
                </div>
            </section>
        </div>
    }
}
