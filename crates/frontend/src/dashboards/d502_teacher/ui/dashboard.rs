use contracts::analytics::{widget_ids as w, TeacherFilters};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::journal::{self, JournalWidget};
use super::performance::{self, PerformanceWidget};
use crate::analytics::{spawn_query, PendingQuery};
use crate::dashboards::d502_teacher::api::{get_achievement_types, get_my_subjects};
use crate::dashboards::d502_teacher::state::TeacherState;
use crate::shared::chart::{provide_chart_registry, ChartCanvas};
use crate::shared::components::WidgetCard;
use crate::shared::config::config;
use crate::shared::toast::use_toasts;
use crate::system::auth::session::SessionContext;

#[component]
pub fn TeacherDashboard(session: SessionContext) -> impl IntoView {
    provide_chart_registry();
    let toasts = use_toasts();
    let state = RwSignal::new(TeacherState::new(session.id(), config().roster.batch_size));

    let send = move |batch: Option<PendingQuery<TeacherFilters>>| {
        if let Some(batch) = batch {
            spawn_query(state, batch, toasts);
        }
    };
    let reload = move |ids: &'static [&'static str]| {
        send(state.try_update(|s| s.reload(ids)));
    };

    send(state.try_update(|s| s.load_all()));

    spawn_local(async move {
        let result = get_my_subjects().await;
        if let Err(e) = &result {
            toasts.error(e);
        }
        if let Some(subject) = state.try_update(|s| s.finish_subjects(result)).flatten() {
            journal::select_subject(state, Some(subject));
            performance::select_subject(state, Some(subject));
        }
    });

    spawn_local(async move {
        match get_achievement_types().await {
            Ok(types) => {
                state.try_update(|s| s.set_achievement_types(types));
            }
            Err(e) => toasts.error(&e),
        }
    });

    view! {
        <div class="dashboard dashboard--teacher">
            <div class="dashboard__grid">
                <WidgetCard
                    title="Последние достижения"
                    status=Signal::derive(move || state.with(|s| s.achievements.status()))
                    on_retry=Callback::new(move |_| reload(&[w::MY_LATEST_ACHIEVEMENTS]))
                >
                    <ul class="achievement-list">
                        {move || state.with(|s| s.achievement_lines())
                            .into_iter()
                            .map(|(title, meta)| view! {
                                <li class="achievement-list__item">
                                    <strong>{title}</strong>
                                    <small>{meta}</small>
                                </li>
                            })
                            .collect_view()}
                    </ul>
                </WidgetCard>
                <WidgetCard
                    title="Сравнение групп"
                    status=Signal::derive(move || state.with(|s| s.comparison.status()))
                    on_retry=Callback::new(move |_| reload(&[w::MY_GROUP_COMPARISON]))
                >
                    <ChartCanvas
                        slot_id="teacher-groups"
                        spec=Signal::derive(move || state.with(|s| s.comparison_spec()))
                    />
                </WidgetCard>
            </div>
            <JournalWidget state=state />
            <PerformanceWidget state=state />
        </div>
    }
}
