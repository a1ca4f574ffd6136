use contracts::analytics::{widget_ids as w, AdminFilters};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::approval_modal::ApprovalModal;
use crate::analytics::{spawn_query, PendingQuery};
use crate::dashboards::d503_admin::api::{delete_user, get_users};
use crate::dashboards::d503_admin::state::AdminState;
use crate::shared::chart::{provide_chart_registry, ChartCanvas};
use crate::shared::components::WidgetCard;
use crate::shared::format::{format_thousands, short_datetime, PLACEHOLDER};
use crate::shared::modal::confirm;
use crate::shared::reference_api::{get_faculties, get_subjects};
use crate::shared::toast::use_toasts;
use crate::system::auth::session::SessionContext;

#[component]
pub fn AdminDashboard(session: SessionContext) -> impl IntoView {
    provide_chart_registry();
    let toasts = use_toasts();
    let state = RwSignal::new(AdminState::new(session.id()));

    let send = move |batch: Option<PendingQuery<AdminFilters>>| {
        if let Some(batch) = batch {
            spawn_query(state, batch, toasts);
        }
    };
    let reload = move |ids: &'static [&'static str]| {
        send(state.try_update(|s| s.reload(ids)));
    };

    let load_pending = move || {
        let Some(generation) = state.try_update(|s| s.begin_pending()).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = get_users().await;
            if let Err(e) = &result {
                toasts.error(e);
            }
            state.try_update(|s| s.finish_pending(generation, result));
        });
    };

    send(state.try_update(|s| s.load_all()));
    load_pending();

    spawn_local(async move {
        match get_faculties().await {
            Ok(faculties) => {
                state.try_update(|s| s.set_faculties(faculties));
            }
            Err(e) => log::warn!("faculties load failed: {}", e),
        }
    });
    spawn_local(async move {
        match get_subjects().await {
            Ok(subjects) => {
                state.try_update(|s| s.set_subjects(subjects));
            }
            Err(e) => log::warn!("subjects load failed: {}", e),
        }
    });

    // одно удаление за раз
    let rejecting = RwSignal::new(None::<i64>);
    let reject = move |user_id: i64| {
        if rejecting.get_untracked().is_some() || !confirm("Отклонить заявку и удалить пользователя?") {
            return;
        }
        rejecting.set(Some(user_id));
        spawn_local(async move {
            match delete_user(user_id).await {
                Ok(()) => {
                    toasts.success("Пользователь удален.");
                    load_pending();
                }
                Err(e) => toasts.error(&e),
            }
            rejecting.try_set(None);
        });
    };

    let on_approved = Callback::new(move |_| {
        load_pending();
        send(state.try_update(|s| s.load_all()));
    });

    let pending_rows = move || {
        state
            .with(|s| s.pending_users())
            .into_iter()
            .map(|user| {
                let user_id = user.id;
                let created = user
                    .created_at
                    .as_deref()
                    .map(short_datetime)
                    .unwrap_or_else(|| PLACEHOLDER.to_string());
                view! {
                    <TableRow>
                        <TableCell>{user_id.to_string()}</TableCell>
                        <TableCell>
                            <TableCellLayout truncate=true>{user.full_name}</TableCellLayout>
                        </TableCell>
                        <TableCell>{user.login}</TableCell>
                        <TableCell>{user.email.unwrap_or_else(|| PLACEHOLDER.to_string())}</TableCell>
                        <TableCell>{created}</TableCell>
                        <TableCell>
                            <div class="table__actions">
                                <Button
                                    size=ButtonSize::Small
                                    appearance=ButtonAppearance::Primary
                                    on_click=move |_| state.update(|s| s.open_approval(user_id))
                                >
                                    "Подтвердить"
                                </Button>
                                <Button
                                    size=ButtonSize::Small
                                    appearance=ButtonAppearance::Secondary
                                    disabled=Signal::derive(move || rejecting.get() == Some(user_id))
                                    on_click=move |_| reject(user_id)
                                >
                                    "Удалить"
                                </Button>
                            </div>
                        </TableCell>
                    </TableRow>
                }
            })
            .collect_view()
    };

    view! {
        <div class="dashboard dashboard--admin">
            <div class="dashboard__grid">
                <WidgetCard
                    title="Распределение персонала"
                    status=Signal::derive(move || state.with(|s| s.roles.status()))
                    on_retry=Callback::new(move |_| reload(&[w::ROLE_STATISTICS]))
                >
                    <ChartCanvas
                        slot_id="admin-roles"
                        spec=Signal::derive(move || state.with(|s| s.roles_spec()))
                    />
                </WidgetCard>
                <WidgetCard
                    title="Статистика по статусам"
                    status=Signal::derive(move || state.with(|s| s.statuses.status()))
                    on_retry=Callback::new(move |_| reload(&[w::USER_STATUS_OVERVIEW]))
                >
                    <ul class="status-list">
                        {move || state.with(|s| s.status_rows())
                            .into_iter()
                            .map(|(label, count)| view! {
                                <li class="status-list__item">
                                    <span>{label}</span>
                                    <strong>{format_thousands(count as f64)}</strong>
                                </li>
                            })
                            .collect_view()}
                    </ul>
                </WidgetCard>
            </div>

            <WidgetCard
                title="Заявки на регистрацию"
                class="widget--wide"
                status=Signal::derive(move || state.with(|s| s.pending.status()))
                on_retry=Callback::new(move |_| load_pending())
            >
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=60.0>"ID"</TableHeaderCell>
                            <TableHeaderCell min_width=200.0>"ФИО"</TableHeaderCell>
                            <TableHeaderCell>"Логин"</TableHeaderCell>
                            <TableHeaderCell>"Email"</TableHeaderCell>
                            <TableHeaderCell>"Дата"</TableHeaderCell>
                            <TableHeaderCell min_width=220.0>"Действия"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>{pending_rows}</TableBody>
                </Table>
            </WidgetCard>

            <Show when=move || state.with(|s| s.approval.is_some())>
                <ApprovalModal state=state on_approved=on_approved />
            </Show>
        </div>
    }
}
