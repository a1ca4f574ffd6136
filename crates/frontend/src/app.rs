//! Корневой компонент: загрузка сессии, шапка и выбор панели по роли.

use contracts::system::auth::RoleName;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::{AdminDashboard, DeanDashboard, RectorateDashboard, StudentDashboard, TeacherDashboard};
use crate::shared::date_utils::today;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use crate::shared::reports::{fetch_report, global_report};
use crate::shared::toast::{provide_toasts, use_toasts, ToastContainer};
use crate::system::auth::api::fetch_current_user;
use crate::system::auth::session::{logout, SessionContext};

pub const NO_DASHBOARD_TEXT: &str = "Для вашей роли панель не настроена.";

#[component]
pub fn App() -> impl IntoView {
    provide_toasts();

    let session = RwSignal::new(None::<SessionContext>);
    let failed = RwSignal::new(None::<String>);

    spawn_local(async move {
        match fetch_current_user().await {
            Ok(user) => {
                log::info!("Signed in as {} ({:?})", user.login, user.role_name);
                session.set(Some(SessionContext::new(user)));
            }
            // 401/403 уже увели на страницу входа
            Err(e) if e.is_session_failure() => {}
            Err(e) => {
                log::error!("Failed to load current user: {}", e);
                failed.set(Some(e.to_string()));
            }
        }
    });

    view! {
        <div class="app">
            {move || match (session.get(), failed.get()) {
                (Some(session), _) => view! { <Shell session=session /> }.into_any(),
                (None, Some(message)) => view! {
                    <div class="app__placeholder app__placeholder--error">{message}</div>
                }
                .into_any(),
                (None, None) => view! {
                    <div class="app__placeholder">
                        <Spinner />
                    </div>
                }
                .into_any(),
            }}
            <ToastContainer />
        </div>
    }
}

#[component]
fn Shell(session: SessionContext) -> impl IntoView {
    let role = session.role();
    let dashboard = match role {
        RoleName::Student => view! { <StudentDashboard session=session.clone() /> }.into_any(),
        RoleName::DeanStaff => view! { <DeanDashboard session=session.clone() /> }.into_any(),
        RoleName::Teacher => view! { <TeacherDashboard session=session.clone() /> }.into_any(),
        RoleName::Administrator => view! { <AdminDashboard session=session.clone() /> }.into_any(),
        RoleName::RectorateStaff => view! { <RectorateDashboard session=session.clone() /> }.into_any(),
        RoleName::Unknown => {
            log::warn!("No dashboard for role of user {}", session.id());
            view! { <div class="app__placeholder">{NO_DASHBOARD_TEXT}</div> }.into_any()
        }
    };

    view! {
        <TopHeader session=session />
        <main class="app__content">{dashboard}</main>
    }
}

#[component]
fn TopHeader(session: SessionContext) -> impl IntoView {
    let profile_open = RwSignal::new(false);
    let report_busy = RwSignal::new(false);
    let toasts = use_toasts();
    let rows = StoredValue::new(session.profile_rows());
    let is_rectorate = session.role() == RoleName::RectorateStaff;

    let on_global_report = move |_| {
        if report_busy.get_untracked() {
            return;
        }
        report_busy.set(true);
        let request = global_report(today());
        spawn_local(async move {
            fetch_report(&request, toasts).await;
            report_busy.try_set(false);
        });
    };

    view! {
        <header class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title">"Рейтинг студентов"</span>
                <span class="top-header__role">{session.role().label()}</span>
            </div>
            <div class="top-header__actions">
                <Show when=move || is_rectorate>
                    <Button appearance=ButtonAppearance::Secondary disabled=report_busy on_click=on_global_report>
                        {icon("download")}
                        {move || if report_busy.get() { " Генерация..." } else { " Глобальный отчет" }}
                    </Button>
                </Show>
                <button
                    class="top-header__user"
                    title="Профиль"
                    on:click=move |_| profile_open.set(true)
                >
                    {icon("user")}
                    <span>{session.full_name().to_string()}</span>
                </button>
                <button class="top-header__icon-btn" title="Выйти" on:click=move |_| logout()>
                    {icon("logout")}
                </button>
            </div>
        </header>
        <Show when=move || profile_open.get()>
            <Modal title="Профиль пользователя" on_close=Callback::new(move |_| profile_open.set(false))>
                <dl class="profile">
                    {rows
                        .get_value()
                        .into_iter()
                        .map(|(label, value)| view! {
                            <dt>{label}</dt>
                            <dd>{value}</dd>
                        })
                        .collect_view()}
                </dl>
            </Modal>
        </Show>
    }
}
