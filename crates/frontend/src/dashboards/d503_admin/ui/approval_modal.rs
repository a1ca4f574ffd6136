use std::sync::Arc;

use contracts::system::auth::RoleName;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::controllers::cascade::{group_hint, GroupChoice, OptionsState, COURSES};
use crate::dashboards::d503_admin::api::{approve_user, assign_role};
use crate::dashboards::d503_admin::approval::{ApprovalForm, ApprovalPlan};
use crate::dashboards::d503_admin::state::AdminState;
use crate::shared::config::config;
use crate::shared::error::DashboardResult;
use crate::shared::modal::{confirm, Modal};
use crate::shared::reference_api::{auto_create_group, get_available_groups, get_specialties};
use crate::shared::toast::{use_toasts, ToastService};

const NEW_GROUP: &str = "new";

fn with_form<R>(state: RwSignal<AdminState>, f: impl FnOnce(&ApprovalForm) -> R) -> Option<R> {
    state.with(|s| s.approval.as_ref().map(f))
}

fn update_form<R>(state: RwSignal<AdminState>, f: impl FnOnce(&mut ApprovalForm) -> R) -> Option<R> {
    state.try_update(|s| s.approval.as_mut().map(f)).flatten()
}

/// Creates the group if asked, approves, then binds the role.
async fn execute(plan: &ApprovalPlan, state: RwSignal<AdminState>, toasts: ToastService) -> DashboardResult<()> {
    let created = match plan.assignment.group_to_create() {
        Some(key @ (faculty_id, specialty_id, course)) => {
            let group = auto_create_group(faculty_id, specialty_id, course).await?;
            toasts.info(format!("Создана группа: {}", group.name));
            update_form(state, |f| f.record_created_group(key, group.id));
            Some(group.id)
        }
        None => None,
    };
    approve_user(plan.user_id, plan.role_id).await?;
    if let Some(assignment) = plan.assignment.resolve(created) {
        assign_role(plan.user_id, &assignment).await?;
    }
    Ok(())
}

#[component]
pub fn ApprovalModal(state: RwSignal<AdminState>, on_approved: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let capacity = config().groups.first_course_capacity;

    let on_close = Callback::new(move |_| state.update(|s| s.close_approval()));

    let on_role = move |code: String| {
        update_form(state, |f| f.select_role(RoleName::from_code(&code)));
    };

    let on_faculty = move |value: String| {
        let faculty = value.parse::<i64>().ok();
        let Some(generation) = update_form(state, |f| f.cascade.select_faculty(faculty)).flatten() else {
            return;
        };
        let Some(faculty) = faculty else {
            return;
        };
        spawn_local(async move {
            let result = get_specialties(faculty).await;
            if let Err(e) = &result {
                toasts.error(e);
            }
            update_form(state, |f| f.cascade.finish_specialties(generation, result));
        });
    };

    let on_specialty = move |value: String| {
        update_form(state, |f| f.cascade.select_specialty(value.parse::<i64>().ok()));
    };

    let on_course = move |value: String| {
        let course = value.parse::<u8>().ok();
        let Some(generation) = update_form(state, |f| f.cascade.select_course(course)).flatten() else {
            return;
        };
        let Some((faculty, specialty, course)) = with_form(state, |f| f.cascade.group_query()).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = get_available_groups(faculty, specialty, course).await;
            if let Err(e) = &result {
                toasts.error(e);
            }
            update_form(state, |f| f.cascade.finish_groups(generation, result));
        });
    };

    let on_group = move |value: String| {
        let choice = if value == NEW_GROUP {
            Some(GroupChoice::CreateNew)
        } else {
            value.parse::<i64>().ok().map(GroupChoice::Existing)
        };
        update_form(state, |f| f.cascade.select_group(choice, capacity));
    };

    let on_save = move |_| {
        let plan = match with_form(state, |f| f.build_plan()) {
            Some(Ok(plan)) => plan,
            Some(Err(e)) => return toasts.error(&e),
            None => return,
        };
        if let Some(question) = plan.confirmation {
            if !confirm(question) {
                return;
            }
        }
        if update_form(state, |f| f.begin_save()) != Some(true) {
            return;
        }
        spawn_local(async move {
            match execute(&plan, state, toasts).await {
                Ok(()) => {
                    toasts.success("Пользователь успешно подтвержден!");
                    state.update(|s| s.close_approval());
                    on_approved.run(());
                }
                Err(e) => {
                    toasts.error(&e);
                    update_form(state, |f| f.finish_save());
                }
            }
        });
    };

    let role = move || with_form(state, |f| f.role()).flatten();
    let saving = Signal::derive(move || with_form(state, |f| f.is_saving()).unwrap_or(false));
    let user_name = with_form(state, |f| f.user_name().to_string()).unwrap_or_default();

    let faculty_options = move |selected: Option<i64>| {
        state.with(|s| {
            s.faculties()
                .iter()
                .map(|f| {
                    view! {
                        <option value=f.id.to_string() selected=selected == Some(f.id)>{f.name.clone()}</option>
                    }
                })
                .collect_view()
        })
    };

    let student_fields = move || {
        let faculty = with_form(state, |f| f.cascade.faculty()).flatten();
        let specialty = with_form(state, |f| f.cascade.specialty.selected()).flatten();
        let specialty_state = with_form(state, |f| f.cascade.specialty.state().clone()).unwrap_or_default();
        let specialty_placeholder = match &specialty_state {
            OptionsState::Disabled => "-- Выберите факультет --",
            OptionsState::Loading => "Загрузка...",
            OptionsState::Failed(_) => "Ошибка загрузки",
            OptionsState::Ready(_) => "-- Выберите специальность --",
        };
        let specialties = match specialty_state {
            OptionsState::Ready(items) => items,
            _ => Vec::new(),
        };
        let no_specialties = specialties.is_empty();
        let specialty_options = specialties
            .into_iter()
            .map(|s| view! { <option value=s.id.to_string() selected=specialty == Some(s.id)>{s.name}</option> })
            .collect_view();

        let course_enabled = with_form(state, |f| f.cascade.course_enabled()).unwrap_or(false);
        let course = with_form(state, |f| f.cascade.course()).flatten();
        let group_state = with_form(state, |f| f.cascade.group.state().clone()).unwrap_or_default();
        let group_placeholder = match group_state {
            OptionsState::Disabled => "-- Выберите курс --",
            OptionsState::Loading => "Загрузка...",
            OptionsState::Failed(_) => "Ошибка поиска групп",
            OptionsState::Ready(_) => "-- Выберите группу --",
        };
        let group_choice = with_form(state, |f| f.cascade.group_choice()).flatten();
        let groups = with_form(state, |f| f.cascade.group_options(capacity)).unwrap_or_default();
        let no_groups = groups.is_empty();
        let group_options = groups
            .into_iter()
            .map(|o| {
                let value = match o.choice {
                    GroupChoice::Existing(id) => id.to_string(),
                    GroupChoice::CreateNew => NEW_GROUP.to_string(),
                };
                let selected = group_choice == Some(o.choice);
                view! {
                    <option value=value disabled=o.disabled selected=selected class=o.class>{o.label}</option>
                }
            })
            .collect_view();

        view! {
            <div class="form__group">
                <label>"Факультет"</label>
                <select class="form__select" on:change=move |ev| on_faculty(event_target_value(&ev))>
                    <option value="">"-- Выберите факультет --"</option>
                    {faculty_options(faculty)}
                </select>
            </div>
            <div class="form__group">
                <label>"Специальность"</label>
                <select
                    class="form__select"
                    disabled=no_specialties
                    on:change=move |ev| on_specialty(event_target_value(&ev))
                >
                    <option value="">{specialty_placeholder}</option>
                    {specialty_options}
                </select>
            </div>
            <div class="form__group">
                <label>"Курс"</label>
                <select
                    class="form__select"
                    disabled=!course_enabled
                    on:change=move |ev| on_course(event_target_value(&ev))
                >
                    <option value="">"-- Выберите курс --"</option>
                    {COURSES
                        .into_iter()
                        .map(|c| {
                            view! {
                                <option value=c.to_string() selected=course == Some(c)>{format!("{} курс", c)}</option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
            <div class="form__group">
                <label>"Группа"</label>
                <select
                    class="form__select"
                    disabled=no_groups
                    on:change=move |ev| on_group(event_target_value(&ev))
                >
                    <option value="">{group_placeholder}</option>
                    {group_options}
                </select>
                {course.map(|c| view! { <small class="form__hint">{group_hint(c)}</small> })}
            </div>
        }
    };

    let dean_fields = move || {
        view! {
            <div class="form__group">
                <label>"Факультет"</label>
                <select
                    class="form__select"
                    on:change=move |ev| {
                        let faculty = event_target_value(&ev).parse::<i64>().ok();
                        update_form(state, |f| f.select_dean_faculty(faculty));
                    }
                >
                    <option value="">"-- Выберите факультет --"</option>
                    {faculty_options(with_form(state, |f| f.dean_faculty()).flatten())}
                </select>
            </div>
        }
    };

    let teacher_fields = move || {
        let subjects = state.with(|s| s.subjects().to_vec());
        if subjects.is_empty() {
            return view! { <p>"Не удалось загрузить список предметов."</p> }.into_any();
        }
        view! {
            <div class="subject-list">
                {subjects
                    .into_iter()
                    .map(|subject| {
                        let id = subject.id;
                        view! {
                            <label class="subject-list__item">
                                <input
                                    type="checkbox"
                                    prop:checked=move || with_form(state, |f| f.has_subject(id)).unwrap_or(false)
                                    on:change=move |_| {
                                        update_form(state, |f| f.toggle_subject(id));
                                    }
                                />
                                {subject.name}
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <Modal
            title=format!("Подтверждение: {}", user_name)
            on_close=on_close
            footer=Arc::new(move || view! {
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Отмена"
                </Button>
                <Button appearance=ButtonAppearance::Primary disabled=saving on_click=on_save>
                    {move || if saving.get() { "Сохранение..." } else { "Подтвердить" }}
                </Button>
            }.into_any())
        >
            <div class="form__group">
                <label>"Роль"</label>
                <select class="form__select" on:change=move |ev| on_role(event_target_value(&ev))>
                    <option value="">"-- Выберите роль --"</option>
                    {RoleName::ASSIGNABLE
                        .into_iter()
                        .map(|r| view! { <option value=r.code()>{r.label()}</option> })
                        .collect_view()}
                </select>
            </div>
            {move || match role() {
                Some(RoleName::Student) => student_fields().into_any(),
                Some(RoleName::DeanStaff) => dean_fields().into_any(),
                Some(RoleName::Teacher) => teacher_fields(),
                _ => ().into_any(),
            }}
        </Modal>
    }
}
