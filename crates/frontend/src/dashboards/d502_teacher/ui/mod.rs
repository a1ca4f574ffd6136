mod dashboard;
mod journal;
mod performance;

pub use dashboard::TeacherDashboard;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::controllers::cascade::OptionsState;
use crate::dashboards::d502_teacher::state::TeacherState;

/// `(scrollTop, clientHeight, scrollHeight)` of the scrolled element.
fn scroll_metrics(ev: &web_sys::Event) -> Option<(f64, f64, f64)> {
    let el = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    Some((
        el.scroll_top() as f64,
        el.client_height() as f64,
        el.scroll_height() as f64,
    ))
}

/// Subject select shared by the journal and performance widgets.
fn subject_options(state: RwSignal<TeacherState>, selected: Signal<Option<i64>>) -> impl IntoView {
    move || {
        state.with(|s| match s.subjects() {
            OptionsState::Ready(subjects) => {
                let mut options = vec![view! {
                    <option value="" selected=move || selected.get().is_none()>"-- Выберите дисциплину --"</option>
                }
                .into_any()];
                options.extend(subjects.iter().map(|subject| {
                    let id = subject.id;
                    view! {
                        <option value=id.to_string() selected=move || selected.get() == Some(id)>
                            {subject.name.clone()}
                        </option>
                    }
                    .into_any()
                }));
                options.into_any()
            }
            OptionsState::Failed(_) => view! { <option value="">"Ошибка загрузки предметов"</option> }.into_any(),
            _ => view! { <option value="">"Загрузка..."</option> }.into_any(),
        })
    }
}
