//! Всплывающие уведомления об ошибках и успешных действиях
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use super::config::config;
use super::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "toast toast--success",
            Self::Error => "toast toast--error",
            Self::Info => "toast toast--info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Очередь уведомлений
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    pub items: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }
}

/// Сервис уведомлений, доступен через контекст
#[derive(Clone, Copy)]
pub struct ToastService {
    queue: RwSignal<ToastQueue>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let mut id = 0;
        self.queue.update(|q| id = q.push(kind, message));

        let queue = self.queue;
        Timeout::new(config().toast.duration_ms, move || {
            queue.try_update(|q| q.dismiss(id));
        })
        .forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    /// Ошибка уровня пакета; истёкшая сессия уже обработана транспортом
    pub fn error(&self, err: &DashboardError) {
        if !err.is_session_failure() {
            self.show(ToastKind::Error, err.to_string());
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| q.dismiss(id));
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_toasts() -> ToastService {
    let service = ToastService::new();
    provide_context(service);
    service
}

/// Сервис из контекста; без провайдера создаётся отдельный экземпляр
pub fn use_toasts() -> ToastService {
    use_context::<ToastService>().unwrap_or_else(|| {
        log::warn!("ToastService not provided, using a detached instance");
        ToastService::new()
    })
}

#[component]
pub fn ToastContainer() -> impl IntoView {
    let service = use_toasts();
    let items = move || service.queue.with(|q| q.items.clone());

    view! {
        <div class="toast-container">
            <For each=items key=|t| t.id let:toast>
                <div class=toast.kind.class() on:click=move |_| service.dismiss(toast.id)>
                    {toast.message.clone()}
                </div>
            </For>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_push_and_dismiss() {
        let mut queue = ToastQueue::default();
        let a = queue.push(ToastKind::Error, "Ошибка сети");
        let b = queue.push(ToastKind::Success, "Сохранено");
        assert_ne!(a, b);

        queue.dismiss(a);
        assert_eq!(queue.items.len(), 1);
        assert_eq!(queue.items[0].message, "Сохранено");

        queue.dismiss(a);
        assert_eq!(queue.items.len(), 1);
    }
}
