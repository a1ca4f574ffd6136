//! Графики виджетов
//!
//! Каждый графический виджет владеет ровно одним экземпляром графика в своём
//! слоте. Перед созданием нового экземпляра старый уничтожается.

pub mod chartjs;
pub mod spec;

pub use spec::{ChartKind, ChartSpec, Dataset};

use leptos::html;
use leptos::prelude::*;
use std::collections::HashMap;

use chartjs::{create_chart, ChartJsHandle};

pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Арена графиков, по идентификатору слота
pub struct ChartSlots<H: ChartHandle> {
    slots: HashMap<String, H>,
}

impl<H: ChartHandle> Default for ChartSlots<H> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<H: ChartHandle> ChartSlots<H> {
    /// Уничтожает текущий график слота и создаёт новый.
    ///
    /// Если создание не удалось, слот остаётся пустым.
    pub fn replace<E>(&mut self, slot: &str, create: impl FnOnce() -> Result<H, E>) -> Result<(), E> {
        self.release(slot);
        let handle = create()?;
        self.slots.insert(slot.to_string(), handle);
        Ok(())
    }

    pub fn release(&mut self, slot: &str) {
        if let Some(mut old) = self.slots.remove(slot) {
            old.destroy();
        }
    }

    pub fn release_all(&mut self) {
        for (_, mut handle) in self.slots.drain() {
            handle.destroy();
        }
    }

    pub fn is_live(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Реестр графиков дашборда, доступен через контекст
#[derive(Clone, Copy)]
pub struct ChartRegistry {
    slots: StoredValue<ChartSlots<ChartJsHandle>, LocalStorage>,
}

pub fn provide_chart_registry() -> ChartRegistry {
    let registry = ChartRegistry {
        slots: StoredValue::new_local(ChartSlots::default()),
    };
    provide_context(registry);
    on_cleanup(move || registry.slots.update_value(|s| s.release_all()));
    registry
}

fn use_chart_registry() -> ChartRegistry {
    use_context::<ChartRegistry>().unwrap_or_else(provide_chart_registry)
}

/// Canvas, на котором слот рисует свой график.
/// `None` в `spec` освобождает слот.
#[component]
pub fn ChartCanvas(
    #[prop(into)] slot_id: String,
    #[prop(into)] spec: Signal<Option<ChartSpec>>,
    #[prop(default = 280)] height: u32,
) -> impl IntoView {
    let registry = use_chart_registry();
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let slot_key = slot_id.clone();

    Effect::new(move |_| {
        let spec = spec.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        registry.slots.update_value(|slots| match spec {
            Some(spec) if !spec.is_empty() => {
                if let Err(e) = slots.replace(&slot_key, || create_chart(&canvas, &spec)) {
                    log::error!("Chart {} not created: {}", slot_key, e);
                }
            }
            _ => slots.release(&slot_key),
        });
    });

    let slot_for_cleanup = slot_id.clone();
    on_cleanup(move || {
        registry
            .slots
            .try_update_value(|slots| slots.release(&slot_for_cleanup));
    });

    view! {
        <div class="chart-box" style=format!("position: relative; height: {}px;", height)>
            <canvas node_ref=canvas_ref data-slot=slot_id></canvas>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::DashboardError;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeHandle {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ChartHandle for FakeHandle {
        fn destroy(&mut self) {
            self.log.borrow_mut().push(format!("destroy {}", self.name));
        }
    }

    fn make(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Result<FakeHandle, String> {
        log.borrow_mut().push(format!("create {}", name));
        Ok(FakeHandle {
            name: name.to_string(),
            log: log.clone(),
        })
    }

    #[test]
    fn test_replace_destroys_before_create() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = ChartSlots::default();

        slots.replace("dynamics", || make("a", &log)).unwrap();
        slots.replace("dynamics", || make("b", &log)).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["create a", "destroy a", "create b"]
        );
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_failed_create_leaves_slot_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = ChartSlots::default();
        slots.replace("pie", || make("a", &log)).unwrap();

        let res = slots.replace("pie", || Err(DashboardError::Chart("no canvas".into())));
        assert_eq!(res, Err(DashboardError::Chart("no canvas".into())));
        assert!(!slots.is_live("pie"));
        assert_eq!(log.borrow().last().map(String::as_str), Some("destroy a"));
    }

    #[test]
    fn test_slots_are_independent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = ChartSlots::default();
        slots.replace("a", || make("a", &log)).unwrap();
        slots.replace("b", || make("b", &log)).unwrap();
        slots.release("a");

        assert!(!slots.is_live("a"));
        assert!(slots.is_live("b"));
        slots.release_all();
        assert!(slots.is_empty());
    }
}
