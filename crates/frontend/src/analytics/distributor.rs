//! Fan-out of one batched response to per-widget renderers.

use contracts::analytics::WidgetQueryResponse;
use serde_json::Value;
use std::collections::HashMap;

use super::widgets::WidgetSet;

/// What a renderer gets for its widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetInput<'a> {
    Data(&'a Value),
    /// Key missing from the envelope or its `data` is `null`.
    Empty,
    /// The whole batch failed.
    Failed(&'a str),
}

pub type Renderer<'r> = Box<dyn FnMut(WidgetInput<'_>) + 'r>;

#[derive(Default)]
pub struct RendererMap<'r> {
    renderers: HashMap<String, Renderer<'r>>,
}

impl<'r> RendererMap<'r> {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: &str, renderer: impl FnMut(WidgetInput<'_>) + 'r) -> &mut Self {
        self.renderers.insert(id.to_string(), Box::new(renderer));
        self
    }

    fn call(&mut self, id: &str, input: WidgetInput<'_>) -> bool {
        match self.renderers.get_mut(id) {
            Some(renderer) => {
                renderer(input);
                true
            }
            None => false,
        }
    }
}

/// Calls the renderer of every requested id exactly once. Returns the number
/// of renderers called.
pub fn distribute(
    envelope: &WidgetQueryResponse,
    requested: &WidgetSet,
    renderers: &mut RendererMap<'_>,
) -> usize {
    let mut called = 0;
    for id in requested.iter() {
        let input = match envelope.payload(id) {
            Some(data) => WidgetInput::Data(data),
            None => {
                log::debug!("widget {} has no data", id);
                WidgetInput::Empty
            }
        };
        if renderers.call(id.as_str(), input) {
            called += 1;
        }
    }
    called
}

/// Marks every requested widget as failed.
pub fn distribute_failure(
    requested: &WidgetSet,
    renderers: &mut RendererMap<'_>,
    message: &str,
) -> usize {
    requested
        .iter()
        .filter(|id| renderers.call(id.as_str(), WidgetInput::Failed(message)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn envelope() -> WidgetQueryResponse {
        serde_json::from_value(json!({
            "widgets": {
                "myRank": { "data": { "rank": 3, "total": 20 } },
                "myScores": { "data": null },
                "roleStatistics": { "data": [] }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_one_call_per_requested_id() {
        let requested = WidgetSet::new(["myRank", "myScores", "myScoreBreakdown"]);
        let log = RefCell::new(Vec::new());
        let mut map = RendererMap::new();
        for id in ["myRank", "myScores", "myScoreBreakdown", "roleStatistics"] {
            let log = &log;
            map.register(id, move |input| {
                let kind = match input {
                    WidgetInput::Data(_) => "data",
                    WidgetInput::Empty => "empty",
                    WidgetInput::Failed(_) => "failed",
                };
                log.borrow_mut().push((id, kind));
            });
        }

        assert_eq!(distribute(&envelope(), &requested, &mut map), 3);
        drop(map);
        assert_eq!(
            log.into_inner(),
            vec![
                ("myRank", "data"),
                ("myScores", "empty"),
                ("myScoreBreakdown", "empty"),
            ]
        );
    }

    #[test]
    fn test_failure_reaches_every_requested_renderer() {
        let requested = WidgetSet::new(["roleStatistics", "userStatusOverview"]);
        let mut failed = Vec::new();
        {
            let mut map = RendererMap::new();
            map.register("roleStatistics", |i| failed.push(i == WidgetInput::Failed("500")));
            assert_eq!(distribute_failure(&requested, &mut map, "500"), 1);
        }
        assert_eq!(failed, vec![true]);
    }

    #[test]
    fn test_unrequested_widgets_are_not_rendered() {
        let requested = WidgetSet::new(["myRank"]);
        let mut calls = 0;
        {
            let mut map = RendererMap::new();
            map.register("roleStatistics", |_| calls += 1);
            distribute(&envelope(), &requested, &mut map);
        }
        assert_eq!(calls, 0);
    }
}
