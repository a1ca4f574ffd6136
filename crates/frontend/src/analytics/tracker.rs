use contracts::analytics::WidgetQueryRequest;
use std::collections::HashMap;

use super::query::build_query;
use super::widgets::WidgetSet;
use crate::controllers::generation::{Generation, GenerationCounter};

/// A batch on its way to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery<F> {
    pub generation: Generation,
    pub widgets: WidgetSet,
    pub request: WidgetQueryRequest<F>,
}

/// Tracks which batch last asked for each widget.
///
/// A response is applied only to widgets whose latest request is that batch;
/// a wide reload followed by a narrow refresh keeps the narrow result for the
/// refreshed widgets and the wide result for the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchTracker {
    counter: GenerationCounter,
    latest: HashMap<String, Generation>,
}

impl BatchTracker {
    pub fn issue(&mut self, set: &WidgetSet) -> Generation {
        let generation = self.counter.next();
        for id in set.iter() {
            self.latest.insert(id.as_str().to_string(), generation);
        }
        generation
    }

    /// Issues a generation for `set` and builds its request.
    pub fn begin<F: Clone>(&mut self, filters: &F, set: &WidgetSet) -> PendingQuery<F> {
        PendingQuery {
            generation: self.issue(set),
            widgets: set.clone(),
            request: build_query(filters, set),
        }
    }

    pub fn accepts(&self, id: &str, generation: Generation) -> bool {
        self.latest.get(id) == Some(&generation)
    }

    /// Part of `requested` that `generation` may still update.
    pub fn accepted(&self, requested: &WidgetSet, generation: Generation) -> WidgetSet {
        let ids: Vec<&str> = requested
            .iter()
            .map(|id| id.as_str())
            .filter(|id| self.accepts(id, generation))
            .collect();
        let accepted = requested.narrow(&ids);
        if accepted.len() < requested.len() {
            log::debug!(
                "discarding stale data for {} widget(s) of batch {:?}",
                requested.len() - accepted.len(),
                generation
            );
        }
        accepted
    }
}
