use contracts::analytics::{WidgetQueryRequest, WidgetQueryResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::Serialize;

use super::tracker::PendingQuery;
use crate::shared::error::DashboardResult;
use crate::shared::toast::ToastService;
use crate::shared::transport::{request_json, Method};

/// `POST /analytics/query`
pub async fn query_widgets<F: Serialize>(
    request: &WidgetQueryRequest<F>,
) -> DashboardResult<WidgetQueryResponse> {
    log::debug!(
        "analytics query: {}",
        request
            .widget_ids
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    request_json(Method::Post, "/analytics/query", Some(request)).await
}

/// Dashboard state fed by batched widget queries.
pub trait WidgetDashboard {
    type Filters: Serialize + Clone + Send + Sync + 'static;

    fn apply_response(&mut self, response: &WidgetQueryResponse, batch: &PendingQuery<Self::Filters>);

    fn apply_failure(&mut self, batch: &PendingQuery<Self::Filters>, message: &str);
}

/// Sends `batch` and feeds the outcome back into `state`. A transport
/// failure also raises a toast.
pub fn spawn_query<S>(state: RwSignal<S>, batch: PendingQuery<S::Filters>, toasts: ToastService)
where
    S: WidgetDashboard + Send + Sync + 'static,
{
    spawn_local(async move {
        match query_widgets(&batch.request).await {
            Ok(response) => {
                state.try_update(|s| s.apply_response(&response, &batch));
            }
            Err(e) => {
                toasts.error(&e);
                state.try_update(|s| s.apply_failure(&batch, &e.to_string()));
            }
        }
    });
}
