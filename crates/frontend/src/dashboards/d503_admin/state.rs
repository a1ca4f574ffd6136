//! Administrator dashboard: pending registrations, approval and the user
//! statistics widgets.

use contracts::analytics::{widget_ids as w, AdminFilters, LabelCount, WidgetQueryResponse};
use contracts::domain::academic::{Faculty, Subject};
use contracts::system::auth::RoleName;
use contracts::system::users::{User, UserStatus};

use super::approval::ApprovalForm;
use crate::analytics::{
    distribute, distribute_failure, widgets_for_role, BatchTracker, PendingQuery, RendererMap,
    WidgetDashboard, WidgetSet, WidgetSlot,
};
use crate::controllers::fetch_state::ControlFetch;
use crate::controllers::generation::Generation;
use crate::shared::chart::{ChartKind, ChartSpec, Dataset};
use crate::shared::error::DashboardResult;

#[derive(Debug, Clone, PartialEq)]
pub struct AdminState {
    filters: AdminFilters,
    widgets: WidgetSet,
    tracker: BatchTracker,
    pub roles: WidgetSlot<Vec<LabelCount>>,
    pub statuses: WidgetSlot<Vec<LabelCount>>,
    pending_fetch: ControlFetch,
    pub pending: WidgetSlot<Vec<User>>,
    faculties: Vec<Faculty>,
    subjects: Vec<Subject>,
    pub approval: Option<ApprovalForm>,
}

impl AdminState {
    pub fn new(admin_id: i64) -> Self {
        Self {
            filters: AdminFilters { admin_id },
            widgets: widgets_for_role(RoleName::Administrator).unwrap_or_default(),
            tracker: BatchTracker::default(),
            roles: WidgetSlot::Loading,
            statuses: WidgetSlot::Loading,
            pending_fetch: ControlFetch::latest_wins(),
            pending: WidgetSlot::Loading,
            faculties: Vec::new(),
            subjects: Vec::new(),
            approval: None,
        }
    }

    pub fn load_all(&mut self) -> PendingQuery<AdminFilters> {
        self.roles.begin_update();
        self.statuses.begin_update();
        let set = self.widgets.clone();
        self.tracker.begin(&self.filters, &set)
    }

    pub fn reload(&mut self, ids: &[&str]) -> PendingQuery<AdminFilters> {
        let set = self.widgets.narrow(ids);
        for id in set.iter() {
            match id.as_str() {
                w::ROLE_STATISTICS => self.roles.begin_update(),
                w::USER_STATUS_OVERVIEW => self.statuses.begin_update(),
                _ => {}
            }
        }
        self.tracker.begin(&self.filters, &set)
    }

    fn renderers(&mut self) -> RendererMap<'_> {
        let Self { roles, statuses, .. } = self;
        let mut map = RendererMap::new();
        map.register(w::ROLE_STATISTICS, move |input| {
            *roles = WidgetSlot::from_input(w::ROLE_STATISTICS, input)
        })
        .register(w::USER_STATUS_OVERVIEW, move |input| {
            *statuses = WidgetSlot::from_input(w::USER_STATUS_OVERVIEW, input)
        });
        map
    }

    // -- pending users -----------------------------------------------------

    pub fn begin_pending(&mut self) -> Option<Generation> {
        self.pending.begin_update();
        self.pending_fetch.begin()
    }

    /// Keeps only `PENDING` users of the full list.
    pub fn finish_pending(&mut self, generation: Generation, result: DashboardResult<Vec<User>>) {
        match result {
            Ok(users) => {
                if self.pending_fetch.finish_ok(generation) {
                    let pending: Vec<User> = users.into_iter().filter(|u| u.status == UserStatus::Pending).collect();
                    self.pending = if pending.is_empty() {
                        WidgetSlot::Empty
                    } else {
                        WidgetSlot::Ready(pending)
                    };
                }
            }
            Err(e) => {
                if self.pending_fetch.finish_err(generation, e.to_string()) {
                    self.pending = WidgetSlot::Failed(e.to_string());
                }
            }
        }
    }

    pub fn pending_users(&self) -> Vec<User> {
        self.pending.data().cloned().unwrap_or_default()
    }

    // -- reference data ----------------------------------------------------

    pub fn set_faculties(&mut self, faculties: Vec<Faculty>) {
        self.faculties = faculties;
    }

    pub fn faculties(&self) -> &[Faculty] {
        &self.faculties
    }

    pub fn set_subjects(&mut self, subjects: Vec<Subject>) {
        self.subjects = subjects;
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    // -- approval ----------------------------------------------------------

    pub fn open_approval(&mut self, user_id: i64) {
        self.approval = self
            .pending
            .data()
            .and_then(|users| users.iter().find(|u| u.id == user_id))
            .map(ApprovalForm::new);
    }

    pub fn close_approval(&mut self) {
        self.approval = None;
    }

    // -- view models -------------------------------------------------------

    pub fn roles_spec(&self) -> Option<ChartSpec> {
        let items = self.roles.data()?;
        let labels = items
            .iter()
            .map(|i| RoleName::plural_label(&i.label).unwrap_or(i.label.as_str()).to_string())
            .collect();
        let values = items.iter().map(|i| Some(i.count as f64)).collect();
        Some(ChartSpec::new(ChartKind::Bar, labels).with_dataset(Dataset::new("Количество", values, 0)))
    }

    pub fn status_rows(&self) -> Vec<(String, i64)> {
        self.statuses
            .data()
            .map(|items| {
                items
                    .iter()
                    .map(|i| {
                        let label = UserStatus::label_for(&i.label).unwrap_or(i.label.as_str()).to_string();
                        (label, i.count)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl WidgetDashboard for AdminState {
    type Filters = AdminFilters;

    fn apply_response(&mut self, response: &WidgetQueryResponse, batch: &PendingQuery<AdminFilters>) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute(response, &accepted, &mut self.renderers());
    }

    fn apply_failure(&mut self, batch: &PendingQuery<AdminFilters>, message: &str) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute_failure(&accepted, &mut self.renderers(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::DashboardError;
    use serde_json::json;

    fn users() -> Vec<User> {
        serde_json::from_value(json!([
            { "id": 1, "fullName": "Активный А.", "status": "ACTIVE" },
            { "id": 2, "fullName": "Новый Н.", "login": "new", "status": "PENDING" },
            { "id": 3, "fullName": "Блок Б.", "status": "BLOCKED" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_only_pending_users_are_listed() {
        let mut state = AdminState::new(1);
        let g = state.begin_pending().unwrap();
        state.finish_pending(g, Ok(users()));
        let pending = state.pending_users();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 2);

        state.open_approval(2);
        assert_eq!(state.approval.as_ref().map(|f| f.user_name()), Some("Новый Н."));
        state.open_approval(1);
        assert!(state.approval.is_none());
    }

    #[test]
    fn test_stale_user_list_is_dropped() {
        let mut state = AdminState::new(1);
        let first = state.begin_pending().unwrap();
        let second = state.begin_pending().unwrap();
        state.finish_pending(second, Ok(vec![]));
        assert_eq!(state.pending, WidgetSlot::Empty);
        state.finish_pending(first, Err(DashboardError::Network("late".into())));
        assert_eq!(state.pending, WidgetSlot::Empty);
    }

    #[test]
    fn test_role_and_status_labels() {
        let mut state = AdminState::new(1);
        let batch = state.load_all();
        let response: WidgetQueryResponse = serde_json::from_value(json!({ "widgets": {
            "roleStatistics": { "data": [
                { "label": "TEACHER", "count": 40 },
                { "label": "GUEST", "count": 1 }
            ] },
            "userStatusOverview": { "data": [
                { "label": "PENDING", "count": 3 }
            ] }
        } }))
        .unwrap();
        state.apply_response(&response, &batch);

        let spec = state.roles_spec().unwrap();
        assert_eq!(spec.labels, vec!["Преподаватели", "GUEST"]);
        assert_eq!(state.status_rows(), vec![("Ожидают".to_string(), 3)]);
    }
}
