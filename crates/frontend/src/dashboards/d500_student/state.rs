//! Student dashboard state: KPI cards, score breakdown, rank dynamics and the
//! anonymized ranking list, all fed by one batched query.

use contracts::analytics::{
    widget_ids as w, CategoryPoints, ComparisonContext, MyRank, MyScores, ScoreComponents,
    StudentFilters, WidgetQueryResponse,
};
use contracts::system::auth::RoleName;

use crate::analytics::{
    distribute, distribute_failure, widgets_for_role, BatchTracker, PendingQuery, RendererMap,
    WidgetDashboard, WidgetSet, WidgetSlot,
};
use crate::controllers::dynamics::{CompareChange, DynamicsState, LinesChange};
use crate::controllers::ranking_table::RankingTable;
use crate::shared::chart::{ChartKind, ChartSpec};
use crate::shared::error::DashboardResult;
use crate::shared::format::{category_label, format_mark, format_rank, format_score};

#[derive(Debug, Clone, PartialEq)]
pub struct StudentState {
    filters: StudentFilters,
    widgets: WidgetSet,
    tracker: BatchTracker,
    pub scores: WidgetSlot<MyScores>,
    pub rank: WidgetSlot<MyRank>,
    pub breakdown: WidgetSlot<Vec<CategoryPoints>>,
    pub dynamics: DynamicsState,
    pub ranking: RankingTable,
}

impl StudentState {
    pub fn new(student_id: i64) -> Self {
        Self {
            filters: StudentFilters::new(student_id),
            widgets: widgets_for_role(RoleName::Student).unwrap_or_default(),
            tracker: BatchTracker::default(),
            scores: WidgetSlot::Loading,
            rank: WidgetSlot::Loading,
            breakdown: WidgetSlot::Loading,
            dynamics: DynamicsState::default(),
            ranking: RankingTable::for_student(student_id),
        }
    }

    pub fn filters(&self) -> &StudentFilters {
        &self.filters
    }

    fn begin(&mut self, set: &WidgetSet) -> PendingQuery<StudentFilters> {
        self.tracker.begin(&self.filters, set)
    }

    /// Initial load and full retry.
    pub fn load_all(&mut self) -> PendingQuery<StudentFilters> {
        self.scores.begin_update();
        self.rank.begin_update();
        self.breakdown.begin_update();
        self.dynamics.begin_update();
        self.ranking.begin_update();
        let set = self.widgets.clone();
        self.begin(&set)
    }

    /// Re-query only `ids`, e.g. a single failed widget.
    pub fn reload(&mut self, ids: &[&str]) -> PendingQuery<StudentFilters> {
        let set = self.widgets.narrow(ids);
        for id in set.iter() {
            match id.as_str() {
                w::MY_SCORES => self.scores.begin_update(),
                w::MY_RANK => self.rank.begin_update(),
                w::MY_SCORE_BREAKDOWN => self.breakdown.begin_update(),
                w::MY_RANK_DYNAMICS => self.dynamics.begin_update(),
                w::STUDENT_RANKING_LIST => self.ranking.begin_update(),
                _ => {}
            }
        }
        self.begin(&set)
    }

    /// Rank is computed against the chosen peer population.
    pub fn set_context(&mut self, context: ComparisonContext) -> Option<PendingQuery<StudentFilters>> {
        if self.filters.comparison_context == context {
            return None;
        }
        self.filters.comparison_context = context;
        self.rank.begin_update();
        let set = self.widgets.narrow(&[w::MY_RANK]);
        Some(self.begin(&set))
    }

    pub fn select_semester(&mut self, semester: Option<u32>) -> Option<PendingQuery<StudentFilters>> {
        if !self.ranking.select_semester(semester) {
            return None;
        }
        self.filters.ranking_semester = semester;
        let set = self.widgets.narrow(&[w::STUDENT_RANKING_LIST]);
        Some(self.begin(&set))
    }

    pub fn apply_lines(&mut self) -> DashboardResult<Option<PendingQuery<StudentFilters>>> {
        match self.dynamics.apply_lines()? {
            LinesChange::Refetch => {
                self.filters.lines = self.dynamics.lines().clone();
                let set = self.widgets.narrow(&[w::MY_RANK_DYNAMICS]);
                Ok(Some(self.begin(&set)))
            }
            LinesChange::LocalOnly => {
                self.filters.lines = self.dynamics.lines().clone();
                Ok(None)
            }
            LinesChange::Unchanged => Ok(None),
        }
    }

    pub fn request_compare(&mut self, input: &str) -> DashboardResult<Option<PendingQuery<StudentFilters>>> {
        match self.dynamics.request_compare(input)? {
            CompareChange::Requested(id) => {
                self.filters.compare_with_student_id = Some(id);
                let set = self.widgets.narrow(&[w::MY_RANK_DYNAMICS]);
                Ok(Some(self.begin(&set)))
            }
            CompareChange::Cleared => {
                self.filters.compare_with_student_id = None;
                Ok(None)
            }
            CompareChange::Unchanged => Ok(None),
        }
    }

    fn renderers(&mut self, requested_compare: Option<i64>) -> RendererMap<'_> {
        let Self {
            scores,
            rank,
            breakdown,
            dynamics,
            ranking,
            ..
        } = self;
        let mut map = RendererMap::new();
        map.register(w::MY_SCORES, move |input| {
            *scores = WidgetSlot::from_input(w::MY_SCORES, input)
        })
        .register(w::MY_RANK, move |input| {
            *rank = WidgetSlot::from_input(w::MY_RANK, input)
        })
        .register(w::MY_SCORE_BREAKDOWN, move |input| {
            *breakdown = WidgetSlot::from_input(w::MY_SCORE_BREAKDOWN, input)
        })
        .register(w::MY_RANK_DYNAMICS, move |input| {
            dynamics.apply(WidgetSlot::from_input(w::MY_RANK_DYNAMICS, input), requested_compare)
        })
        .register(w::STUDENT_RANKING_LIST, move |input| {
            ranking.apply(WidgetSlot::from_input(w::STUDENT_RANKING_LIST, input))
        });
        map
    }

    // -- view models -------------------------------------------------------

    /// Score components: from `myScores` when present, else from the
    /// student's own ranking row.
    pub fn components(&self) -> Option<ScoreComponents> {
        self.scores
            .data()
            .and_then(|s| s.components.clone())
            .or_else(|| self.ranking.my_row().map(|r| r.components()))
    }

    pub fn total_text(&self) -> String {
        format_score(self.scores.data().and_then(|s| s.total_score))
    }

    /// "академ. + достиж. - штраф" under the total score.
    pub fn formula_text(&self) -> Option<String> {
        let c = self.components()?;
        Some(format!(
            "{} + {} - {}",
            format_score(c.academic_score),
            format_score(c.extracurricular_score),
            format_score(c.absence_penalty)
        ))
    }

    pub fn average_text(&self) -> String {
        format_mark(self.scores.data().and_then(|s| s.average_mark))
    }

    pub fn rank_text(&self) -> String {
        match self.rank.data() {
            Some(r) => format_rank(r.rank, r.total),
            None => format_rank(None, None),
        }
    }

    pub fn absence_text(&self) -> String {
        let c = self.components().unwrap_or_default();
        let hours = |h: Option<f64>| h.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "0".into());
        format!(
            "{} ч. / {} ч.",
            hours(c.excused_absence_hours),
            hours(c.unexcused_absence_hours)
        )
    }

    pub fn penalty_text(&self) -> String {
        format!(
            "Штраф: {}",
            format_score(self.components().and_then(|c| c.absence_penalty))
        )
    }

    pub fn breakdown_spec(&self) -> Option<ChartSpec> {
        let items = self.breakdown.data()?;
        let spec = ChartSpec::radial(
            ChartKind::Pie,
            "Баллы",
            items
                .iter()
                .map(|i| (category_label(&i.category).to_string(), i.total_points))
                .collect(),
        );
        Some(spec)
    }
}

impl WidgetDashboard for StudentState {
    type Filters = StudentFilters;

    fn apply_response(&mut self, response: &WidgetQueryResponse, batch: &PendingQuery<StudentFilters>) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        let mut renderers = self.renderers(batch.request.filters.compare_with_student_id);
        distribute(response, &accepted, &mut renderers);
    }

    fn apply_failure(&mut self, batch: &PendingQuery<StudentFilters>, message: &str) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        let mut renderers = self.renderers(batch.request.filters.compare_with_student_id);
        distribute_failure(&accepted, &mut renderers, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> WidgetQueryResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_rank_three_of_twenty() {
        let mut state = StudentState::new(42);
        let batch = state.load_all();
        let body = serde_json::to_value(&batch.request).unwrap();
        assert_eq!(body["filters"]["studentId"], json!(42));
        assert_eq!(body["filters"]["comparisonContext"], json!("GROUP"));
        assert_eq!(body["widgetIds"].as_array().map(|a| a.len()), Some(5));

        state.apply_response(
            &response(json!({ "widgets": { "myRank": { "data": { "rank": 3, "total": 20 } } } })),
            &batch,
        );
        assert_eq!(state.rank_text(), "3 / 20");
        // missing widgets render as empty, never stay loading
        assert_eq!(state.scores, WidgetSlot::Empty);
        assert_eq!(state.total_text(), "—");
        assert_eq!(state.average_text(), "N/A");
    }

    #[test]
    fn test_unknown_rank() {
        let mut state = StudentState::new(42);
        let batch = state.load_all();
        state.apply_response(
            &response(json!({ "widgets": { "myRank": { "data": { "rank": -1, "total": 20 } } } })),
            &batch,
        );
        assert_eq!(state.rank_text(), "? / 20");
    }

    #[test]
    fn test_context_change_queries_rank_only() {
        let mut state = StudentState::new(42);
        let full = state.load_all();
        let narrow = state.set_context(ComparisonContext::Faculty).unwrap();
        assert_eq!(narrow.request.widget_ids.len(), 1);
        assert!(state.set_context(ComparisonContext::Faculty).is_none());

        state.apply_response(
            &response(json!({ "widgets": { "myRank": { "data": { "rank": 2, "total": 100 } } } })),
            &narrow,
        );
        // the older full batch may not overwrite the newer rank
        state.apply_response(
            &response(json!({ "widgets": {
                "myRank": { "data": { "rank": 3, "total": 20 } },
                "myScores": { "data": { "totalScore": 81.5, "averageMark": 8.1 } }
            } })),
            &full,
        );
        assert_eq!(state.rank_text(), "2 / 100");
        assert_eq!(state.total_text(), "81.50");
    }

    #[test]
    fn test_components_fall_back_to_ranking_row() {
        let mut state = StudentState::new(42);
        let batch = state.load_all();
        state.apply_response(
            &response(json!({ "widgets": {
                "myScores": { "data": { "totalScore": 10.0 } },
                "studentRankingList": { "data": { "data": [
                    { "studentId": 7, "totalScore": 12.0 },
                    { "studentId": 42, "totalScore": 10.0, "academicScore": 8.0,
                      "extracurricularScore": 3.0, "absencePenalty": 1.0,
                      "unexcusedAbsenceHours": 4.0 }
                ] } }
            } })),
            &batch,
        );
        assert_eq!(state.formula_text().as_deref(), Some("8.00 + 3.00 - 1.00"));
        assert_eq!(state.absence_text(), "0 ч. / 4 ч.");
        assert!(state.ranking.rows()[1].is_me);
    }

    #[test]
    fn test_batch_failure_fails_every_requested_widget() {
        let mut state = StudentState::new(42);
        let batch = state.load_all();
        state.apply_failure(&batch, "Ошибка 500");
        assert_eq!(state.rank.error(), Some("Ошибка 500"));
        assert_eq!(state.breakdown.error(), Some("Ошибка 500"));
        assert_eq!(state.ranking.slot().error(), Some("Ошибка 500"));
        assert_eq!(state.dynamics.slot().error(), Some("Ошибка 500"));
    }

    #[test]
    fn test_compare_request_sends_id() {
        let mut state = StudentState::new(42);
        state.load_all();
        let batch = state.request_compare("9999").unwrap().unwrap();
        assert_eq!(batch.request.filters.compare_with_student_id, Some(9999));
        assert_eq!(batch.request.widget_ids.len(), 1);

        assert!(state.request_compare("").unwrap().is_none());
        assert_eq!(state.filters().compare_with_student_id, None);
    }
}
