//! Dean dashboard: faculty-scoped ranking, average score dynamics,
//! performance distribution and contribution analysis.

use contracts::analytics::{
    widget_ids as w, AverageScoreDynamics, CategoryPoints, DeanFilters, LabelCount, WidgetQueryResponse,
};
use contracts::domain::academic::StudentGroup;
use contracts::system::auth::RoleName;

use crate::analytics::{
    distribute, distribute_failure, widgets_for_role, BatchTracker, PendingQuery, RendererMap,
    WidgetDashboard, WidgetSet, WidgetSlot,
};
use crate::controllers::cascade::DependentSelect;
use crate::controllers::generation::Generation;
use crate::controllers::ranking_table::RankingTable;
use crate::shared::chart::{ChartKind, ChartSpec, Dataset};
use crate::shared::error::DashboardResult;
use crate::shared::format::category_label;

#[derive(Debug, Clone, PartialEq)]
pub struct DeanState {
    filters: DeanFilters,
    widgets: WidgetSet,
    tracker: BatchTracker,
    draft_year: Option<i32>,
    pub groups: DependentSelect<StudentGroup>,
    pub ranking: RankingTable,
    pub dynamics: WidgetSlot<AverageScoreDynamics>,
    pub distribution: WidgetSlot<Vec<LabelCount>>,
    pub contribution: WidgetSlot<Vec<CategoryPoints>>,
}

impl DeanState {
    pub fn new(faculty_id: Option<i64>) -> Self {
        Self {
            filters: DeanFilters {
                faculty_id,
                ..Default::default()
            },
            widgets: widgets_for_role(RoleName::DeanStaff).unwrap_or_default(),
            tracker: BatchTracker::default(),
            draft_year: None,
            groups: DependentSelect::default(),
            ranking: RankingTable::for_dean(),
            dynamics: WidgetSlot::Loading,
            distribution: WidgetSlot::Loading,
            contribution: WidgetSlot::Loading,
        }
    }

    pub fn filters(&self) -> &DeanFilters {
        &self.filters
    }

    pub fn draft_year(&self) -> Option<i32> {
        self.draft_year
    }

    /// Year select changed: the group list is reloaded for that year.
    /// Returns `(facultyId, year, generation)` of the load to start.
    pub fn select_year(&mut self, year: Option<i32>) -> Option<(i64, i32, Generation)> {
        self.draft_year = year;
        self.groups.invalidate();
        let faculty = self.filters.faculty_id?;
        let year = year?;
        Some((faculty, year, self.groups.begin_load()))
    }

    pub fn finish_groups(&mut self, generation: Generation, result: DashboardResult<Vec<StudentGroup>>) -> bool {
        self.groups.finish(generation, result)
    }

    pub fn select_group(&mut self, group: Option<i64>) {
        self.groups.select(group);
    }

    fn begin(&mut self, set: &WidgetSet) -> PendingQuery<DeanFilters> {
        for id in set.iter() {
            match id.as_str() {
                w::STUDENT_RANKING_LIST => self.ranking.begin_update(),
                w::AVERAGE_SCORE_DYNAMICS => self.dynamics.begin_update(),
                w::PERFORMANCE_DISTRIBUTION => self.distribution.begin_update(),
                w::CONTRIBUTION_ANALYSIS => self.contribution.begin_update(),
                _ => {}
            }
        }
        self.tracker.begin(&self.filters, set)
    }

    pub fn load_all(&mut self) -> PendingQuery<DeanFilters> {
        let set = self.widgets.clone();
        self.begin(&set)
    }

    pub fn reload(&mut self, ids: &[&str]) -> PendingQuery<DeanFilters> {
        let set = self.widgets.narrow(ids);
        self.begin(&set)
    }

    /// "Применить": year and group drill-down apply to every widget.
    pub fn apply_filters(&mut self) -> PendingQuery<DeanFilters> {
        self.filters.formation_year = self.draft_year;
        self.filters.group_id = self.draft_year.and(self.groups.selected());
        self.load_all()
    }

    pub fn select_semester(&mut self, semester: Option<u32>) -> Option<PendingQuery<DeanFilters>> {
        if !self.ranking.select_semester(semester) {
            return None;
        }
        self.filters.ranking_semester = semester;
        Some(self.reload(&[w::STUDENT_RANKING_LIST]))
    }

    fn renderers(&mut self) -> RendererMap<'_> {
        let Self {
            ranking,
            dynamics,
            distribution,
            contribution,
            ..
        } = self;
        let mut map = RendererMap::new();
        map.register(w::STUDENT_RANKING_LIST, move |input| {
            ranking.apply(WidgetSlot::from_input(w::STUDENT_RANKING_LIST, input))
        })
        .register(w::AVERAGE_SCORE_DYNAMICS, move |input| {
            *dynamics = WidgetSlot::from_input(w::AVERAGE_SCORE_DYNAMICS, input)
        })
        .register(w::PERFORMANCE_DISTRIBUTION, move |input| {
            *distribution = WidgetSlot::from_input(w::PERFORMANCE_DISTRIBUTION, input)
        })
        .register(w::CONTRIBUTION_ANALYSIS, move |input| {
            *contribution = WidgetSlot::from_input(w::CONTRIBUTION_ANALYSIS, input)
        });
        map
    }

    pub fn dynamics_spec(&self) -> Option<ChartSpec> {
        let points = self.dynamics.data()?;
        let labels = points.iter().map(|p| format!("Семестр {}", p.semester)).collect();
        let values = points.iter().map(|p| p.average_mark).collect();
        Some(
            ChartSpec::new(ChartKind::Line, labels)
                .with_dataset(Dataset::new("Средний балл", values, 0))
                .y_title("Средний балл"),
        )
    }

    pub fn distribution_spec(&self) -> Option<ChartSpec> {
        let items = self.distribution.data()?;
        let labels = items.iter().map(|i| i.label.clone()).collect();
        let values = items.iter().map(|i| Some(i.count as f64)).collect();
        Some(
            ChartSpec::new(ChartKind::Bar, labels)
                .with_dataset(Dataset::new("Количество студентов", values, 1)),
        )
    }

    pub fn contribution_spec(&self) -> Option<ChartSpec> {
        let items = self.contribution.data()?;
        Some(ChartSpec::radial(
            ChartKind::Pie,
            "Суммарные баллы",
            items
                .iter()
                .map(|i| (category_label(&i.category).to_string(), i.total_points))
                .collect(),
        ))
    }
}

impl WidgetDashboard for DeanState {
    type Filters = DeanFilters;

    fn apply_response(&mut self, response: &WidgetQueryResponse, batch: &PendingQuery<DeanFilters>) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute(response, &accepted, &mut self.renderers());
    }

    fn apply_failure(&mut self, batch: &PendingQuery<DeanFilters>, message: &str) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute_failure(&accepted, &mut self.renderers(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::ranking_table::RankingColumn;
    use serde_json::json;

    fn group(id: i64) -> StudentGroup {
        StudentGroup {
            id,
            name: format!("ИТ-{}", id),
            student_count: 20,
        }
    }

    #[test]
    fn test_initial_query_sends_null_group() {
        let mut state = DeanState::new(Some(3));
        let batch = state.load_all();
        let body = serde_json::to_value(&batch.request).unwrap();
        assert_eq!(body["filters"]["facultyId"], json!(3));
        assert!(body["filters"]["groupId"].is_null());
        assert_eq!(batch.widgets.len(), 4);
    }

    #[test]
    fn test_year_change_reloads_groups_and_drops_stale_list() {
        let mut state = DeanState::new(Some(3));
        let (_, _, first) = state.select_year(Some(2023)).unwrap();
        let (faculty, year, second) = state.select_year(Some(2022)).unwrap();
        assert_eq!((faculty, year), (3, 2022));

        assert!(state.finish_groups(second, Ok(vec![group(2)])));
        assert!(!state.finish_groups(first, Ok(vec![group(1)])));
        assert_eq!(state.groups.options(), &[group(2)]);

        assert!(state.select_year(None).is_none());
        assert!(!state.groups.is_enabled());
    }

    #[test]
    fn test_apply_filters_drills_into_group() {
        let mut state = DeanState::new(Some(3));
        let (_, _, g) = state.select_year(Some(2023)).unwrap();
        state.finish_groups(g, Ok(vec![group(7)]));
        state.select_group(Some(7));

        let batch = state.apply_filters();
        assert_eq!(batch.request.filters.formation_year, Some(2023));
        assert_eq!(batch.request.filters.group_id, Some(7));
        assert!(state.ranking.slot().is_busy());
    }

    #[test]
    fn test_charts_from_payloads() {
        let mut state = DeanState::new(Some(3));
        let batch = state.load_all();
        let response: WidgetQueryResponse = serde_json::from_value(json!({ "widgets": {
            "averageScoreDynamics": { "data": [
                { "semester": 1, "averageMark": 7.2 },
                { "semester": 2 }
            ] },
            "performanceDistribution": { "data": [
                { "label": "0-4", "count": 3 },
                { "label": "4-6", "count": 10 }
            ] },
            "contributionAnalysis": { "data": [
                { "category": "SCIENCE", "totalPoints": 40.0 }
            ] },
            "studentRankingList": { "data": { "data": [
                { "studentId": 1, "fullName": "Антонов А.", "totalScore": 9.1 }
            ] } }
        } }))
        .unwrap();
        state.apply_response(&response, &batch);

        let dynamics = state.dynamics_spec().unwrap();
        assert_eq!(dynamics.labels, vec!["Семестр 1", "Семестр 2"]);
        assert_eq!(dynamics.datasets[0].data, vec![Some(7.2), None]);

        let distribution = state.distribution_spec().unwrap();
        assert_eq!(distribution.datasets[0].data, vec![Some(3.0), Some(10.0)]);

        let contribution = state.contribution_spec().unwrap();
        assert_eq!(contribution.labels, vec!["Наука"]);

        let rows = state.ranking.rows();
        assert_eq!(RankingColumn::Group.cell(&rows[0]), "N/A");
        assert_eq!(RankingColumn::Name.cell(&rows[0]), "Антонов А.");
    }
}
