//! Teacher dashboard: latest achievements, group comparison, the grade
//! journal and the performance roster with achievement grants.

use chrono::NaiveDate;
use contracts::analytics::{widget_ids as w, GroupAverage, LatestAchievement, TeacherFilters, WidgetQueryResponse};
use contracts::domain::academic::{AchievementType, GrantAchievementDto, StudentGroup, Subject};
use contracts::domain::journal::{JournalStudent, PerformanceStudent};
use contracts::system::auth::RoleName;

use crate::analytics::{
    distribute, distribute_failure, widgets_for_role, BatchTracker, PendingQuery, RendererMap,
    WidgetDashboard, WidgetSet, WidgetSlot,
};
use crate::controllers::achievement_grant::AchievementGrant;
use crate::controllers::cascade::OptionsState;
use crate::controllers::generation::Generation;
use crate::controllers::journal::{JournalTable, JournalWrite, TodayCell};
use crate::controllers::subject_roster::{auto_subject, GroupContent, SubjectRoster};
use crate::shared::chart::{ChartKind, ChartSpec, Dataset};
use crate::shared::error::DashboardResult;
use crate::shared::format::{format_score, short_datetime, PLACEHOLDER};

/// CSS class of an average mark cell.
pub fn mark_class(average: Option<f64>) -> &'static str {
    match average {
        Some(m) if m >= 8.0 => "mark mark--high",
        Some(m) if m > 0.0 && m < 4.0 => "mark mark--low",
        _ => "mark",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub student: PerformanceStudent,
    /// `None` when the row has no student id to grant to.
    pub grant: Option<AchievementGrant>,
}

impl PerformanceRow {
    fn new(student: PerformanceStudent) -> Self {
        let grant = student.student_id.map(AchievementGrant::new);
        Self { student, grant }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeacherState {
    filters: TeacherFilters,
    widgets: WidgetSet,
    tracker: BatchTracker,
    pub achievements: WidgetSlot<Vec<LatestAchievement>>,
    pub comparison: WidgetSlot<Vec<GroupAverage>>,
    subjects: OptionsState<Subject>,
    achievement_types: Vec<AchievementType>,
    pub journal: SubjectRoster<JournalTable>,
    pub performance: SubjectRoster<Vec<PerformanceRow>>,
}

impl TeacherState {
    pub fn new(teacher_id: i64, batch_size: usize) -> Self {
        Self {
            filters: TeacherFilters { teacher_id },
            widgets: widgets_for_role(RoleName::Teacher).unwrap_or_default(),
            tracker: BatchTracker::default(),
            achievements: WidgetSlot::Loading,
            comparison: WidgetSlot::Loading,
            subjects: OptionsState::Loading,
            achievement_types: Vec::new(),
            journal: SubjectRoster::new(batch_size),
            performance: SubjectRoster::new(batch_size),
        }
    }

    pub fn load_all(&mut self) -> PendingQuery<TeacherFilters> {
        self.achievements.begin_update();
        self.comparison.begin_update();
        let set = self.widgets.clone();
        self.tracker.begin(&self.filters, &set)
    }

    pub fn reload(&mut self, ids: &[&str]) -> PendingQuery<TeacherFilters> {
        let set = self.widgets.narrow(ids);
        for id in set.iter() {
            match id.as_str() {
                w::MY_LATEST_ACHIEVEMENTS => self.achievements.begin_update(),
                w::MY_GROUP_COMPARISON => self.comparison.begin_update(),
                _ => {}
            }
        }
        self.tracker.begin(&self.filters, &set)
    }

    fn renderers(&mut self) -> RendererMap<'_> {
        let Self {
            achievements,
            comparison,
            ..
        } = self;
        let mut map = RendererMap::new();
        map.register(w::MY_LATEST_ACHIEVEMENTS, move |input| {
            *achievements = WidgetSlot::from_input(w::MY_LATEST_ACHIEVEMENTS, input)
        })
        .register(w::MY_GROUP_COMPARISON, move |input| {
            *comparison = WidgetSlot::from_input(w::MY_GROUP_COMPARISON, input)
        });
        map
    }

    // -- subjects ----------------------------------------------------------

    /// Subjects are fetched once and shared by both rosters. Returns the
    /// subject to auto-select.
    pub fn finish_subjects(&mut self, result: DashboardResult<Vec<Subject>>) -> Option<i64> {
        match result {
            Ok(subjects) => {
                let auto = auto_subject(&subjects);
                self.subjects = OptionsState::Ready(subjects);
                auto
            }
            Err(e) => {
                self.subjects = OptionsState::Failed(e.to_string());
                None
            }
        }
    }

    pub fn subjects(&self) -> &OptionsState<Subject> {
        &self.subjects
    }

    pub fn subject_list(&self) -> &[Subject] {
        match &self.subjects {
            OptionsState::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn set_achievement_types(&mut self, types: Vec<AchievementType>) {
        self.achievement_types = types;
    }

    pub fn achievement_types(&self) -> &[AchievementType] {
        &self.achievement_types
    }

    // -- journal -----------------------------------------------------------

    pub fn finish_journal(
        &mut self,
        group_id: i64,
        generation: Generation,
        result: DashboardResult<Vec<JournalStudent>>,
        today: NaiveDate,
    ) -> bool {
        let table = result.map(|students| JournalTable::build(students, today));
        self.journal.finish_content(group_id, generation, table)
    }

    /// Validates today's input for a student. `Ok(None)` when nothing is
    /// to be sent.
    pub fn begin_mark(
        &mut self,
        group_id: i64,
        student_id: i64,
        input: &str,
        absence_hours: u32,
    ) -> DashboardResult<Option<JournalWrite>> {
        let Some(subject) = self.journal.subject() else {
            return Ok(None);
        };
        match self.journal.content_mut(group_id) {
            Some(table) => table.begin_save(student_id, subject, input, absence_hours),
            None => Ok(None),
        }
    }

    pub fn finish_mark(&mut self, group_id: i64, write: &JournalWrite, result: &DashboardResult<()>) {
        if let Some(table) = self.journal.content_mut(group_id) {
            table.finish_save(write, result);
        }
    }

    /// Today's cell of one journal row.
    pub fn journal_today(&self, group_id: i64, student_id: i64) -> Option<TodayCell> {
        match self.journal.content(group_id)? {
            GroupContent::Ready(table) => table
                .rows()
                .iter()
                .find(|r| r.student_id == student_id)
                .map(|r| r.today.clone()),
            _ => None,
        }
    }

    // -- performance -------------------------------------------------------

    pub fn finish_performance(
        &mut self,
        group_id: i64,
        generation: Generation,
        result: DashboardResult<Vec<PerformanceStudent>>,
    ) -> bool {
        let rows = result.map(|students| students.into_iter().map(PerformanceRow::new).collect());
        self.performance.finish_content(group_id, generation, rows)
    }

    fn grant_mut(&mut self, group_id: i64, student_id: i64) -> Option<&mut AchievementGrant> {
        self.performance
            .content_mut(group_id)?
            .iter_mut()
            .filter(|r| r.student.student_id == Some(student_id))
            .find_map(|r| r.grant.as_mut())
    }

    pub fn grant_state(&self, group_id: i64, student_id: i64) -> Option<AchievementGrant> {
        match self.performance.content(group_id)? {
            GroupContent::Ready(rows) => rows
                .iter()
                .filter(|r| r.student.student_id == Some(student_id))
                .find_map(|r| r.grant.clone()),
            _ => None,
        }
    }

    pub fn select_achievement(&mut self, group_id: i64, student_id: i64, type_id: Option<i64>) {
        if let Some(grant) = self.grant_mut(group_id, student_id) {
            grant.select(type_id);
        }
    }

    pub fn begin_grant(
        &mut self,
        group_id: i64,
        student_id: i64,
    ) -> DashboardResult<Option<(Generation, GrantAchievementDto)>> {
        match self.grant_mut(group_id, student_id) {
            Some(grant) => grant.begin(),
            None => Ok(None),
        }
    }

    pub fn finish_grant(&mut self, group_id: i64, student_id: i64, generation: Generation, result: DashboardResult<()>) {
        let types = self.achievement_types.clone();
        if let Some(grant) = self.grant_mut(group_id, student_id) {
            grant.finish(generation, result, &types);
        }
    }

    // -- view models -------------------------------------------------------

    /// "Олимпиада (+5.00)" / "Студент ID: 7 | Добавлено: 01.10.2024"
    pub fn achievement_lines(&self) -> Vec<(String, String)> {
        self.achievements
            .data()
            .map(|items| {
                items
                    .iter()
                    .map(|a| {
                        let added = a
                            .created_at
                            .as_deref()
                            .map(short_datetime)
                            .unwrap_or_else(|| PLACEHOLDER.to_string());
                        (
                            format!("{} (+{})", a.type_name, format_score(Some(a.points_awarded))),
                            format!("Студент ID: {} | Добавлено: {}", a.student_id, added),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn comparison_spec(&self) -> Option<ChartSpec> {
        let items = self.comparison.data()?;
        let labels = items.iter().map(|g| g.group_name.clone()).collect();
        let values = items.iter().map(|g| g.average_mark).collect();
        Some(
            ChartSpec::new(ChartKind::Bar, labels)
                .with_dataset(Dataset::new("Средний балл", values, 0))
                .y_title("Средний балл"),
        )
    }
}

impl WidgetDashboard for TeacherState {
    type Filters = TeacherFilters;

    fn apply_response(&mut self, response: &WidgetQueryResponse, batch: &PendingQuery<TeacherFilters>) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute(response, &accepted, &mut self.renderers());
    }

    fn apply_failure(&mut self, batch: &PendingQuery<TeacherFilters>, message: &str) {
        let accepted = self.tracker.accepted(&batch.widgets, batch.generation);
        distribute_failure(&accepted, &mut self.renderers(), message);
    }
}
