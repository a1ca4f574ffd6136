//! Ranking table: sorting, column visibility, search and semester filter.
//!
//! Rows keep the server rank order in memory; every view is re-derived from
//! it, so sorting and searching are idempotent and never hit the network.
//! Only the semester filter needs a refresh of `studentRankingList`.

use contracts::analytics::{RankingList, RankingRow};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::analytics::WidgetSlot;
use crate::shared::format::{format_score, PLACEHOLDER};
use crate::shared::list_utils::{compare_opt_f64, sort_list, Searchable, SortOrder, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RankingColumn {
    Rank,
    StudentId,
    Name,
    Group,
    Academic,
    Extracurricular,
    AbsencePenalty,
    Total,
}

impl RankingColumn {
    /// Anonymized list shown to students.
    pub const STUDENT: [RankingColumn; 3] = [Self::Rank, Self::StudentId, Self::Total];

    pub const DEAN: [RankingColumn; 7] = [
        Self::Rank,
        Self::Name,
        Self::Group,
        Self::Academic,
        Self::Extracurricular,
        Self::AbsencePenalty,
        Self::Total,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Rank => "Место",
            Self::StudentId => "ID студента (анонимно)",
            Self::Name => "ФИО",
            Self::Group => "Группа",
            Self::Academic => "Учёба",
            Self::Extracurricular => "Достижения",
            Self::AbsencePenalty => "Штраф за пропуски",
            Self::Total => "Итоговый балл",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Name | Self::Group)
    }

    pub fn cell(self, row: &RankedRow) -> String {
        let r = &row.row;
        match self {
            Self::Rank => row.position.to_string(),
            Self::StudentId => r.student_id.to_string(),
            Self::Name => r.full_name.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            Self::Group => r.group_name.clone().unwrap_or_else(|| "N/A".to_string()),
            Self::Academic => format_score(r.academic_score),
            Self::Extracurricular => format_score(r.extracurricular_score),
            Self::AbsencePenalty => format_score(r.absence_penalty),
            Self::Total => format_score(r.total_score),
        }
    }
}

/// Row with its server rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub position: usize,
    pub row: RankingRow,
    pub is_me: bool,
}

impl Sortable for RankedRow {
    type Field = RankingColumn;

    fn compare_by_field(&self, other: &Self, field: RankingColumn) -> Ordering {
        let (a, b) = (&self.row, &other.row);
        match field {
            RankingColumn::Rank => self.position.cmp(&other.position),
            RankingColumn::StudentId => a.student_id.cmp(&b.student_id),
            RankingColumn::Name => a.full_name.cmp(&b.full_name),
            RankingColumn::Group => a.group_name.cmp(&b.group_name),
            RankingColumn::Academic => compare_opt_f64(a.academic_score, b.academic_score),
            RankingColumn::Extracurricular => {
                compare_opt_f64(a.extracurricular_score, b.extracurricular_score)
            }
            RankingColumn::AbsencePenalty => compare_opt_f64(a.absence_penalty, b.absence_penalty),
            RankingColumn::Total => compare_opt_f64(a.total_score, b.total_score),
        }
    }
}

impl Searchable for RankedRow {
    fn matches_filter(&self, filter_lower: &str) -> bool {
        let r = &self.row;
        r.student_id.to_string().contains(filter_lower)
            || r
                .full_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(filter_lower))
            || r
                .group_name
                .as_deref()
                .is_some_and(|g| g.to_lowercase().contains(filter_lower))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingTable {
    slot: WidgetSlot<RankingList>,
    columns: Vec<RankingColumn>,
    hidden: BTreeSet<RankingColumn>,
    sort: Option<(RankingColumn, SortOrder)>,
    search: String,
    me: Option<i64>,
    semester: Option<u32>,
    /// Set once the user picks a semester; from then on `None` means "all"
    /// and the server's default no longer applies.
    semester_chosen: bool,
}

impl RankingTable {
    pub fn new(columns: &[RankingColumn], me: Option<i64>) -> Self {
        Self {
            slot: WidgetSlot::Loading,
            columns: columns.to_vec(),
            hidden: BTreeSet::new(),
            sort: None,
            search: String::new(),
            me,
            semester: None,
            semester_chosen: false,
        }
    }

    pub fn for_student(student_id: i64) -> Self {
        Self::new(&RankingColumn::STUDENT, Some(student_id))
    }

    pub fn for_dean() -> Self {
        Self::new(&RankingColumn::DEAN, None)
    }

    /// New data from the distributor. Local view state is kept; the
    /// server's semester is adopted only until the user picks one.
    pub fn apply(&mut self, slot: WidgetSlot<RankingList>) {
        if !self.semester_chosen {
            if let Some(selected) = slot.data().and_then(|d| d.selected_semester) {
                self.semester = Some(selected);
            }
        }
        self.slot = slot;
    }

    pub fn begin_update(&mut self) {
        self.slot.begin_update();
    }

    pub fn slot(&self) -> &WidgetSlot<RankingList> {
        &self.slot
    }

    /// Header click. Ignored while the table is refreshing.
    pub fn toggle_sort(&mut self, column: RankingColumn) -> bool {
        if self.slot.is_busy() {
            return false;
        }
        self.sort = match self.sort {
            Some((current, order)) if current == column => Some((column, order.flipped())),
            _ => Some((column, SortOrder::Asc)),
        };
        true
    }

    pub fn sort(&self) -> Option<(RankingColumn, SortOrder)> {
        self.sort
    }

    /// Shows or hides a column; the last visible column cannot be hidden.
    pub fn toggle_column(&mut self, column: RankingColumn) -> bool {
        if self.hidden.remove(&column) {
            return true;
        }
        if !self.columns.contains(&column) || self.visible_columns().len() <= 1 {
            return false;
        }
        self.hidden.insert(column);
        true
    }

    pub fn columns(&self) -> &[RankingColumn] {
        &self.columns
    }

    pub fn is_visible(&self, column: RankingColumn) -> bool {
        self.columns.contains(&column) && !self.hidden.contains(&column)
    }

    pub fn visible_columns(&self) -> Vec<RankingColumn> {
        self.columns
            .iter()
            .copied()
            .filter(|c| !self.hidden.contains(c))
            .collect()
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns `true` when `studentRankingList` must be re-queried.
    pub fn select_semester(&mut self, semester: Option<u32>) -> bool {
        self.semester_chosen = true;
        if self.semester == semester {
            return false;
        }
        self.semester = semester;
        self.slot.begin_update();
        true
    }

    pub fn semester(&self) -> Option<u32> {
        self.semester
    }

    pub fn available_semesters(&self) -> Vec<u32> {
        self.slot
            .data()
            .map(|d| d.available_semesters.clone())
            .unwrap_or_default()
    }

    /// Row of the signed-in student, if listed.
    pub fn my_row(&self) -> Option<&RankingRow> {
        let me = self.me?;
        self.slot.data()?.data.iter().find(|r| r.student_id == me)
    }

    /// Rows to display: search, then stable sort over server order.
    pub fn rows(&self) -> Vec<RankedRow> {
        let Some(list) = self.slot.data() else {
            return Vec::new();
        };
        let ranked: Vec<RankedRow> = list
            .data
            .iter()
            .enumerate()
            .map(|(i, row)| RankedRow {
                position: i + 1,
                row: row.clone(),
                is_me: self.me == Some(row.student_id),
            })
            .collect();

        let filter = self.search.trim().to_lowercase();
        let mut rows: Vec<RankedRow> = if filter.is_empty() {
            ranked
        } else {
            ranked
                .into_iter()
                .filter(|r| r.matches_filter(&filter))
                .collect()
        };
        if let Some((column, order)) = self.sort {
            sort_list(&mut rows, column, order);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, total: Option<f64>) -> RankingRow {
        RankingRow {
            student_id: id,
            full_name: Some(name.to_string()),
            group_name: Some("ИТ-21".to_string()),
            total_score: total,
            ..Default::default()
        }
    }

    fn table() -> RankingTable {
        let mut t = RankingTable::for_dean();
        t.apply(WidgetSlot::Ready(RankingList {
            data: vec![
                row(1, "Антонов", Some(9.0)),
                row(2, "Белов", Some(8.0)),
                row(3, "Волков", Some(8.0)),
                row(4, "Громов", None),
            ],
            available_semesters: vec![1, 2],
            selected_semester: None,
        }));
        t
    }

    fn ids(rows: &[RankedRow]) -> Vec<i64> {
        rows.iter().map(|r| r.row.student_id).collect()
    }

    #[test]
    fn test_sort_flip_and_flip_back_restores_sequence() {
        let mut t = table();
        t.toggle_sort(RankingColumn::Total);
        let asc = ids(&t.rows());
        assert_eq!(asc, vec![2, 3, 1, 4]);

        t.toggle_sort(RankingColumn::Total);
        assert_eq!(ids(&t.rows()), vec![4, 1, 2, 3]);

        t.toggle_sort(RankingColumn::Total);
        assert_eq!(ids(&t.rows()), asc);
    }

    #[test]
    fn test_view_is_idempotent() {
        let mut t = table();
        t.toggle_sort(RankingColumn::Name);
        t.set_search("ов");
        assert_eq!(t.rows(), t.rows());

        t.set_search("бел");
        assert_eq!(ids(&t.rows()), vec![2]);
        assert_eq!(t.rows()[0].position, 2);
    }

    #[test]
    fn test_sort_blocked_while_refreshing() {
        let mut t = table();
        assert!(t.select_semester(Some(2)));
        assert!(!t.select_semester(Some(2)));
        assert!(!t.toggle_sort(RankingColumn::Total));
        assert_eq!(t.sort(), None);
        // previous rows stay visible during the refresh
        assert_eq!(t.rows().len(), 4);
    }

    #[test]
    fn test_all_semesters_choice_survives_refresh() {
        let list = |selected| RankingList {
            data: vec![row(1, "Антонов", Some(9.0))],
            available_semesters: vec![1, 2],
            selected_semester: selected,
        };
        let mut t = RankingTable::for_dean();
        t.apply(WidgetSlot::Ready(list(Some(2))));
        assert_eq!(t.semester(), Some(2));

        assert!(t.select_semester(None));
        t.apply(WidgetSlot::Ready(list(Some(2))));
        assert_eq!(t.semester(), None);
        assert!(!t.select_semester(None));

        assert!(t.select_semester(Some(1)));
        t.apply(WidgetSlot::Ready(list(Some(2))));
        assert_eq!(t.semester(), Some(1));
    }

    #[test]
    fn test_last_visible_column_stays() {
        let mut t = RankingTable::for_student(2);
        assert!(t.toggle_column(RankingColumn::Rank));
        assert!(t.toggle_column(RankingColumn::StudentId));
        assert!(!t.toggle_column(RankingColumn::Total));
        assert_eq!(t.visible_columns(), vec![RankingColumn::Total]);
        assert!(t.toggle_column(RankingColumn::Rank));
        assert!(t.is_visible(RankingColumn::Rank));
    }

    #[test]
    fn test_cells_follow_visible_columns() {
        let mut t = table();
        t.toggle_column(RankingColumn::Name);
        let columns = t.visible_columns();
        let rendered: Vec<Vec<String>> = t
            .rows()
            .iter()
            .map(|row| columns.iter().map(|c| c.cell(row)).collect())
            .collect();

        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[0].len(), RankingColumn::DEAN.len() - 1);
        assert_eq!(rendered[0][0], "1");
        assert_eq!(rendered[0][1], "ИТ-21");
        assert_eq!(rendered[0].last().map(String::as_str), Some("9.00"));
        assert_eq!(rendered[3].last().map(String::as_str), Some(PLACEHOLDER));
    }

    #[test]
    fn test_is_me_and_my_row() {
        let mut t = RankingTable::for_student(3);
        t.apply(table().slot().clone());
        let rows = t.rows();
        assert!(rows.iter().find(|r| r.is_me).is_some_and(|r| r.row.student_id == 3));
        assert_eq!(t.my_row().map(|r| r.student_id), Some(3));
    }
}
