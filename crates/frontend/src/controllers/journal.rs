//! Group journal: dated mark columns plus an input column for today.

use chrono::NaiveDate;
use contracts::domain::journal::{
    CreateAbsenceDto, CreateGradeDto, JournalStudent, ABSENCE_UNEXCUSED, ASSESSMENT_SEMESTER_MARK,
};

use crate::shared::error::{DashboardError, DashboardResult};
use crate::shared::format::short_date;

pub const MARK_HINT: &str = "Введите оценку (1-10) или \"н\"";
pub const ABSENCE_MARK: &str = "Н";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkEntry {
    Mark(u8),
    Absence,
}

/// Parses a journal cell: a mark 1..=10 or "Н" (Cyrillic or Latin) for an absence.
pub fn parse_mark_entry(input: &str) -> DashboardResult<MarkEntry> {
    let value = input.trim().to_uppercase();
    if value == "Н" || value == "H" {
        return Ok(MarkEntry::Absence);
    }
    match value.parse::<u8>() {
        Ok(mark) if (1..=10).contains(&mark) => Ok(MarkEntry::Mark(mark)),
        _ => Err(DashboardError::validation(MARK_HINT)),
    }
}

/// Request produced by a saved journal cell.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalWrite {
    Grade(CreateGradeDto),
    Absence(CreateAbsenceDto),
}

impl JournalWrite {
    pub fn new(entry: MarkEntry, student_id: i64, subject_id: i64, date: NaiveDate, absence_hours: u32) -> Self {
        match entry {
            MarkEntry::Mark(mark) => Self::Grade(CreateGradeDto {
                student_id,
                subject_id,
                assessment_type: ASSESSMENT_SEMESTER_MARK.to_string(),
                mark,
                exam_date: date,
            }),
            MarkEntry::Absence => Self::Absence(CreateAbsenceDto {
                student_id,
                subject_id,
                absence_date: date,
                hours: absence_hours,
                reason_type: ABSENCE_UNEXCUSED.to_string(),
            }),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Grade(_) => "/grades",
            Self::Absence(_) => "/absences",
        }
    }

    pub fn student_id(&self) -> i64 {
        match self {
            Self::Grade(dto) => dto.student_id,
            Self::Absence(dto) => dto.student_id,
        }
    }

    /// What the cell shows once saved.
    pub fn display(&self) -> String {
        match self {
            Self::Grade(dto) => dto.mark.to_string(),
            Self::Absence(_) => ABSENCE_MARK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TodayCell {
    Open,
    Saving,
    /// A mark or absence already exists for today; input is locked.
    Recorded(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalRow {
    pub student_id: i64,
    pub name: String,
    /// One cell per dated column.
    pub cells: Vec<String>,
    pub today: TodayCell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalTable {
    dates: Vec<String>,
    today: NaiveDate,
    rows: Vec<JournalRow>,
}

impl JournalTable {
    /// Columns are the sorted distinct event dates before today; today's
    /// events fill the input column.
    pub fn build(students: Vec<JournalStudent>, today: NaiveDate) -> Self {
        let today_iso = today.format("%Y-%m-%d").to_string();

        let mut dates: Vec<String> = students
            .iter()
            .flat_map(|s| s.events.iter().map(|e| e.date.clone()))
            .filter(|d| *d != today_iso)
            .collect();
        dates.sort();
        dates.dedup();

        let rows = students
            .into_iter()
            .map(|student| {
                let cell_for = |date: &str| {
                    student
                        .events
                        .iter()
                        .filter(|e| e.date == date)
                        .map(|e| e.display_value())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let cells = dates.iter().map(|d| cell_for(d)).collect();
                let recorded = cell_for(&today_iso);
                JournalRow {
                    student_id: student.student_id,
                    name: student.student_full_name.clone(),
                    cells,
                    today: if recorded.is_empty() {
                        TodayCell::Open
                    } else {
                        TodayCell::Recorded(recorded)
                    },
                }
            })
            .collect();

        Self { dates, today, rows }
    }

    pub fn headers(&self) -> Vec<String> {
        self.dates.iter().map(|d| short_date(d)).collect()
    }

    pub fn today_header(&self) -> String {
        format!("Сегодня ({})", self.today.format("%d.%m"))
    }

    pub fn rows(&self) -> &[JournalRow] {
        &self.rows
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn row_mut(&mut self, student_id: i64) -> Option<&mut JournalRow> {
        self.rows.iter_mut().find(|r| r.student_id == student_id)
    }

    /// Validates the input and locks the cell. `Ok(None)` when the cell is
    /// already saving or recorded.
    pub fn begin_save(
        &mut self,
        student_id: i64,
        subject_id: i64,
        input: &str,
        absence_hours: u32,
    ) -> DashboardResult<Option<JournalWrite>> {
        let today = self.today;
        let Some(row) = self.row_mut(student_id) else {
            return Ok(None);
        };
        if row.today != TodayCell::Open {
            return Ok(None);
        }
        let entry = parse_mark_entry(input)?;
        row.today = TodayCell::Saving;
        Ok(Some(JournalWrite::new(entry, student_id, subject_id, today, absence_hours)))
    }

    /// Success locks the cell with the saved value; failure re-opens it.
    pub fn finish_save(&mut self, write: &JournalWrite, result: &DashboardResult<()>) {
        if let Some(row) = self.row_mut(write.student_id()) {
            row.today = match result {
                Ok(()) => TodayCell::Recorded(write.display()),
                Err(_) => TodayCell::Open,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 7).unwrap()
    }

    fn students() -> Vec<JournalStudent> {
        serde_json::from_value(json!([
            {
                "studentId": 1,
                "studentFullName": "Иванов И.",
                "events": [
                    { "date": "2024-10-01", "value": 8 },
                    { "date": "2024-09-20", "value": "Н" }
                ]
            },
            {
                "studentId": 2,
                "studentFullName": "Петров П.",
                "events": [
                    { "date": "2024-10-01", "value": 6 },
                    { "date": "2024-10-07", "value": 9 }
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_parse_mark_entry() {
        assert_eq!(parse_mark_entry(" 10 "), Ok(MarkEntry::Mark(10)));
        assert_eq!(parse_mark_entry("н"), Ok(MarkEntry::Absence));
        assert_eq!(parse_mark_entry("h"), Ok(MarkEntry::Absence));
        assert!(parse_mark_entry("0").is_err());
        assert!(parse_mark_entry("11").is_err());
        assert!(parse_mark_entry("").is_err());
    }

    #[test]
    fn test_columns_and_today_lock() {
        let table = JournalTable::build(students(), today());
        assert_eq!(table.headers(), vec!["20.09", "01.10"]);
        assert_eq!(table.today_header(), "Сегодня (07.10)");

        let rows = table.rows();
        assert_eq!(rows[0].cells, vec!["Н", "8"]);
        assert_eq!(rows[0].today, TodayCell::Open);
        assert_eq!(rows[1].cells, vec!["", "6"]);
        assert_eq!(rows[1].today, TodayCell::Recorded("9".into()));
    }

    #[test]
    fn test_save_absence_body() {
        let mut table = JournalTable::build(students(), today());
        let write = table.begin_save(1, 3, "Н", 2).unwrap().unwrap();
        assert_eq!(write.path(), "/absences");
        match &write {
            JournalWrite::Absence(dto) => {
                assert_eq!(dto.hours, 2);
                assert_eq!(dto.reason_type, "UNEXCUSED");
                assert_eq!(dto.absence_date, today());
            }
            other => panic!("unexpected write {:?}", other),
        }

        // second submit while saving is ignored
        assert_eq!(table.begin_save(1, 3, "7", 2), Ok(None));

        table.finish_save(&write, &Ok(()));
        assert_eq!(table.rows()[0].today, TodayCell::Recorded("Н".into()));
    }

    #[test]
    fn test_failed_save_reopens_input() {
        let mut table = JournalTable::build(students(), today());
        let write = table.begin_save(1, 3, "7", 2).unwrap().unwrap();
        table.finish_save(&write, &Err(DashboardError::Network("offline".into())));
        assert_eq!(table.rows()[0].today, TodayCell::Open);
    }

    #[test]
    fn test_invalid_input_keeps_cell_open() {
        let mut table = JournalTable::build(students(), today());
        assert!(table.begin_save(1, 3, "abc", 2).is_err());
        assert_eq!(table.rows()[0].today, TodayCell::Open);
        assert_eq!(table.begin_save(2, 3, "5", 2), Ok(None));
    }
}
