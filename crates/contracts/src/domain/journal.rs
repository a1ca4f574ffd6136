use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Assessment type recorded for marks entered through the journal.
pub const ASSESSMENT_SEMESTER_MARK: &str = "SEMESTER_MARK";
/// Reason type recorded for absences entered through the journal.
pub const ABSENCE_UNEXCUSED: &str = "UNEXCUSED";

/// One student row of `/teacher/group/{id}/journal-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStudent {
    pub student_id: i64,
    pub student_full_name: String,
    #[serde(default)]
    pub events: Vec<JournalEvent>,
}

/// A mark or an absence on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEvent {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Mark number or absence letter, depending on the backend version.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl JournalEvent {
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// One student row of `/teacher/group/{id}/performance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStudent {
    #[serde(default)]
    pub student_id: Option<i64>,
    pub student_full_name: String,
    #[serde(default)]
    pub average_mark: Option<f64>,
}

/// Body of `POST /grades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeDto {
    pub student_id: i64,
    pub subject_id: i64,
    pub assessment_type: String,
    pub mark: u8,
    pub exam_date: NaiveDate,
}

/// Body of `POST /absences`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAbsenceDto {
    pub student_id: i64,
    pub subject_id: i64,
    pub absence_date: NaiveDate,
    pub hours: u32,
    pub reason_type: String,
}
