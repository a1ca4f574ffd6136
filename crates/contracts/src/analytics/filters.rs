use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Peer population a student's rank is computed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonContext {
    #[default]
    Group,
    Faculty,
    Global,
}

impl ComparisonContext {
    pub const ALL: [ComparisonContext; 3] = [Self::Group, Self::Faculty, Self::Global];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Group => "GROUP",
            Self::Faculty => "FACULTY",
            Self::Global => "GLOBAL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Group => "В группе",
            Self::Faculty => "На факультете",
            Self::Global => "В университете",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// Dynamics chart series keys the backend can compute.
pub mod dynamics_lines {
    pub const CUMULATIVE_TOTAL: &str = "cumulativeTotal";
    pub const SEMESTER_TOTAL: &str = "semesterTotal";
    pub const ACADEMIC: &str = "academic";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const ABSENCES: &str = "absences";

    pub const ALL: [&str; 5] = [
        CUMULATIVE_TOTAL,
        SEMESTER_TOTAL,
        ACADEMIC,
        ACHIEVEMENTS,
        ABSENCES,
    ];
}

/// Filters sent by the student dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilters {
    pub student_id: i64,
    pub comparison_context: ComparisonContext,
    /// Always sent, even with a single line checked.
    pub lines: BTreeSet<String>,
    pub ranking_semester: Option<u32>,
    pub compare_with_student_id: Option<i64>,
}

impl StudentFilters {
    pub fn new(student_id: i64) -> Self {
        Self {
            student_id,
            comparison_context: ComparisonContext::default(),
            lines: BTreeSet::from([dynamics_lines::CUMULATIVE_TOTAL.to_string()]),
            ranking_semester: None,
            compare_with_student_id: None,
        }
    }
}

/// Filters sent by the dean dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeanFilters {
    pub faculty_id: Option<i64>,
    pub formation_year: Option<i32>,
    /// `null` unless a group is drilled into.
    pub group_id: Option<i64>,
    pub ranking_semester: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherFilters {
    pub teacher_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFilters {
    pub admin_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectorateFilters {
    pub rectorate_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_filters_send_explicit_nulls() {
        let filters = StudentFilters::new(42);
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({
                "studentId": 42,
                "comparisonContext": "GROUP",
                "lines": ["cumulativeTotal"],
                "rankingSemester": null,
                "compareWithStudentId": null
            })
        );
    }

    #[test]
    fn test_dean_filters_keep_group_key_when_not_drilled() {
        let filters = DeanFilters {
            faculty_id: Some(3),
            formation_year: Some(2023),
            ..Default::default()
        };
        let value = serde_json::to_value(&filters).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("groupId"));
        assert!(obj["groupId"].is_null());
        assert_eq!(obj["formationYear"], json!(2023));
    }

    #[test]
    fn test_comparison_context_codes() {
        assert_eq!(ComparisonContext::from_code("FACULTY"), Some(ComparisonContext::Faculty));
        assert_eq!(ComparisonContext::from_code("nope"), None);
        assert_eq!(
            serde_json::to_value(ComparisonContext::Global).unwrap(),
            json!("GLOBAL")
        );
    }
}
