//! Per-widget payload shapes of the analytics endpoint.
//!
//! Every numeric field the backend may leave out is optional; the frontend
//! renders a neutral placeholder for missing values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix marking a peer-comparison series in `myRankDynamics`.
pub const COMPARE_SUFFIX: &str = "_compare";

// ---------------------------------------------------------------------------
// Scalar KPI payloads
// ---------------------------------------------------------------------------

/// `myScores`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyScores {
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub average_mark: Option<f64>,
    /// Score formula components. Older backends omit it; the student dashboard
    /// then passes the components taken from its own ranking row.
    #[serde(default)]
    pub components: Option<ScoreComponents>,
}

/// Components of the total score: academic + extracurricular - absence penalty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    #[serde(default)]
    pub academic_score: Option<f64>,
    #[serde(default)]
    pub extracurricular_score: Option<f64>,
    #[serde(default)]
    pub absence_penalty: Option<f64>,
    #[serde(default)]
    pub excused_absence_hours: Option<f64>,
    #[serde(default)]
    pub unexcused_absence_hours: Option<f64>,
}

/// `myRank`. `rank == -1` means the student is not ranked in the context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRank {
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
}

// ---------------------------------------------------------------------------
// Category lists
// ---------------------------------------------------------------------------

/// Item of `myScoreBreakdown` and `contributionAnalysis`.
///
/// `myScoreBreakdown` is a bare array of these; the `{breakdown: [...]}`
/// wrapper seen in older backends is not accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPoints {
    pub category: String,
    #[serde(default)]
    pub total_points: f64,
}

/// Item of `performanceDistribution`, `roleStatistics`, `userStatusOverview`
/// and `educationFormDistribution`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    #[serde(default)]
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// `studentRankingList`: rows in server rank order plus semester metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingList {
    #[serde(default)]
    pub data: Vec<RankingRow>,
    #[serde(default)]
    pub available_semesters: Vec<u32>,
    #[serde(default)]
    pub selected_semester: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub student_id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub academic_score: Option<f64>,
    #[serde(default)]
    pub extracurricular_score: Option<f64>,
    #[serde(default)]
    pub absence_penalty: Option<f64>,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub excused_absence_hours: Option<f64>,
    #[serde(default)]
    pub unexcused_absence_hours: Option<f64>,
}

impl RankingRow {
    /// Score components carried by this row.
    pub fn components(&self) -> ScoreComponents {
        ScoreComponents {
            academic_score: self.academic_score,
            extracurricular_score: self.extracurricular_score,
            absence_penalty: self.absence_penalty,
            excused_absence_hours: self.excused_absence_hours,
            unexcused_absence_hours: self.unexcused_absence_hours,
        }
    }
}

// ---------------------------------------------------------------------------
// Dynamics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterPoint {
    pub semester: u32,
    #[serde(default)]
    pub average_mark: Option<f64>,
}

/// `myRankDynamics`: series key -> points. Comparison series carry [`COMPARE_SUFFIX`].
pub type RankDynamics = BTreeMap<String, Vec<SemesterPoint>>;

/// `averageScoreDynamics`
pub type AverageScoreDynamics = Vec<SemesterPoint>;

// ---------------------------------------------------------------------------
// Teacher
// ---------------------------------------------------------------------------

/// Item of `myLatestAchievements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAchievement {
    pub type_name: String,
    #[serde(default)]
    pub points_awarded: f64,
    pub student_id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Item of `myGroupComparison`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAverage {
    pub group_name: String,
    #[serde(default)]
    pub average_mark: Option<f64>,
}

// ---------------------------------------------------------------------------
// Rectorate
// ---------------------------------------------------------------------------

/// Item of `facultyPerformanceComparison`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyAverage {
    pub faculty_name: String,
    #[serde(default)]
    pub average_mark: Option<f64>,
}

/// Item of `extracurricularActivityOverview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyActivity {
    pub faculty_name: String,
    pub category: String,
    #[serde(default)]
    pub total_points: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ranking_list_partial_rows() {
        let list: RankingList = serde_json::from_value(json!({
            "data": [
                { "studentId": 1, "fullName": "Иванов И.", "totalScore": 8.5 },
                { "studentId": 2, "totalScore": null }
            ],
            "availableSemesters": [1, 2, 3]
        }))
        .unwrap();

        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[1].total_score, None);
        assert_eq!(list.available_semesters, vec![1, 2, 3]);
        assert_eq!(list.selected_semester, None);
    }

    #[test]
    fn test_breakdown_wrapper_shape_is_rejected() {
        let wrapped = json!({ "breakdown": [{ "category": "SCIENCE", "totalPoints": 3.0 }] });
        assert!(serde_json::from_value::<Vec<CategoryPoints>>(wrapped).is_err());

        let bare = json!([{ "category": "SCIENCE", "totalPoints": 3.0 }]);
        let items: Vec<CategoryPoints> = serde_json::from_value(bare).unwrap();
        assert_eq!(items[0].total_points, 3.0);
    }

    #[test]
    fn test_rank_dynamics_with_compare_series() {
        let dynamics: RankDynamics = serde_json::from_value(json!({
            "cumulativeTotal": [{ "semester": 1, "averageMark": 7.1 }],
            "cumulativeTotal_compare": [{ "semester": 1, "averageMark": 6.4 }]
        }))
        .unwrap();
        assert_eq!(
            dynamics.keys().filter(|k| k.ends_with(COMPARE_SUFFIX)).count(),
            1
        );
    }
}
