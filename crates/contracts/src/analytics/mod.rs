pub mod filters;
pub mod payloads;

pub use filters::*;
pub use payloads::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Widget identity
// ---------------------------------------------------------------------------

/// Stable widget identifier, used as key in the batched query and the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub String);

impl WidgetId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Widget identifiers known to the analytics backend.
pub mod widget_ids {
    // Student
    pub const MY_SCORES: &str = "myScores";
    pub const MY_RANK: &str = "myRank";
    pub const MY_SCORE_BREAKDOWN: &str = "myScoreBreakdown";
    pub const MY_RANK_DYNAMICS: &str = "myRankDynamics";
    pub const STUDENT_RANKING_LIST: &str = "studentRankingList";

    // Dean staff
    pub const AVERAGE_SCORE_DYNAMICS: &str = "averageScoreDynamics";
    pub const PERFORMANCE_DISTRIBUTION: &str = "performanceDistribution";
    pub const CONTRIBUTION_ANALYSIS: &str = "contributionAnalysis";

    // Teacher
    pub const MY_LATEST_ACHIEVEMENTS: &str = "myLatestAchievements";
    pub const MY_GROUP_COMPARISON: &str = "myGroupComparison";

    // Administrator
    pub const ROLE_STATISTICS: &str = "roleStatistics";
    pub const USER_STATUS_OVERVIEW: &str = "userStatusOverview";

    // Rectorate staff
    pub const FACULTY_PERFORMANCE_COMPARISON: &str = "facultyPerformanceComparison";
    pub const EDUCATION_FORM_DISTRIBUTION: &str = "educationFormDistribution";
    pub const EXTRACURRICULAR_ACTIVITY_OVERVIEW: &str = "extracurricularActivityOverview";
}

// ---------------------------------------------------------------------------
// API request / response
// ---------------------------------------------------------------------------

/// Batch request: compute several widgets against one shared filter set.
///
/// Filter structs serialize every key, `null` included: the backend picks
/// widget calculators by filter *values*, so an omitted key and an explicit
/// `null` are not interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetQueryRequest<F> {
    pub filters: F,
    pub widget_ids: Vec<WidgetId>,
}

/// One widget entry of the response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetEntry {
    /// Widget-specific payload, `Null` when the backend had nothing to compute.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Batch response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetQueryResponse {
    #[serde(default)]
    pub widgets: HashMap<String, WidgetEntry>,
}

impl WidgetQueryResponse {
    /// Payload for `id`, `None` when the key is missing or its data is `null`.
    pub fn payload(&self, id: &WidgetId) -> Option<&serde_json::Value> {
        self.widgets
            .get(id.as_str())
            .map(|entry| &entry.data)
            .filter(|data| !data.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_tolerates_missing_and_null_widgets() {
        let resp: WidgetQueryResponse = serde_json::from_value(json!({
            "widgets": {
                "myRank": { "data": { "rank": 3, "total": 20 } },
                "myScores": { "data": null },
                "myScoreBreakdown": {}
            }
        }))
        .unwrap();

        assert!(resp.payload(&WidgetId::new(widget_ids::MY_RANK)).is_some());
        assert!(resp.payload(&WidgetId::new(widget_ids::MY_SCORES)).is_none());
        assert!(resp.payload(&WidgetId::new(widget_ids::MY_SCORE_BREAKDOWN)).is_none());
        assert!(resp.payload(&WidgetId::new(widget_ids::STUDENT_RANKING_LIST)).is_none());
    }

    #[test]
    fn test_empty_body_decodes_to_empty_envelope() {
        let resp: WidgetQueryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.widgets.is_empty());
    }

    #[test]
    fn test_request_uses_camel_case_keys() {
        let req = WidgetQueryRequest {
            filters: AdminFilters { admin_id: 7 },
            widget_ids: vec![WidgetId::new(widget_ids::ROLE_STATISTICS)],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "filters": { "adminId": 7 }, "widgetIds": ["roleStatistics"] })
        );
    }
}
