use contracts::analytics::WidgetQueryRequest;

use super::widgets::WidgetSet;

/// One batched request for `set` under the given filters.
///
/// The request owns its own copy of the filters; later edits to the
/// controller's filter state never reach a request already built.
pub fn build_query<F: Clone>(filters: &F, set: &WidgetSet) -> WidgetQueryRequest<F> {
    WidgetQueryRequest {
        filters: filters.clone(),
        widget_ids: set.ids().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::analytics::{widget_ids as w, DeanFilters, StudentFilters};
    use serde_json::json;

    #[test]
    fn test_student_query_body() {
        let set = WidgetSet::new([w::MY_RANK, w::MY_SCORES]);
        let req = build_query(&StudentFilters::new(42), &set);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "filters": {
                    "studentId": 42,
                    "comparisonContext": "GROUP",
                    "lines": ["cumulativeTotal"],
                    "rankingSemester": null,
                    "compareWithStudentId": null
                },
                "widgetIds": ["myRank", "myScores"]
            })
        );
    }

    #[test]
    fn test_request_is_detached_from_filters() {
        let mut filters = DeanFilters {
            faculty_id: Some(1),
            ..Default::default()
        };
        let req = build_query(&filters, &WidgetSet::new([w::STUDENT_RANKING_LIST]));
        filters.group_id = Some(9);
        assert_eq!(req.filters.group_id, None);
    }
}
