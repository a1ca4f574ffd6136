use contracts::analytics::{widget_ids as w, WidgetId};
use contracts::system::auth::RoleName;

/// Ordered, duplicate-free set of widget ids fixed when a dashboard mounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetSet {
    ids: Vec<WidgetId>,
}

impl WidgetSet {
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if !set.contains(id) {
                set.ids.push(WidgetId::new(id));
            }
        }
        set
    }

    pub fn ids(&self) -> &[WidgetId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetId> {
        self.ids.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|w| w.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Subset for a follow-up query: ids outside the mounted set are dropped,
    /// mount order is kept whatever order `wanted` lists them in.
    pub fn narrow(&self, wanted: &[&str]) -> WidgetSet {
        Self {
            ids: self
                .ids
                .iter()
                .filter(|id| wanted.contains(&id.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Ids of `self` that also belong to `other`.
    pub fn intersect(&self, other: &WidgetSet) -> WidgetSet {
        Self {
            ids: self
                .ids
                .iter()
                .filter(|id| other.contains(id.as_str()))
                .cloned()
                .collect(),
        }
    }
}

/// Widgets a role's dashboard mounts, `None` for roles without a dashboard.
pub fn widgets_for_role(role: RoleName) -> Option<WidgetSet> {
    let ids: &[&str] = match role {
        RoleName::Student => &[
            w::MY_SCORES,
            w::MY_RANK,
            w::MY_SCORE_BREAKDOWN,
            w::MY_RANK_DYNAMICS,
            w::STUDENT_RANKING_LIST,
        ],
        RoleName::DeanStaff => &[
            w::STUDENT_RANKING_LIST,
            w::AVERAGE_SCORE_DYNAMICS,
            w::PERFORMANCE_DISTRIBUTION,
            w::CONTRIBUTION_ANALYSIS,
        ],
        RoleName::Teacher => &[w::MY_LATEST_ACHIEVEMENTS, w::MY_GROUP_COMPARISON],
        RoleName::Administrator => &[w::ROLE_STATISTICS, w::USER_STATUS_OVERVIEW],
        RoleName::RectorateStaff => &[
            w::FACULTY_PERFORMANCE_COMPARISON,
            w::EDUCATION_FORM_DISTRIBUTION,
            w::EXTRACURRICULAR_ACTIVITY_OVERVIEW,
        ],
        RoleName::Unknown => return None,
    };
    Some(WidgetSet::new(ids.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deduplicates_in_order() {
        let set = WidgetSet::new(["myRank", "myScores", "myRank"]);
        let ids: Vec<_> = set.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["myRank", "myScores"]);
    }

    #[test]
    fn test_narrow_keeps_mount_order_and_drops_unknown() {
        let set = widgets_for_role(RoleName::Student).unwrap();
        let narrow = set.narrow(&[w::STUDENT_RANKING_LIST, "roleStatistics", w::MY_RANK]);
        let ids: Vec<_> = narrow.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec![w::MY_RANK, w::STUDENT_RANKING_LIST]);
    }

    #[test]
    fn test_role_sets() {
        assert_eq!(widgets_for_role(RoleName::Student).map(|s| s.len()), Some(5));
        assert_eq!(widgets_for_role(RoleName::DeanStaff).map(|s| s.len()), Some(4));
        assert_eq!(widgets_for_role(RoleName::Teacher).map(|s| s.len()), Some(2));
        assert_eq!(widgets_for_role(RoleName::Administrator).map(|s| s.len()), Some(2));
        assert_eq!(widgets_for_role(RoleName::RectorateStaff).map(|s| s.len()), Some(3));
        assert!(widgets_for_role(RoleName::Unknown).is_none());
    }
}
