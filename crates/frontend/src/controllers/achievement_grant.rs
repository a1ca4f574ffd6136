//! One-shot achievement grant for a student row of the performance widget.

use contracts::domain::academic::{AchievementType, GrantAchievementDto};

use super::fetch_state::ControlFetch;
use super::generation::Generation;
use crate::shared::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementGrant {
    student_id: i64,
    selected: Option<i64>,
    fetch: ControlFetch,
    granted: Option<String>,
}

impl AchievementGrant {
    pub fn new(student_id: i64) -> Self {
        Self {
            student_id,
            selected: None,
            fetch: ControlFetch::reject_while_busy(),
            granted: None,
        }
    }

    pub fn select(&mut self, type_id: Option<i64>) {
        if self.is_select_enabled() {
            self.selected = type_id;
        }
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    /// Starts the grant. `Ok(None)` while one is in flight or after success.
    pub fn begin(&mut self) -> DashboardResult<Option<(Generation, GrantAchievementDto)>> {
        if self.granted.is_some() {
            return Ok(None);
        }
        let Some(achievement_type_id) = self.selected else {
            return Err(DashboardError::validation("Выберите достижение"));
        };
        Ok(self.fetch.begin().map(|generation| {
            (
                generation,
                GrantAchievementDto {
                    student_id: self.student_id,
                    achievement_type_id,
                },
            )
        }))
    }

    pub fn finish(&mut self, generation: Generation, result: DashboardResult<()>, types: &[AchievementType]) {
        match result {
            Ok(()) => {
                if self.fetch.finish_ok(generation) {
                    let name = types
                        .iter()
                        .find(|t| Some(t.id) == self.selected)
                        .map(|t| t.name.clone())
                        .unwrap_or_default();
                    self.granted = Some(name);
                }
            }
            Err(e) => {
                self.fetch.finish_err(generation, e.to_string());
            }
        }
    }

    pub fn is_select_shown(&self) -> bool {
        self.granted.is_none()
    }

    pub fn is_select_enabled(&self) -> bool {
        self.granted.is_none() && !self.fetch.is_busy()
    }

    pub fn granted(&self) -> Option<&str> {
        self.granted.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.fetch.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> Vec<AchievementType> {
        vec![AchievementType {
            id: 3,
            name: "Олимпиада".into(),
            points: Some(5.0),
        }]
    }

    #[test]
    fn test_failed_grant_leaves_select_usable() {
        let mut grant = AchievementGrant::new(11);
        grant.select(Some(3));
        let (generation, dto) = grant.begin().unwrap().unwrap();
        assert_eq!(dto.student_id, 11);
        assert!(!grant.is_select_enabled());

        grant.finish(generation, Err(DashboardError::Network("offline".into())), &types());
        assert!(grant.is_select_shown());
        assert!(grant.is_select_enabled());
        assert_eq!(grant.selected(), Some(3));
        assert!(grant.error().is_some());
    }

    #[test]
    fn test_grant_is_one_shot() {
        let mut grant = AchievementGrant::new(11);
        grant.select(Some(3));
        let (generation, _) = grant.begin().unwrap().unwrap();
        assert_eq!(grant.begin(), Ok(None));

        grant.finish(generation, Ok(()), &types());
        assert_eq!(grant.granted(), Some("Олимпиада"));
        assert!(!grant.is_select_shown());
        assert_eq!(grant.begin(), Ok(None));
    }

    #[test]
    fn test_grant_requires_selection() {
        let mut grant = AchievementGrant::new(11);
        assert!(matches!(grant.begin(), Err(DashboardError::Validation(_))));
    }
}
