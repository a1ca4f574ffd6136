//! Dependent selects: a change upstream clears and disables everything below,
//! then the next level reloads. Generation tokens drop stale loads.

use contracts::domain::academic::{Specialty, StudentGroup};

use super::generation::{Generation, GenerationCounter};
use crate::shared::error::DashboardResult;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionsState<T> {
    #[default]
    Disabled,
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependentSelect<T> {
    state: OptionsState<T>,
    selected: Option<i64>,
    counter: GenerationCounter,
}

impl<T> Default for DependentSelect<T> {
    fn default() -> Self {
        Self {
            state: OptionsState::Disabled,
            selected: None,
            counter: GenerationCounter::default(),
        }
    }
}

impl<T> DependentSelect<T> {
    /// Upstream changed: clear, disable, drop pending loads.
    pub fn invalidate(&mut self) {
        self.counter.invalidate();
        self.state = OptionsState::Disabled;
        self.selected = None;
    }

    pub fn begin_load(&mut self) -> Generation {
        self.selected = None;
        self.state = OptionsState::Loading;
        self.counter.next()
    }

    /// Applies a load result. `false` when a newer load superseded it.
    pub fn finish(&mut self, generation: Generation, result: DashboardResult<Vec<T>>) -> bool {
        if !self.counter.is_current(generation) {
            log::debug!("dropping stale options load {:?}", generation);
            return false;
        }
        self.state = match result {
            Ok(items) => OptionsState::Ready(items),
            Err(e) => OptionsState::Failed(e.to_string()),
        };
        true
    }

    pub fn set_ready(&mut self, items: Vec<T>) {
        self.counter.invalidate();
        self.state = OptionsState::Ready(items);
    }

    pub fn select(&mut self, id: Option<i64>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn state(&self) -> &OptionsState<T> {
        &self.state
    }

    pub fn options(&self) -> &[T] {
        match &self.state {
            OptionsState::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, OptionsState::Ready(_))
    }
}

/// Student's group pick in the approval form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChoice {
    Existing(i64),
    /// `POST /groups/auto-create`, first course only.
    CreateNew,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupOption {
    pub choice: GroupChoice,
    pub label: String,
    pub disabled: bool,
    pub class: &'static str,
}

/// Options of the group select. First-course groups are capped at `capacity`
/// and the list ends with a "create new group" entry.
pub fn group_options(groups: &[StudentGroup], course: u8, capacity: u32) -> Vec<GroupOption> {
    let first_course = course == 1;
    let mut options: Vec<GroupOption> = groups
        .iter()
        .map(|g| {
            let full = first_course && g.student_count >= capacity;
            let mut label = format!("{} ({} чел.)", g.name, g.student_count);
            if full {
                label.push_str(" [ЗАПОЛНЕНА]");
            }
            GroupOption {
                choice: GroupChoice::Existing(g.id),
                label,
                disabled: full,
                class: if full {
                    "option--full"
                } else if first_course {
                    "option--free"
                } else {
                    ""
                },
            }
        })
        .collect();

    if first_course {
        options.push(GroupOption {
            choice: GroupChoice::CreateNew,
            label: "+ Создать новую группу".to_string(),
            disabled: false,
            class: "option--create",
        });
    }
    options
}

pub fn group_hint(course: u8) -> &'static str {
    if course == 1 {
        "Для 1 курса можно создать новую группу, если остальные заполнены."
    } else {
        "Для старших курсов лимит студентов не проверяется."
    }
}

pub const COURSES: [u8; 4] = [1, 2, 3, 4];

/// Faculty -> specialty -> course -> group chain of the approval form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApprovalCascade {
    faculty: Option<i64>,
    pub specialty: DependentSelect<Specialty>,
    course: Option<u8>,
    pub group: DependentSelect<StudentGroup>,
    group_choice: Option<GroupChoice>,
}

impl ApprovalCascade {
    /// Returns the generation of the specialty load to start, if any.
    pub fn select_faculty(&mut self, faculty: Option<i64>) -> Option<Generation> {
        self.faculty = faculty;
        self.specialty.invalidate();
        self.reset_course();
        faculty.map(|_| self.specialty.begin_load())
    }

    pub fn finish_specialties(&mut self, generation: Generation, result: DashboardResult<Vec<Specialty>>) -> bool {
        self.specialty.finish(generation, result)
    }

    pub fn select_specialty(&mut self, specialty: Option<i64>) {
        self.specialty.select(specialty);
        self.reset_course();
    }

    fn reset_course(&mut self) {
        self.course = None;
        self.group.invalidate();
        self.group_choice = None;
    }

    pub fn course_enabled(&self) -> bool {
        self.specialty.selected().is_some()
    }

    /// Returns the generation of the group load to start, if any.
    pub fn select_course(&mut self, course: Option<u8>) -> Option<Generation> {
        self.group.invalidate();
        self.group_choice = None;
        self.course = course.filter(|_| self.course_enabled());
        self.group_query().map(|_| self.group.begin_load())
    }

    pub fn finish_groups(&mut self, generation: Generation, result: DashboardResult<Vec<StudentGroup>>) -> bool {
        self.group.finish(generation, result)
    }

    /// `(facultyId, specialtyId, course)` for `/groups/available` and `/groups/auto-create`.
    pub fn group_query(&self) -> Option<(i64, i64, u8)> {
        Some((self.faculty?, self.specialty.selected()?, self.course?))
    }

    pub fn faculty(&self) -> Option<i64> {
        self.faculty
    }

    pub fn course(&self) -> Option<u8> {
        self.course
    }

    pub fn group_options(&self, capacity: u32) -> Vec<GroupOption> {
        match self.course {
            Some(course) if self.group.is_enabled() => group_options(self.group.options(), course, capacity),
            _ => Vec::new(),
        }
    }

    /// Picks a group; disabled (full) options are refused.
    pub fn select_group(&mut self, choice: Option<GroupChoice>, capacity: u32) -> bool {
        let allowed = match choice {
            None => true,
            Some(c) => self
                .group_options(capacity)
                .iter()
                .any(|o| o.choice == c && !o.disabled),
        };
        if allowed {
            self.group_choice = choice;
            self.group.select(match choice {
                Some(GroupChoice::Existing(id)) => Some(id),
                _ => None,
            });
        }
        allowed
    }

    pub fn group_choice(&self) -> Option<GroupChoice> {
        self.group_choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::DashboardError;

    fn specialty(id: i64, name: &str) -> Specialty {
        Specialty {
            id,
            name: name.to_string(),
        }
    }

    fn group(id: i64, count: u32) -> StudentGroup {
        StudentGroup {
            id,
            name: format!("Г-{}", id),
            student_count: count,
        }
    }

    #[test]
    fn test_stale_faculty_load_never_wins() {
        let mut cascade = ApprovalCascade::default();
        let a = cascade.select_faculty(Some(1)).unwrap();
        let b = cascade.select_faculty(Some(2)).unwrap();

        assert!(cascade.finish_specialties(b, Ok(vec![specialty(20, "ПОИТ")])));
        assert!(!cascade.finish_specialties(a, Ok(vec![specialty(10, "ИИ")])));
        assert_eq!(cascade.specialty.options(), &[specialty(20, "ПОИТ")]);
    }

    #[test]
    fn test_upstream_change_clears_downstream() {
        let mut cascade = ApprovalCascade::default();
        let g = cascade.select_faculty(Some(1)).unwrap();
        cascade.finish_specialties(g, Ok(vec![specialty(10, "ИИ")]));
        cascade.select_specialty(Some(10));
        let g = cascade.select_course(Some(1)).unwrap();
        cascade.finish_groups(g, Ok(vec![group(5, 3)]));
        assert!(cascade.select_group(Some(GroupChoice::Existing(5)), 15));

        cascade.select_faculty(Some(2));
        assert_eq!(cascade.specialty.selected(), None);
        assert_eq!(cascade.course(), None);
        assert!(!cascade.group.is_enabled());
        assert_eq!(cascade.group_choice(), None);
        assert!(!cascade.course_enabled());
    }

    #[test]
    fn test_course_requires_specialty() {
        let mut cascade = ApprovalCascade::default();
        cascade.select_faculty(Some(1));
        assert!(cascade.select_course(Some(2)).is_none());
        assert_eq!(cascade.course(), None);
    }

    #[test]
    fn test_capacity_boundary() {
        let options = group_options(&[group(1, 15), group(2, 14)], 1, 15);
        assert!(options[0].disabled);
        assert!(options[0].label.ends_with("[ЗАПОЛНЕНА]"));
        assert!(!options[1].disabled);
        assert_eq!(options.last().map(|o| o.choice), Some(GroupChoice::CreateNew));
    }

    #[test]
    fn test_create_new_only_for_first_course() {
        let options = group_options(&[group(1, 40)], 2, 15);
        assert_eq!(options.len(), 1);
        assert!(!options[0].disabled);
        assert!(options.iter().all(|o| o.choice != GroupChoice::CreateNew));
    }

    #[test]
    fn test_full_group_cannot_be_selected() {
        let mut cascade = ApprovalCascade::default();
        let g = cascade.select_faculty(Some(1)).unwrap();
        cascade.finish_specialties(g, Ok(vec![specialty(10, "ИИ")]));
        cascade.select_specialty(Some(10));
        let g = cascade.select_course(Some(1)).unwrap();
        cascade.finish_groups(g, Ok(vec![group(5, 15)]));

        assert!(!cascade.select_group(Some(GroupChoice::Existing(5)), 15));
        assert!(cascade.select_group(Some(GroupChoice::CreateNew), 15));
        assert_eq!(cascade.group_query(), Some((1, 10, 1)));
    }

    #[test]
    fn test_failed_load_shows_error_only_there() {
        let mut cascade = ApprovalCascade::default();
        let g = cascade.select_faculty(Some(1)).unwrap();
        cascade.finish_specialties(g, Err(DashboardError::Network("offline".into())));
        assert!(matches!(cascade.specialty.state(), OptionsState::Failed(_)));
        assert_eq!(cascade.faculty(), Some(1));
    }
}
