//! Approval form for a pending user: role select plus the role-specific
//! binding (student group, dean faculty, teacher subjects).

use std::collections::BTreeSet;

use contracts::system::auth::RoleName;
use contracts::system::users::{RoleAssignment, User};

use crate::controllers::cascade::{ApprovalCascade, GroupChoice};
use crate::shared::error::{DashboardError, DashboardResult};

pub const CONFIRM_CREATE_GROUP: &str =
    "Будет автоматически создана новая группа с следующим порядковым номером. Продолжить?";
pub const CONFIRM_NO_SUBJECTS: &str = "Вы не выбрали ни одного предмета для преподавателя. Продолжить?";

/// Student group resolved at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTarget {
    Existing(i64),
    CreateNew { faculty_id: i64, specialty_id: i64, course: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannedAssignment {
    None,
    Student(GroupTarget),
    Dean(i64),
    Teacher(Vec<i64>),
}

impl PlannedAssignment {
    /// Body of `PUT /users/{id}`; `created_group` is the id returned by
    /// auto-create when the target was a new group.
    pub fn resolve(&self, created_group: Option<i64>) -> Option<RoleAssignment> {
        match self {
            Self::None => None,
            Self::Student(GroupTarget::Existing(group_id)) => Some(RoleAssignment::Student { group_id: *group_id }),
            Self::Student(GroupTarget::CreateNew { .. }) => {
                created_group.map(|group_id| RoleAssignment::Student { group_id })
            }
            Self::Dean(faculty_id) => Some(RoleAssignment::DeanStaff { faculty_id: *faculty_id }),
            Self::Teacher(subject_ids) => Some(RoleAssignment::Teacher {
                subject_ids: subject_ids.clone(),
            }),
        }
    }

    pub fn group_to_create(&self) -> Option<(i64, i64, u8)> {
        match self {
            Self::Student(GroupTarget::CreateNew {
                faculty_id,
                specialty_id,
                course,
            }) => Some((*faculty_id, *specialty_id, *course)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalPlan {
    pub user_id: i64,
    pub role_id: u8,
    pub assignment: PlannedAssignment,
    /// Question to confirm before anything is sent.
    pub confirmation: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalForm {
    user_id: i64,
    user_name: String,
    role: Option<RoleName>,
    pub cascade: ApprovalCascade,
    dean_faculty: Option<i64>,
    subjects: BTreeSet<i64>,
    /// Group auto-created by an earlier save attempt, keyed by its
    /// (faculty, specialty, course).
    created_group: Option<((i64, i64, u8), i64)>,
    saving: bool,
}

impl ApprovalForm {
    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.full_name.clone(),
            role: None,
            cascade: ApprovalCascade::default(),
            dean_faculty: None,
            subjects: BTreeSet::new(),
            created_group: None,
            saving: false,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn role(&self) -> Option<RoleName> {
        self.role
    }

    pub fn select_role(&mut self, role: Option<RoleName>) {
        self.role = role;
    }

    pub fn dean_faculty(&self) -> Option<i64> {
        self.dean_faculty
    }

    pub fn select_dean_faculty(&mut self, faculty: Option<i64>) {
        self.dean_faculty = faculty;
    }

    pub fn toggle_subject(&mut self, subject_id: i64) {
        if !self.subjects.remove(&subject_id) {
            self.subjects.insert(subject_id);
        }
    }

    pub fn has_subject(&self, subject_id: i64) -> bool {
        self.subjects.contains(&subject_id)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Validates the form into the requests to send.
    pub fn build_plan(&self) -> DashboardResult<ApprovalPlan> {
        let role = self.role.ok_or_else(|| DashboardError::validation("Выберите роль"))?;
        let role_id = role
            .role_id()
            .ok_or_else(|| DashboardError::validation("Выберите роль"))?;

        let (assignment, confirmation) = match role {
            RoleName::Student => match self.cascade.group_choice() {
                Some(GroupChoice::Existing(id)) => (PlannedAssignment::Student(GroupTarget::Existing(id)), None),
                Some(GroupChoice::CreateNew) => {
                    let key = self
                        .cascade
                        .group_query()
                        .ok_or_else(|| DashboardError::validation("Выберите группу"))?;
                    if let Some(group_id) = self.created_for(key) {
                        return Ok(ApprovalPlan {
                            user_id: self.user_id,
                            role_id,
                            assignment: PlannedAssignment::Student(GroupTarget::Existing(group_id)),
                            confirmation: None,
                        });
                    }
                    let (faculty_id, specialty_id, course) = key;
                    (
                        PlannedAssignment::Student(GroupTarget::CreateNew {
                            faculty_id,
                            specialty_id,
                            course,
                        }),
                        Some(CONFIRM_CREATE_GROUP),
                    )
                }
                None => return Err(DashboardError::validation("Выберите группу")),
            },
            RoleName::DeanStaff => {
                let faculty = self
                    .dean_faculty
                    .ok_or_else(|| DashboardError::validation("Выберите факультет"))?;
                (PlannedAssignment::Dean(faculty), None)
            }
            RoleName::Teacher => {
                let subjects: Vec<i64> = self.subjects.iter().copied().collect();
                let confirmation = subjects.is_empty().then_some(CONFIRM_NO_SUBJECTS);
                (PlannedAssignment::Teacher(subjects), confirmation)
            }
            _ => (PlannedAssignment::None, None),
        };

        Ok(ApprovalPlan {
            user_id: self.user_id,
            role_id,
            assignment,
            confirmation,
        })
    }

    fn created_for(&self, key: (i64, i64, u8)) -> Option<i64> {
        self.created_group
            .filter(|(created_key, _)| *created_key == key)
            .map(|(_, group_id)| group_id)
    }

    /// Remembers an auto-created group so a retried save binds to it
    /// instead of creating another one.
    pub fn record_created_group(&mut self, key: (i64, i64, u8), group_id: i64) {
        self.created_group = Some((key, group_id));
    }

    /// Locks the save button. `false` when a save is already running.
    pub fn begin_save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.saving = true;
        true
    }

    pub fn finish_save(&mut self) {
        self.saving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::academic::{Specialty, StudentGroup};
    use contracts::system::users::UserStatus;

    fn user() -> User {
        User {
            id: 21,
            full_name: "Новиков Н.".to_string(),
            login: "novikov".to_string(),
            email: None,
            status: UserStatus::Pending,
            created_at: None,
        }
    }

    fn form_with_groups(course: u8, groups: Vec<StudentGroup>) -> ApprovalForm {
        let mut form = ApprovalForm::new(&user());
        form.select_role(Some(RoleName::Student));
        let g = form.cascade.select_faculty(Some(1)).unwrap();
        form.cascade.finish_specialties(
            g,
            Ok(vec![Specialty {
                id: 2,
                name: "ПОИТ".to_string(),
            }]),
        );
        form.cascade.select_specialty(Some(2));
        let g = form.cascade.select_course(Some(course)).unwrap();
        form.cascade.finish_groups(g, Ok(groups));
        form
    }

    #[test]
    fn test_role_is_required() {
        let form = ApprovalForm::new(&user());
        let err = form.build_plan().unwrap_err();
        assert_eq!(err, DashboardError::validation("Выберите роль"));
    }

    #[test]
    fn test_student_needs_group() {
        let form = form_with_groups(2, vec![]);
        assert_eq!(form.build_plan().unwrap_err(), DashboardError::validation("Выберите группу"));
    }

    #[test]
    fn test_student_existing_group() {
        let mut form = form_with_groups(
            2,
            vec![StudentGroup {
                id: 9,
                name: "ПИ-21".to_string(),
                student_count: 25,
            }],
        );
        assert!(form.cascade.select_group(Some(GroupChoice::Existing(9)), 15));
        let plan = form.build_plan().unwrap();
        assert_eq!(plan.role_id, 4);
        assert_eq!(plan.confirmation, None);
        assert_eq!(plan.assignment.resolve(None), Some(RoleAssignment::Student { group_id: 9 }));
    }

    #[test]
    fn test_create_new_group_asks_first() {
        let mut form = form_with_groups(1, vec![]);
        assert!(form.cascade.select_group(Some(GroupChoice::CreateNew), 15));
        let plan = form.build_plan().unwrap();
        assert_eq!(plan.confirmation, Some(CONFIRM_CREATE_GROUP));
        assert_eq!(plan.assignment.group_to_create(), Some((1, 2, 1)));
        assert_eq!(plan.assignment.resolve(None), None);
        assert_eq!(plan.assignment.resolve(Some(40)), Some(RoleAssignment::Student { group_id: 40 }));
    }

    #[test]
    fn test_retry_after_failure_reuses_created_group() {
        let mut form = form_with_groups(1, vec![]);
        assert!(form.cascade.select_group(Some(GroupChoice::CreateNew), 15));
        let plan = form.build_plan().unwrap();
        let key = plan.assignment.group_to_create().unwrap();

        // группа создана, подтверждение пользователя упало
        assert!(form.begin_save());
        form.record_created_group(key, 40);
        form.finish_save();

        let retry = form.build_plan().unwrap();
        assert_eq!(retry.assignment.group_to_create(), None);
        assert_eq!(retry.confirmation, None);
        assert_eq!(retry.assignment.resolve(None), Some(RoleAssignment::Student { group_id: 40 }));
    }

    #[test]
    fn test_created_group_ignored_for_other_course() {
        let mut form = form_with_groups(1, vec![]);
        form.record_created_group((1, 2, 3), 40);
        assert!(form.cascade.select_group(Some(GroupChoice::CreateNew), 15));
        let plan = form.build_plan().unwrap();
        assert_eq!(plan.assignment.group_to_create(), Some((1, 2, 1)));
    }

    #[test]
    fn test_dean_and_teacher_bindings() {
        let mut form = ApprovalForm::new(&user());
        form.select_role(Some(RoleName::DeanStaff));
        assert_eq!(form.build_plan().unwrap_err(), DashboardError::validation("Выберите факультет"));
        form.select_dean_faculty(Some(3));
        assert_eq!(form.build_plan().unwrap().assignment, PlannedAssignment::Dean(3));

        form.select_role(Some(RoleName::Teacher));
        let plan = form.build_plan().unwrap();
        assert_eq!(plan.role_id, 3);
        assert_eq!(plan.confirmation, Some(CONFIRM_NO_SUBJECTS));

        form.toggle_subject(5);
        form.toggle_subject(2);
        form.toggle_subject(5);
        let plan = form.build_plan().unwrap();
        assert_eq!(plan.confirmation, None);
        assert_eq!(plan.assignment.resolve(None), Some(RoleAssignment::Teacher { subject_ids: vec![2] }));
    }

    #[test]
    fn test_rectorate_has_no_binding() {
        let mut form = ApprovalForm::new(&user());
        form.select_role(Some(RoleName::RectorateStaff));
        let plan = form.build_plan().unwrap();
        assert_eq!(plan.role_id, 5);
        assert_eq!(plan.assignment.resolve(None), None);
    }

    #[test]
    fn test_double_save_is_refused() {
        let mut form = ApprovalForm::new(&user());
        assert!(form.begin_save());
        assert!(!form.begin_save());
        form.finish_save();
        assert!(form.begin_save());
    }
}
