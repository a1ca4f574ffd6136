use serde::{Deserialize, Serialize};

/// Maximum number of students in a first-course group.
pub const FIRST_COURSE_GROUP_CAPACITY: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

/// Student group as returned by `/groups/available`, `/groups/auto-create`
/// and the teacher's relevant-groups list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub student_count: u32,
}

/// Achievement type a teacher can grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub points: Option<f64>,
}

/// Body of `POST /achievements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAchievementDto {
    pub student_id: i64,
    pub achievement_type_id: i64,
}
