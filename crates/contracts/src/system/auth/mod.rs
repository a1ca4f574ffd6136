use serde::{Deserialize, Serialize};

/// Role a user is approved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Administrator,
    DeanStaff,
    Teacher,
    Student,
    RectorateStaff,
    #[serde(other)]
    Unknown,
}

impl RoleName {
    /// Roles a pending user can be approved into.
    pub const ASSIGNABLE: [RoleName; 5] = [
        Self::Student,
        Self::Teacher,
        Self::DeanStaff,
        Self::RectorateStaff,
        Self::Administrator,
    ];

    /// Numeric id expected by `PATCH /users/{id}/approve?roleId=`.
    pub fn role_id(&self) -> Option<u8> {
        match self {
            Self::Administrator => Some(1),
            Self::DeanStaff => Some(2),
            Self::Teacher => Some(3),
            Self::Student => Some(4),
            Self::RectorateStaff => Some(5),
            Self::Unknown => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::DeanStaff => "DEAN_STAFF",
            Self::Teacher => "TEACHER",
            Self::Student => "STUDENT",
            Self::RectorateStaff => "RECTORATE_STAFF",
            Self::Unknown => "",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ASSIGNABLE.into_iter().find(|r| r.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Administrator => "Администратор",
            Self::DeanStaff => "Сотрудник деканата",
            Self::Teacher => "Преподаватель",
            Self::Student => "Студент",
            Self::RectorateStaff => "Сотрудник ректората",
            Self::Unknown => "Не назначена",
        }
    }

    /// Plural label used by the role statistics chart.
    pub fn plural_label(code: &str) -> Option<&'static str> {
        match Self::from_code(code)? {
            Self::Administrator => Some("Администраторы"),
            Self::DeanStaff => Some("Сотрудники деканата"),
            Self::Teacher => Some("Преподаватели"),
            Self::Student => Some("Студенты"),
            Self::RectorateStaff => Some("Сотрудники ректората"),
            Self::Unknown => None,
        }
    }
}

/// Response of `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    #[serde(default)]
    pub login: String,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role_name: Option<RoleName>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub faculty_id: Option<i64>,
    #[serde(default)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub specialty_name: Option<String>,
}
