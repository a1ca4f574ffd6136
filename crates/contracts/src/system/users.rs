use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Pending,
    Blocked,
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    /// Label for a status code as it appears in `userStatusOverview`.
    pub fn label_for(code: &str) -> Option<&'static str> {
        match code {
            "ACTIVE" => Some("Активные"),
            "PENDING" => Some("Ожидают"),
            "BLOCKED" => Some("Заблокированные"),
            _ => None,
        }
    }
}

/// Item of `GET /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    pub status: UserStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Role-specific body of `PUT /users/{id}` sent after approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleAssignment {
    #[serde(rename_all = "camelCase")]
    Student { group_id: i64 },
    #[serde(rename_all = "camelCase")]
    DeanStaff { faculty_id: i64 },
    #[serde(rename_all = "camelCase")]
    Teacher { subject_ids: Vec<i64> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_assignment_bodies() {
        assert_eq!(
            serde_json::to_value(RoleAssignment::Student { group_id: 12 }).unwrap(),
            json!({ "groupId": 12 })
        );
        assert_eq!(
            serde_json::to_value(RoleAssignment::Teacher { subject_ids: vec![1, 2] }).unwrap(),
            json!({ "subjectIds": [1, 2] })
        );
    }

    #[test]
    fn test_user_status_decoding() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "fullName": "Сидоров С.",
            "status": "PENDING"
        }))
        .unwrap();
        assert_eq!(user.status, UserStatus::Pending);
        assert_eq!(UserStatus::label_for("BLOCKED"), Some("Заблокированные"));
    }
}
