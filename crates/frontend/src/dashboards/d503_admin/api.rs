use contracts::system::users::{RoleAssignment, User};
use serde::Serialize;

use crate::shared::api_utils::with_query;
use crate::shared::error::{DashboardError, DashboardResult};
use crate::shared::transport::{get_json, request_empty, Method};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApproveQuery {
    role_id: u8,
}

pub async fn get_users() -> DashboardResult<Vec<User>> {
    get_json("/users").await
}

pub async fn approve_user(user_id: i64, role_id: u8) -> DashboardResult<()> {
    let path = with_query(&format!("/users/{}/approve", user_id), &ApproveQuery { role_id })
        .map_err(DashboardError::Network)?;
    request_empty::<()>(Method::Patch, &path, None).await
}

/// Привязка к группе, факультету или предметам после подтверждения
pub async fn assign_role(user_id: i64, assignment: &RoleAssignment) -> DashboardResult<()> {
    request_empty(Method::Put, &format!("/users/{}", user_id), Some(assignment)).await
}

pub async fn delete_user(user_id: i64) -> DashboardResult<()> {
    request_empty::<()>(Method::Delete, &format!("/users/{}", user_id), None).await
}
