use contracts::domain::academic::{AchievementType, GrantAchievementDto, StudentGroup, Subject};
use contracts::domain::journal::{JournalStudent, PerformanceStudent};
use serde::Serialize;

use crate::controllers::journal::JournalWrite;
use crate::shared::api_utils::with_query;
use crate::shared::error::{DashboardError, DashboardResult};
use crate::shared::transport::{get_json, request_empty, Method};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubjectQuery {
    subject_id: i64,
}

fn subject_path(path: &str, subject_id: i64) -> DashboardResult<String> {
    with_query(path, &SubjectQuery { subject_id }).map_err(DashboardError::Network)
}

/// Предметы преподавателя, общие для журнала и успеваемости
pub async fn get_my_subjects() -> DashboardResult<Vec<Subject>> {
    get_json("/teacher/my-subjects").await
}

pub async fn get_relevant_groups(subject_id: i64) -> DashboardResult<Vec<StudentGroup>> {
    get_json(&subject_path("/teacher/my-relevant-groups", subject_id)?).await
}

pub async fn get_journal(group_id: i64, subject_id: i64) -> DashboardResult<Vec<JournalStudent>> {
    let path = format!("/teacher/group/{}/journal-data", group_id);
    get_json(&subject_path(&path, subject_id)?).await
}

pub async fn get_performance(group_id: i64, subject_id: i64) -> DashboardResult<Vec<PerformanceStudent>> {
    let path = format!("/teacher/group/{}/performance", group_id);
    get_json(&subject_path(&path, subject_id)?).await
}

/// Оценка или пропуск за сегодня
pub async fn save_journal_entry(write: &JournalWrite) -> DashboardResult<()> {
    match write {
        JournalWrite::Grade(dto) => request_empty(Method::Post, write.path(), Some(dto)).await,
        JournalWrite::Absence(dto) => request_empty(Method::Post, write.path(), Some(dto)).await,
    }
}

pub async fn get_achievement_types() -> DashboardResult<Vec<AchievementType>> {
    get_json("/achievement-types").await
}

pub async fn grant_achievement(dto: &GrantAchievementDto) -> DashboardResult<()> {
    request_empty(Method::Post, "/achievements", Some(dto)).await
}
