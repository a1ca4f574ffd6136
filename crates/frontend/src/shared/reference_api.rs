//! Справочники: факультеты, специальности, предметы, группы

use contracts::domain::academic::{Faculty, Specialty, StudentGroup, Subject};
use serde::Serialize;

use super::api_utils::with_query;
use super::error::{DashboardError, DashboardResult};
use super::transport::{get_json, request_json, Method};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupPlacement {
    faculty_id: i64,
    specialty_id: i64,
    course: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormationYearQuery {
    formation_year: i32,
}

fn query_path<Q: Serialize>(path: &str, query: &Q) -> DashboardResult<String> {
    with_query(path, query).map_err(DashboardError::Network)
}

pub async fn get_faculties() -> DashboardResult<Vec<Faculty>> {
    get_json("/faculties").await
}

pub async fn get_specialties(faculty_id: i64) -> DashboardResult<Vec<Specialty>> {
    get_json(&format!("/specialties/faculty/{}", faculty_id)).await
}

pub async fn get_subjects() -> DashboardResult<Vec<Subject>> {
    get_json("/subjects").await
}

/// Группы для зачисления студента
pub async fn get_available_groups(faculty_id: i64, specialty_id: i64, course: u8) -> DashboardResult<Vec<StudentGroup>> {
    let path = query_path(
        "/groups/available",
        &GroupPlacement {
            faculty_id,
            specialty_id,
            course,
        },
    )?;
    get_json(&path).await
}

/// Создаёт группу со следующим порядковым номером
pub async fn auto_create_group(faculty_id: i64, specialty_id: i64, course: u8) -> DashboardResult<StudentGroup> {
    let path = query_path(
        "/groups/auto-create",
        &GroupPlacement {
            faculty_id,
            specialty_id,
            course,
        },
    )?;
    request_json::<(), _>(Method::Post, &path, None).await
}

/// Группы факультета одного года набора
pub async fn get_faculty_groups(faculty_id: i64, formation_year: i32) -> DashboardResult<Vec<StudentGroup>> {
    let path = query_path(
        &format!("/groups/faculty/{}", faculty_id),
        &FormationYearQuery { formation_year },
    )?;
    get_json(&path).await
}
