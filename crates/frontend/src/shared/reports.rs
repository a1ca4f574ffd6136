//! PDF-отчёты аналитики: пути, имена файлов и тексты уведомлений

use chrono::NaiveDate;
use serde::Serialize;

use super::api_utils::with_query;
use super::date_utils::{formation_year, iso_date};
use super::download::download_report;
use super::error::{DashboardError, DashboardResult};
use super::toast::{ToastKind, ToastService};

pub const REPORT_SAVED: &str = "Отчет успешно скачан";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub path: String,
    pub filename: String,
    /// Текст уведомления при ошибке загрузки
    pub failure: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeanReportQuery {
    faculty_id: i64,
    formation_year: i32,
}

/// Глобальный отчёт из шапки
pub fn global_report(date: NaiveDate) -> ReportRequest {
    ReportRequest {
        path: "/analytics/global-report".to_string(),
        filename: format!("Global_Report_{}.pdf", iso_date(date)),
        failure: "Не удалось скачать глобальный отчет",
    }
}

pub fn admin_report(date: NaiveDate) -> ReportRequest {
    ReportRequest {
        path: "/analytics/admin-report".to_string(),
        filename: format!("admin_report_{}.pdf", iso_date(date)),
        failure: "Не удалось скачать отчет администратора",
    }
}

/// Отчёт деканата по факультету и курсу; год набора считается от даты
pub fn dean_report(faculty_id: Option<i64>, course: u8, date: NaiveDate) -> DashboardResult<ReportRequest> {
    let faculty_id =
        faculty_id.ok_or_else(|| DashboardError::validation("Пожалуйста, выберите факультет из списка"))?;
    let query = DeanReportQuery {
        faculty_id,
        formation_year: formation_year(course, date),
    };
    let path = with_query("/analytics/dean-report", &query).map_err(DashboardError::Network)?;
    Ok(ReportRequest {
        path,
        filename: format!("dean_report_f{}_c{}.pdf", faculty_id, course),
        failure: "Не удалось скачать отчет. Возможно, нет данных.",
    })
}

/// Скачивает отчёт и сообщает результат уведомлением
pub async fn fetch_report(request: &ReportRequest, toasts: ToastService) -> bool {
    match download_report(&request.path, &request.filename).await {
        Ok(()) => {
            toasts.success(REPORT_SAVED);
            true
        }
        Err(e) if e.is_session_failure() => false,
        Err(e) => {
            log::error!("report {} failed: {}", request.path, e);
            toasts.show(ToastKind::Error, request.failure);
            false
        }
    }
}
