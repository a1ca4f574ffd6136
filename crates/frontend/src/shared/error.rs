use thiserror::Error;

/// Failures surfaced by API functions and controllers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Request never reached the server or the body could not be built.
    #[error("Ошибка сети: {0}")]
    Network(String),

    /// Non-success HTTP status other than 401/403.
    #[error("{message}")]
    Transport { status: u16, message: String },

    /// 401/403: the session is torn down.
    #[error("Сессия истекла, войдите снова")]
    SessionExpired,

    /// Response body does not match the expected contract.
    #[error("Некорректный ответ сервера: {0}")]
    Decode(String),

    /// Bad local input; no request is sent.
    #[error("{0}")]
    Validation(String),

    /// Chart.js refused the config or the canvas. Never leaves the widget.
    #[error("Ошибка построения графика: {0}")]
    Chart(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn from_status(status: u16, body_message: Option<String>) -> Self {
        match status {
            401 | 403 => Self::SessionExpired,
            _ => Self::Transport {
                status,
                message: body_message.unwrap_or_else(|| format!("Ошибка {}", status)),
            },
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_session_failure(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_expire_session() {
        assert!(DashboardError::from_status(401, None).is_session_failure());
        assert!(DashboardError::from_status(403, Some("Forbidden".into())).is_session_failure());
        assert!(!DashboardError::from_status(500, None).is_session_failure());
    }

    #[test]
    fn test_chart_failure_is_local() {
        let err = DashboardError::Chart("canvas is detached".into());
        assert!(!err.is_session_failure());
        assert_eq!(err.to_string(), "Ошибка построения графика: canvas is detached");
        assert_ne!(err, DashboardError::Network("canvas is detached".into()));
    }

    #[test]
    fn test_transport_message_prefers_body() {
        let err = DashboardError::from_status(409, Some("Группа заполнена".into()));
        assert_eq!(err.to_string(), "Группа заполнена");
        assert_eq!(DashboardError::from_status(502, None).to_string(), "Ошибка 502");
    }
}
