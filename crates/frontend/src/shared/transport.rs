//! Единая точка HTTP-запросов к API.
//!
//! Подставляет bearer-токен, разбирает тело ошибки `{message}` и на 401/403
//! завершает сессию.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::api_utils::api_url;
use super::error::{DashboardError, DashboardResult};
use crate::system::auth::{session, storage};

/// Endpoints reachable without a token.
const PUBLIC_PATHS: [&str; 2] = ["/auth/login", "/users/register"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    fn builder(self, url: &str) -> RequestBuilder {
        match self {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Patch => Request::patch(url),
            Method::Delete => Request::delete(url),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub fn requires_token(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    !PUBLIC_PATHS.iter().any(|p| path.ends_with(p))
}

/// `message` из тела ошибки, если сервер его прислал
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .message
        .filter(|m| !m.trim().is_empty())
}

async fn send<B: Serialize>(
    method: Method,
    path: &str,
    body: Option<&B>,
) -> DashboardResult<Response> {
    let mut builder = method
        .builder(&api_url(path))
        .header("Accept", "application/json");

    if requires_token(path) {
        if let Some(token) = storage::get_token() {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }
    }

    let request = match body {
        Some(body) => builder
            .json(body)
            .map_err(|e| DashboardError::Network(format!("Failed to serialize request: {}", e)))?,
        None => builder
            .build()
            .map_err(|e| DashboardError::Network(format!("Failed to build request: {}", e)))?,
    };

    let response = request
        .send()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))?;

    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let message = response.text().await.ok().and_then(|t| error_message(&t));
    let error = DashboardError::from_status(status, message);

    if error.is_session_failure() {
        session::teardown();
    } else {
        log::error!("{:?} {} failed: {}", method, path, error);
    }
    Err(error)
}

async fn decode<T: DeserializeOwned>(response: Response) -> DashboardResult<T> {
    let text = response
        .text()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))?;
    // пустое тело трактуем как null, чтобы Option/Default-ответы не падали
    let text = if text.trim().is_empty() { "null" } else { &text };
    serde_json::from_str(text).map_err(|e| DashboardError::Decode(e.to_string()))
}

/// JSON-запрос с телом и JSON-ответом
pub async fn request_json<B: Serialize, T: DeserializeOwned>(
    method: Method,
    path: &str,
    body: Option<&B>,
) -> DashboardResult<T> {
    let response = send(method, path, body).await?;
    decode(response).await
}

/// Запрос без полезного ответа (DELETE, PATCH approve и т.п.)
pub async fn request_empty<B: Serialize>(
    method: Method,
    path: &str,
    body: Option<&B>,
) -> DashboardResult<()> {
    send(method, path, body).await.map(|_| ())
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> DashboardResult<T> {
    request_json::<(), T>(Method::Get, path, None).await
}

/// Бинарный ответ (PDF-отчёты)
pub async fn get_bytes(path: &str) -> DashboardResult<Vec<u8>> {
    let response = send::<()>(Method::Get, path, None).await?;
    response
        .binary()
        .await
        .map_err(|e| DashboardError::Network(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths_skip_token() {
        assert!(!requires_token("/auth/login"));
        assert!(!requires_token("/users/register?invite=1"));
        assert!(requires_token("/users/me"));
        assert!(requires_token("/analytics/query"));
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message(r#"{"message":"Группа заполнена"}"#),
            Some("Группа заполнена".to_string())
        );
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
