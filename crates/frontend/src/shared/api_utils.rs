//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

use super::config::config;

/// Get the base URL for API requests
///
/// Uses `api.base_url` from the configuration when set, otherwise builds it
/// from the current window location, the configured backend port and prefix.
///
/// # Returns
/// - API base URL like "http://localhost:8080/api"
/// - Just the prefix if window is not available
pub fn api_base() -> String {
    let api = &config().api;
    if !api.base_url.is_empty() {
        return api.base_url.trim_end_matches('/').to_string();
    }

    let window = match web_sys::window() {
        Some(w) => w,
        None => return api.prefix.clone(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}{}", protocol, hostname, api.port, api.prefix)
}

/// Build a full API URL from an endpoint path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/analytics/query");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Append a serialized query string to an endpoint path.
pub fn with_query<Q: serde::Serialize>(path: &str, query: &Q) -> Result<String, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to encode query: {}", e))?;
    if qs.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, qs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct GroupsQuery {
        faculty_id: i64,
        specialty_id: i64,
        course: u8,
    }

    #[test]
    fn test_with_query_camel_case() {
        let path = with_query(
            "/groups/available",
            &GroupsQuery {
                faculty_id: 1,
                specialty_id: 4,
                course: 1,
            },
        )
        .unwrap();
        assert_eq!(path, "/groups/available?facultyId=1&specialtyId=4&course=1");
    }
}
