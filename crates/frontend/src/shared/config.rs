use once_cell::sync::Lazy;
use serde::Deserialize;
use wasm_bindgen::JsValue;

/// Name of the optional `window` property holding a TOML override.
pub const CONFIG_GLOBAL: &str = "__RATING_DASHBOARD_CONFIG__";

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub roster: RosterConfig,
    pub groups: GroupsConfig,
    pub toast: ToastConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute API root. Empty means "same host as the page, on `port`, under `prefix`".
    pub base_url: String,
    pub port: u16,
    pub prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            port: 8080,
            prefix: "/api".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RosterConfig {
    pub batch_size: usize,
    pub scroll_threshold_px: i32,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            scroll_threshold_px: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GroupsConfig {
    pub first_course_capacity: u32,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            first_course_capacity: contracts::domain::academic::FIRST_COURSE_GROUP_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_ms: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 5000 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct JournalConfig {
    /// Hours recorded for one absence entered through the journal.
    pub absence_hours: u32,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { absence_hours: 2 }
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = ""
port = 8080
prefix = "/api"

[roster]
batch_size = 50
scroll_threshold_px = 50

[groups]
first_course_capacity = 15

[toast]
duration_ms = 5000

[journal]
absence_hours = 2
"#;

static CONFIG: Lazy<ClientConfig> = Lazy::new(load_config);

/// Configuration for the running page, loaded once.
pub fn config() -> &'static ClientConfig {
    &CONFIG
}

pub fn parse_config(raw: &str) -> Result<ClientConfig, toml::de::Error> {
    toml::from_str(raw)
}

/// Load configuration
///
/// Search order:
/// 1. TOML string in `window.__RATING_DASHBOARD_CONFIG__` (set by the host page)
/// 2. Falls back to embedded default config
pub fn load_config() -> ClientConfig {
    if let Some(raw) = read_window_override() {
        match parse_config(&raw) {
            Ok(config) => {
                log::info!("Loading config from window.{}", CONFIG_GLOBAL);
                return config;
            }
            Err(e) => log::warn!("Invalid window.{}: {}", CONFIG_GLOBAL, e),
        }
    }

    log::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG).unwrap_or_default()
}

fn read_window_override() -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .ok()?
        .as_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG);
        assert!(config.is_ok());
        assert_eq!(config.unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [api]
            base_url = "https://rating.example.org/api"

            [roster]
            batch_size = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://rating.example.org/api");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.roster.batch_size, 20);
        assert_eq!(config.roster.scroll_threshold_px, 50);
        assert_eq!(config.groups.first_course_capacity, 15);
    }
}
