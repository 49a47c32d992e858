use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::settings::UserSettings;
use crate::application::render::DEFAULT_DATE_FORMAT;
use crate::application::service::recommendation::DEFAULT_LIMIT;
use crate::domain::naming::NameResolver;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub display: DisplayConfig,
    pub recommendations: RecommendationConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layer user settings over the embedded defaults.
    pub fn apply_settings(&mut self, settings: &UserSettings) {
        if let Some(url) = non_blank(&settings.backend_url) {
            self.backend.base_url = url.to_string();
        }
        if let Some(format) = non_blank(&settings.date_format) {
            self.display.date_format = format.to_string();
        }
    }

    pub fn name_resolver(&self) -> NameResolver {
        NameResolver::with_overrides(self.catalog.subjects.clone(), self.catalog.goals.clone())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_sec: u64,

    pub login_path: String,

    /// Treat an HTML page where JSON was expected as a login redirect.
    /// Off for backends that always answer API routes with JSON.
    pub sniff_html_redirects: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_sec: 30,
            login_path: "/login".to_string(),
            sniff_html_redirects: true,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    /// Absolute login page URL.
    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime pattern for card dates
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Extra code to display-name entries, merged over the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub subjects: HashMap<String, String>,
    pub goals: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write a daily rolling log file under the config directory
    pub file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::loader::parse_yaml;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = parse_yaml(
            r#"
backend:
  base_url: "https://groups.example.edu/"
catalog:
  subjects:
    cs201: "Data Structures"
"#,
        )
        .unwrap();

        assert_eq!(config.backend.timeout_sec, 30);
        assert!(config.backend.sniff_html_redirects);
        assert_eq!(config.recommendations.limit, 2);
        assert_eq!(config.display.date_format, "%m/%d/%Y");
        assert_eq!(
            config.backend.url("/find-group"),
            "https://groups.example.edu/find-group"
        );
        assert_eq!(
            config.backend.login_url(),
            "https://groups.example.edu/login"
        );
        assert_eq!(config.name_resolver().subject("cs201"), "Data Structures");
        assert_eq!(config.name_resolver().subject("math101"), "Math 101");
    }

    #[test]
    fn test_settings_override_non_blank_only() {
        let mut config = AppConfig::default();
        config.apply_settings(&UserSettings {
            backend_url: Some("http://10.0.0.2:5000".into()),
            date_format: Some("  ".into()),
            session_cookie: None,
        });

        assert_eq!(config.backend.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.display.date_format, DEFAULT_DATE_FORMAT);
    }
}
