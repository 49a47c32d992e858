mod app_config;
pub mod loader;
pub mod paths;
mod settings;

pub use app_config::*;
pub use settings::UserSettings;

use std::sync::OnceLock;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
static USER_SETTINGS: OnceLock<UserSettings> = OnceLock::new();

/// Build the application configuration: embedded defaults, then the user's
/// settings.yaml. Later calls return the first result.
pub fn init() -> &'static AppConfig {
    APP_CONFIG.get_or_init(|| {
        let mut config: AppConfig = loader::load_embedded_config("app");
        config.apply_settings(settings());
        tracing::info!("Configuration initialized");
        config
    })
}

/// Get user settings, read from disk on first use
pub fn settings() -> &'static UserSettings {
    USER_SETTINGS.get_or_init(loader::load_user_settings)
}
