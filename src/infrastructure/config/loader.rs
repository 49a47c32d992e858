use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use std::path::Path;

use super::paths::settings_path;
use super::settings::UserSettings;

// Embed the entire configs directory at compile time
static CONFIGS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/configs");

/// Load a YAML configuration file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

/// Parse YAML from string
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> anyhow::Result<T> {
    let config: T = serde_yaml::from_str(content)?;
    Ok(config)
}

/// Load embedded configuration by name from the configs directory.
/// Missing or broken files fall back to `T::default()`.
pub fn load_embedded_config<T: DeserializeOwned + Default>(name: &str) -> T {
    let file_name = format!("{}.yaml", name);

    let Some(file) = CONFIGS_DIR.get_file(&file_name) else {
        tracing::warn!("Embedded config {} not found, using defaults", name);
        return T::default();
    };

    let Some(content) = file.contents_utf8() else {
        tracing::error!("Embedded config {} is not valid UTF-8", name);
        return T::default();
    };

    match parse_yaml::<T>(content) {
        Ok(config) => {
            tracing::debug!("Loaded embedded config: {}", name);
            config
        }
        Err(e) => {
            tracing::error!("Failed to parse embedded config {}: {}", name, e);
            T::default()
        }
    }
}

/// Load user settings from settings.yaml in user config directory
pub fn load_user_settings() -> UserSettings {
    load_user_settings_from(&settings_path())
}

/// Returns default settings if the file doesn't exist or is invalid
pub fn load_user_settings_from(path: &Path) -> UserSettings {
    if !path.exists() {
        tracing::debug!("No settings file at {:?}, using defaults", path);
        return UserSettings::default();
    }

    match load_yaml::<UserSettings>(path) {
        Ok(settings) => {
            tracing::info!("Loaded user settings from {:?}", path);
            settings
        }
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}, using defaults", path, e);
            UserSettings::default()
        }
    }
}
