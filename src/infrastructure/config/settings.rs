use serde::{Deserialize, Serialize};

/// User settings stored in settings.yaml in the user config directory.
/// All fields are optional; missing values fall back to the embedded config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Backend root, e.g. `http://localhost:5000`
    pub backend_url: Option<String>,

    /// Value of the backend session cookie. A bare value is sent as
    /// `session=<value>`.
    pub session_cookie: Option<String>,

    /// strftime pattern for card dates
    pub date_format: Option<String>,
}
