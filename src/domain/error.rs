use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend wants a logged-in session. Callers redirect to login
    /// instead of showing an error.
    #[error("Authentication required")]
    AuthRequired,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, DomainError::AuthRequired)
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Transport(format!("malformed response: {}", err))
    }
}
