use serde::{Deserialize, Serialize};

/// How loudly a notice should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Events the application publishes for the UI side to act on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// The backend wants a session; the UI should send the user to login
    AuthRequired { login_url: String },

    /// Blocking alert for action results (join/create/delete, validation)
    Notice { level: NoticeLevel, message: String },

    /// A fresh group list was accepted into the cache
    GroupsLoaded { count: usize, generation: u64 },

    GroupJoined { group_id: String },

    GroupCreated { group_id: Option<String> },

    GroupDeleted { group_id: String },
}

impl DomainEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Get the event type name for UI routing
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::AuthRequired { .. } => "auth_required",
            Self::Notice { .. } => "notice",
            Self::GroupsLoaded { .. } => "groups_loaded",
            Self::GroupJoined { .. } => "group_joined",
            Self::GroupCreated { .. } => "group_created",
            Self::GroupDeleted { .. } => "group_deleted",
        }
    }
}
