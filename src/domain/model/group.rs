use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// Default capacity used when a new group leaves max members blank.
pub const DEFAULT_MAX_MEMBERS: u32 = 5;

/// Opaque group identifier. The backend sends integers; anything else is
/// kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for GroupId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

/// How the viewing user relates to a group on the "my groups" page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Membership {
    Created,
    Joined,
}

impl From<String> for Membership {
    fn from(value: String) -> Self {
        if value == "created" {
            Self::Created
        } else {
            Self::Joined
        }
    }
}

/// Study group as served by the backend. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub subject: String,
    #[serde(default, deserialize_with = "nullable")]
    pub goal: String,
    #[serde(default, deserialize_with = "nullable")]
    pub date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub time: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub current_members: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub max_members: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub creator: String,
    #[serde(rename = "type", default)]
    pub membership: Option<Membership>,
}

impl Group {
    /// Full groups accept no more members. Over-capacity counts as full.
    pub fn is_full(&self) -> bool {
        self.current_members >= self.max_members
    }

    pub fn member_ratio(&self) -> String {
        format!("{}/{}", self.current_members, self.max_members)
    }

    pub fn is_created_by_viewer(&self) -> bool {
        self.membership == Some(Membership::Created)
    }

    /// Calendar date of the meeting, if the backend sent a parseable one.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Creation timestamp used for ordering. Accepts the SQL
    /// `YYYY-MM-DD HH:MM:SS` form, ISO-8601, or a bare date.
    pub fn created_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.as_deref()?.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

/// Parse the leading `YYYY-MM-DD` of a date string.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Form input for creating a group, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewGroup {
    pub subject: String,
    pub goal: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub max_members: Option<u32>,
}

/// Body of `POST /create-group`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGroupPayload {
    pub subject: String,
    pub goal: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(rename = "maxMembers")]
    pub max_members: u32,
    pub created_by: UserId,
}

impl NewGroup {
    /// Checks required fields locally so no request is sent for a
    /// half-filled form.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("subject", &self.subject),
            ("goal", &self.goal),
            ("date", &self.date),
            ("time", &self.time),
            ("location", &self.location),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "Please fill in all required fields (missing: {})",
                missing.join(", ")
            )));
        }

        if NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_err() {
            return Err(DomainError::Validation(format!(
                "Invalid date '{}', expected YYYY-MM-DD",
                self.date
            )));
        }

        if self.max_members == Some(0) {
            return Err(DomainError::Validation(
                "Max members must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn into_payload(self, created_by: UserId) -> CreateGroupPayload {
        CreateGroupPayload {
            subject: self.subject.trim().to_string(),
            goal: self.goal.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
            max_members: self.max_members.unwrap_or(DEFAULT_MAX_MEMBERS),
            created_by,
        }
    }
}

/// User id as the backend sends it; echoed back unchanged in `created_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Logged-in user from `GET /api/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(default, deserialize_with = "nullable")]
    pub student_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// Payload of `GET /group/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDetails {
    pub group: Group,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectOption {
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalOption {
    pub goal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_group() {
        let json = r#"{
            "id": 42, "name": "Calc", "subject": "math101", "goal": "midterm",
            "date": "2024-05-02", "time": "18:00", "location": "Library",
            "current_members": 2, "max_members": 5, "creator": "s123",
            "created_at": "2024-04-30 10:15:00", "type": "created"
        }"#;
        let group: Group = serde_json::from_str(json).unwrap();

        assert_eq!(group.id.as_str(), "42");
        assert_eq!(group.membership, Some(Membership::Created));
        assert!(!group.is_full());
        assert_eq!(group.member_ratio(), "2/5");
        assert_eq!(
            group.calendar_date(),
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        assert!(group.created_timestamp().is_some());
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let json = r#"{"id": "g-1", "subject": "bio101", "goal": null, "time": null}"#;
        let group: Group = serde_json::from_str(json).unwrap();

        assert_eq!(group.id.as_str(), "g-1");
        assert_eq!(group.goal, "");
        assert_eq!(group.time, "");
        assert!(group.membership.is_none());
        assert!(group.calendar_date().is_none());
        assert!(group.created_timestamp().is_none());
    }

    #[test]
    fn test_unknown_membership_is_joined() {
        let json = r#"{"id": 1, "type": "member"}"#;
        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.membership, Some(Membership::Joined));
        assert!(!group.is_created_by_viewer());
    }

    #[test]
    fn test_full_and_over_capacity() {
        let json = r#"{"id": 1, "current_members": 6, "max_members": 5}"#;
        let group: Group = serde_json::from_str(json).unwrap();
        assert!(group.is_full());
    }

    #[test]
    fn test_new_group_validation() {
        let mut form = NewGroup {
            subject: "math101".into(),
            goal: "midterm".into(),
            date: "2024-05-02".into(),
            time: "18:00".into(),
            location: " ".into(),
            max_members: None,
        };
        let err = form.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("location")));

        form.location = "Library".into();
        assert!(form.validate().is_ok());

        form.max_members = Some(0);
        assert!(form.validate().is_err());

        form.max_members = None;
        form.date = "05/02/2024".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_payload_uses_backend_field_names() {
        let form = NewGroup {
            subject: "math101".into(),
            goal: "midterm".into(),
            date: "2024-05-02".into(),
            time: "18:00".into(),
            location: "Library".into(),
            max_members: None,
        };
        let payload = form.into_payload(UserId::Number(7));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["maxMembers"], 5);
        assert_eq!(value["created_by"], 7);
        assert_eq!(value["location"], "Library");
    }
}
