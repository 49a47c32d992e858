use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel the filter controls use for "no constraint".
pub const ALL: &str = "all";

/// A single filter control: either unconstrained or a concrete code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(code) => Some(code),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        self.code().is_some_and(|code| code == value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code().unwrap_or(ALL))
    }
}

/// Date window selectable in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateRange {
    #[default]
    All,
    Today,
    ThisWeek,
    NextWeek,
    /// Unrecognized range code; passed through, never constrains locally.
    Other(String),
}

impl DateRange {
    pub fn as_code(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Today => "today",
            Self::ThisWeek => "thisWeek",
            Self::NextWeek => "nextWeek",
            Self::Other(code) => code,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&str> for DateRange {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | ALL => Self::All,
            "today" => Self::Today,
            "thisWeek" => Self::ThisWeek,
            "nextWeek" => Self::NextWeek,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for DateRange {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<DateRange> for String {
    fn from(value: DateRange) -> Self {
        value.as_code().to_string()
    }
}

impl FromStr for DateRange {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl FromStr for FilterValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Filter state read from the UI controls each time filtering runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserFilters {
    #[serde(default)]
    pub subject: FilterValue,
    #[serde(default)]
    pub goal: FilterValue,
    #[serde(default)]
    pub date: DateRange,
}

impl UserFilters {
    pub fn new(subject: &str, goal: &str, date: &str) -> Self {
        Self {
            subject: FilterValue::from(subject),
            goal: FilterValue::from(goal),
            date: DateRange::from(date),
        }
    }

    /// Query parameters for the group listing. Unconstrained fields are
    /// left out rather than sent as `all`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(subject) = self.subject.code() {
            pairs.push(("subject", subject.to_string()));
        }
        if let Some(goal) = self.goal.code() {
            pairs.push(("goal", goal.to_string()));
        }
        if !self.date.is_all() {
            pairs.push(("date", self.date.as_code().to_string()));
        }
        pairs
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_filters_produce_empty_query() {
        let filters = UserFilters::new("all", "all", "all");
        assert!(filters.query_pairs().is_empty());
        assert!(filters.is_unconstrained());
        assert_eq!(filters, UserFilters::default());
    }

    #[test]
    fn test_blank_controls_count_as_all() {
        let filters = UserFilters::new("", "  ", "");
        assert_eq!(filters, UserFilters::default());
    }

    #[test]
    fn test_only_constrained_fields_are_sent() {
        let filters = UserFilters::new("math101", "all", "nextWeek");
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("subject", "math101".to_string()),
                ("date", "nextWeek".to_string())
            ]
        );
    }

    #[test]
    fn test_unknown_date_range_passes_through() {
        let range = DateRange::from("thisMonth");
        assert_eq!(range, DateRange::Other("thisMonth".to_string()));
        assert_eq!(range.as_code(), "thisMonth");
    }

    #[test]
    fn test_filter_value_matches() {
        assert!(FilterValue::from("math101").matches("math101"));
        assert!(!FilterValue::from("math101").matches("bio101"));
        assert!(!FilterValue::All.matches("all"));
    }
}
