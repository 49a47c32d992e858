//! Rule-based match scoring for the recommendation panel.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::calendar;
use crate::domain::model::{Group, UserFilters};

pub const SUBJECT_POINTS: u32 = 5;
pub const GOAL_POINTS: u32 = 3;
pub const DATE_POINTS: u32 = 2;
pub const OPEN_SEAT_POINTS: u32 = 1;

/// Highest score a group can reach.
pub const MAX_SCORE: u32 = SUBJECT_POINTS + GOAL_POINTS + DATE_POINTS + OPEN_SEAT_POINTS;

pub const DEFAULT_LIMIT: usize = 2;

/// A group with its ranking score. Only lives until it is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredGroup {
    #[serde(flatten)]
    pub group: Group,
    #[serde(rename = "matchScore")]
    pub match_score: u32,
}

/// Points for one group. Criteria add up independently.
pub fn match_score(filters: &UserFilters, group: &Group, today: NaiveDate) -> u32 {
    let mut score = 0;

    if filters.subject.matches(&group.subject) {
        score += SUBJECT_POINTS;
    }

    if filters.goal.matches(&group.goal) {
        score += GOAL_POINTS;
    }

    if !filters.date.is_all() {
        // ranges without a window match even groups with no usable date
        let in_range = match calendar::window_for(&filters.date, today) {
            None => true,
            Some(window) => group
                .calendar_date()
                .is_some_and(|date| window.contains(date)),
        };
        if in_range {
            score += DATE_POINTS;
        }
    }

    if !group.is_full() {
        score += OPEN_SEAT_POINTS;
    }

    score
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendationScorer {
    limit: usize,
}

impl Default for RecommendationScorer {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl RecommendationScorer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Top groups by score, evaluated against today's calendar.
    pub fn score(&self, filters: &UserFilters, groups: &[Group]) -> Vec<ScoredGroup> {
        self.score_on(filters, groups, calendar::today())
    }

    /// Top groups by score. Ties keep input order.
    pub fn score_on(
        &self,
        filters: &UserFilters,
        groups: &[Group],
        today: NaiveDate,
    ) -> Vec<ScoredGroup> {
        let mut scored: Vec<ScoredGroup> = groups
            .iter()
            .map(|group| ScoredGroup {
                match_score: match_score(filters, group, today),
                group: group.clone(),
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(self.limit);

        tracing::debug!(
            "Scored {} groups, keeping {}",
            groups.len(),
            scored.len()
        );
        scored
    }
}
