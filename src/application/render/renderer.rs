use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;

use super::view::{
    ActionKind, CardAction, CardField, CardStyle, GroupCard, PanelContent, PanelView,
    RenderContext, RenderTarget,
};
use crate::application::service::ScoredGroup;
use crate::domain::model::{Group, Membership};
use crate::domain::naming::NameResolver;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

pub const JOIN_LABEL: &str = "Join This Group";
pub const JOIN_RECOMMENDED_LABEL: &str = "Join Group";
pub const FULL_LABEL: &str = "Group Full";
pub const DELETE_LABEL: &str = "Delete";
pub const DETAILS_LABEL: &str = "Details";

/// Turns group records into card view-models and hands them to a target.
#[derive(Debug, Clone)]
pub struct ListRenderer {
    names: NameResolver,
    date_format: String,
}

impl Default for ListRenderer {
    fn default() -> Self {
        Self::new(NameResolver::default(), DEFAULT_DATE_FORMAT)
    }
}

impl ListRenderer {
    pub fn new(names: NameResolver, date_format: &str) -> Self {
        let date_format = if is_valid_format(date_format) {
            date_format.to_string()
        } else {
            tracing::warn!(
                "Invalid date format '{}', using {}",
                date_format,
                DEFAULT_DATE_FORMAT
            );
            DEFAULT_DATE_FORMAT.to_string()
        };
        Self { names, date_format }
    }

    pub fn names(&self) -> &NameResolver {
        &self.names
    }

    pub fn render<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        groups: &[Group],
        context: RenderContext,
    ) {
        target.render(&self.build(groups, context));
    }

    pub fn render_scored<T: RenderTarget + ?Sized>(&self, target: &mut T, scored: &[ScoredGroup]) {
        target.render(&self.build_scored(scored));
    }

    pub fn render_message<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        context: RenderContext,
        message: &str,
    ) {
        target.render(&PanelView {
            context,
            content: PanelContent::Message(message.to_string()),
        });
    }

    pub fn build(&self, groups: &[Group], context: RenderContext) -> PanelView {
        let content = if groups.is_empty() {
            PanelContent::Empty(context.empty_message().to_string())
        } else {
            PanelContent::Cards(groups.iter().map(|g| self.card(g, context)).collect())
        };
        PanelView { context, content }
    }

    pub fn build_scored(&self, scored: &[ScoredGroup]) -> PanelView {
        let context = RenderContext::Recommendation;
        let content = if scored.is_empty() {
            PanelContent::Empty(context.empty_message().to_string())
        } else {
            PanelContent::Cards(
                scored
                    .iter()
                    .map(|s| {
                        let mut card = self.card(&s.group, context);
                        card.badge = Some(format!("Match score {}", s.match_score));
                        card
                    })
                    .collect(),
            )
        };
        PanelView { context, content }
    }

    pub fn card(&self, group: &Group, context: RenderContext) -> GroupCard {
        match context {
            RenderContext::Browse => self.browse_card(group),
            RenderContext::Recommendation => self.recommendation_card(group),
            RenderContext::MyGroups | RenderContext::MyGroupsSearch => self.my_group_card(group),
        }
    }

    fn browse_card(&self, group: &Group) -> GroupCard {
        GroupCard {
            group_id: group.id.clone(),
            title: format!(
                "{} | {}",
                self.names.subject(&group.subject),
                self.names.goal(&group.goal)
            ),
            badge: None,
            style: CardStyle::Standard,
            fields: vec![
                field("Group ID", group.id.to_string()),
                field("Date", self.format_date(group)),
                field("Time", group.time.clone()),
                field("Location", group.location.clone()),
                field("Members", group.member_ratio()),
            ],
            actions: vec![join_action(group, JOIN_LABEL)],
        }
    }

    fn recommendation_card(&self, group: &Group) -> GroupCard {
        GroupCard {
            group_id: group.id.clone(),
            title: format!("{} (Recommended)", self.names.subject(&group.subject)),
            badge: None,
            style: CardStyle::Standard,
            fields: vec![
                field("Group ID", group.id.to_string()),
                field("Goal", self.names.goal(&group.goal)),
                field("Date", self.format_date(group)),
                field("Time", group.time.clone()),
                field("Location", group.location.clone()),
                field("Members", group.member_ratio()),
            ],
            actions: vec![join_action(group, JOIN_RECOMMENDED_LABEL)],
        }
    }

    fn my_group_card(&self, group: &Group) -> GroupCard {
        let created = group.membership == Some(Membership::Created);
        let (style, badge) = if created {
            (CardStyle::Created, "Created Group")
        } else {
            (CardStyle::Joined, "Joined Group")
        };

        let mut actions = vec![CardAction {
            kind: ActionKind::Details,
            label: DETAILS_LABEL.to_string(),
            enabled: true,
            group_id: group.id.clone(),
            href: Some(format!("/group/{}", group.id)),
        }];
        if created {
            actions.push(CardAction {
                kind: ActionKind::Delete,
                label: DELETE_LABEL.to_string(),
                enabled: true,
                group_id: group.id.clone(),
                href: None,
            });
        }

        GroupCard {
            group_id: group.id.clone(),
            title: format!("{} Study Group", self.names.subject(&group.subject)),
            badge: Some(badge.to_string()),
            style,
            fields: vec![
                field("Group ID", group.id.to_string()),
                field("Purpose", self.names.goal(&group.goal)),
                field(
                    "Date/Time",
                    format!("{} \u{2022} {}", self.format_date(group), group.time),
                ),
                field("Location", group.location.clone()),
                field("Members", group.member_ratio()),
                field("Created by", group.creator.clone()),
            ],
            actions,
        }
    }

    /// Locale-style date; unparseable dates are shown as sent.
    pub fn format_date(&self, group: &Group) -> String {
        match group.calendar_date() {
            Some(date) => {
                try_format(date, &self.date_format).unwrap_or_else(|| group.date.clone())
            }
            None => group.date.clone(),
        }
    }
}

fn field(label: &'static str, value: String) -> CardField {
    CardField { label, value }
}

fn join_action(group: &Group, open_label: &str) -> CardAction {
    let full = group.is_full();
    let label = if full { FULL_LABEL } else { open_label };
    CardAction {
        kind: ActionKind::Join,
        label: label.to_string(),
        enabled: !full,
        group_id: group.id.clone(),
        href: None,
    }
}

/// `None` when the pattern needs fields a plain date does not have.
fn try_format(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

fn is_valid_format(format: &str) -> bool {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    NaiveDate::from_ymd_opt(2000, 1, 1).is_some_and(|sample| try_format(sample, format).is_some())
}
