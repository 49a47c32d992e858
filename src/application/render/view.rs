use serde::Serialize;

use crate::domain::model::GroupId;

/// Which panel a list is drawn into. Decides layout and empty-state text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderContext {
    Browse,
    MyGroups,
    /// My-groups layout showing search hits
    MyGroupsSearch,
    Recommendation,
}

impl RenderContext {
    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::Browse => "No groups found. Try adjusting your filters or create a new group!",
            Self::MyGroups => {
                "You haven't joined or created any groups yet. Go to \"Find Group\" to join one or \"Create Group\" to start your own!"
            }
            Self::MyGroupsSearch => "No groups found matching your search criteria.",
            Self::Recommendation => {
                "No recommendations available. Try adjusting your filters or create a group!"
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Browse => "Available Groups",
            Self::MyGroups | Self::MyGroupsSearch => "My Groups",
            Self::Recommendation => "Recommended For You",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStyle {
    Standard,
    Created,
    Joined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Join,
    Delete,
    Details,
}

/// A control on a card. Disabled controls carry no behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAction {
    pub kind: ActionKind,
    pub label: String,
    pub enabled: bool,
    pub group_id: GroupId,
    /// Link target for navigation affordances
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCard {
    pub group_id: GroupId,
    pub title: String,
    pub badge: Option<String>,
    pub style: CardStyle,
    pub fields: Vec<CardField>,
    pub actions: Vec<CardAction>,
}

impl GroupCard {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn action(&self, kind: ActionKind) -> Option<&CardAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PanelContent {
    Cards(Vec<GroupCard>),
    Empty(String),
    /// Status text in place of the list: loading, errors, login prompts
    Message(String),
}

/// Everything a target needs to redraw one panel from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub context: RenderContext,
    pub content: PanelContent,
}

impl PanelView {
    pub fn cards(&self) -> &[GroupCard] {
        match &self.content {
            PanelContent::Cards(cards) => cards,
            _ => &[],
        }
    }
}

/// Where panels get drawn. Each call replaces whatever the panel showed
/// before.
pub trait RenderTarget: Send {
    fn render(&mut self, view: &PanelView);
}
