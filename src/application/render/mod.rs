//! Card view-models for group lists and the target they are drawn on.

mod renderer;
mod view;

pub use renderer::{
    ListRenderer, DEFAULT_DATE_FORMAT, DELETE_LABEL, DETAILS_LABEL, FULL_LABEL, JOIN_LABEL,
    JOIN_RECOMMENDED_LABEL,
};
pub use view::{
    ActionKind, CardAction, CardField, CardStyle, GroupCard, PanelContent, PanelView,
    RenderContext, RenderTarget,
};
