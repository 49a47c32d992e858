mod filters;
mod group;

pub use filters::{DateRange, FilterValue, UserFilters, ALL};
pub use group::{
    parse_calendar_date, CreateGroupPayload, GoalOption, Group, GroupDetails, GroupId,
    GroupMember, Membership, NewGroup, SubjectOption, User, UserId, DEFAULT_MAX_MEMBERS,
};
