mod group_service;
pub mod recommendation;
pub mod search;

pub use group_service::{
    FetchOutcome, FilterOptions, GroupService, BROWSE_ERROR_MESSAGE, LOADING_MESSAGE,
    MATCHES_LOGIN_MESSAGE, MY_GROUPS_ERROR_MESSAGE, MY_GROUPS_LOGIN_MESSAGE,
};
pub use recommendation::{match_score, RecommendationScorer, ScoredGroup, MAX_SCORE};
pub use search::search;
