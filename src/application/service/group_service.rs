use std::sync::Arc;

use crate::application::cache::{FetchTicket, GroupCache};
use crate::application::eventbus::SharedEventBus;
use crate::application::render::{ListRenderer, RenderContext, RenderTarget};
use crate::application::service::recommendation::{RecommendationScorer, ScoredGroup};
use crate::application::service::search::search;
use crate::domain::error::DomainError;
use crate::domain::event::DomainEvent;
use crate::domain::model::{Group, GroupDetails, GroupId, NewGroup, User, UserFilters};
use crate::domain::repository::{GroupRepository, Result};

pub const LOADING_MESSAGE: &str = "Loading groups...";
pub const BROWSE_ERROR_MESSAGE: &str = "Error loading groups. Please try again later.";
pub const MY_GROUPS_ERROR_MESSAGE: &str = "Error loading your groups. Please try again later.";
pub const MY_GROUPS_LOGIN_MESSAGE: &str =
    "Please log in to view your groups. Go to \"Find Group\" to join one!";
pub const MATCHES_LOGIN_MESSAGE: &str =
    "Please join a group or create an account to receive personalized recommendations!";

/// What happened to a list fetch once the panel was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was accepted and drawn; holds the group count
    Rendered(usize),
    /// A newer fetch started while this one was in flight; nothing drawn
    Stale,
    AuthRequired,
    /// Panel shows an error message
    Failed(String),
}

/// Filter choices with their display names, as `(code, name)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub subjects: Vec<(String, String)>,
    pub goals: Vec<(String, String)>,
}

/// Drives every page flow: browse, recommendations, my groups, and the
/// join/create/delete actions.
pub struct GroupService<R: GroupRepository> {
    repo: R,
    browse_cache: GroupCache,
    my_groups_cache: GroupCache,
    scorer: RecommendationScorer,
    renderer: ListRenderer,
    event_bus: SharedEventBus,
    login_url: String,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(
        repo: R,
        renderer: ListRenderer,
        scorer: RecommendationScorer,
        event_bus: SharedEventBus,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            browse_cache: GroupCache::new(),
            my_groups_cache: GroupCache::new(),
            scorer,
            renderer,
            event_bus,
            login_url: login_url.into(),
        }
    }

    pub fn renderer(&self) -> &ListRenderer {
        &self.renderer
    }

    /// Groups from the last accepted browse fetch.
    pub fn cached_groups(&self) -> Arc<Vec<Group>> {
        self.browse_cache.groups()
    }

    /// Groups from the last accepted my-groups fetch.
    pub fn cached_my_groups(&self) -> Arc<Vec<Group>> {
        self.my_groups_cache.groups()
    }

    pub async fn current_user(&self) -> Result<User> {
        self.repo
            .current_user()
            .await
            .inspect_err(|e| self.report_auth(e))
    }

    /// Subject and goal choices for the filter controls. Failures leave the
    /// lists empty.
    pub async fn filter_options(&self) -> FilterOptions {
        let names = self.renderer.names();

        let subjects = match self.repo.subjects().await {
            Ok(options) => options
                .into_iter()
                .map(|o| {
                    let name = names.subject(&o.subject);
                    (o.subject, name)
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to load subjects: {}", e);
                Vec::new()
            }
        };

        let goals = match self.repo.goals().await {
            Ok(options) => options
                .into_iter()
                .map(|o| {
                    let name = names.goal(&o.goal);
                    (o.goal, name)
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to load goals: {}", e);
                Vec::new()
            }
        };

        FilterOptions { subjects, goals }
    }

    /// Fetch the browse list for `filters` and draw it.
    pub async fn load_groups(
        &self,
        filters: &UserFilters,
        target: &mut dyn RenderTarget,
    ) -> FetchOutcome {
        self.renderer
            .render_message(target, RenderContext::Browse, LOADING_MESSAGE);

        let ticket = self.browse_cache.begin_fetch();
        match self.repo.find_groups(filters).await {
            Ok(groups) => {
                let count = groups.len();
                if !self.browse_cache.commit(ticket, groups) {
                    return FetchOutcome::Stale;
                }
                self.event_bus.publish(DomainEvent::GroupsLoaded {
                    count,
                    generation: ticket.generation(),
                });
                self.renderer
                    .render(target, &self.browse_cache.groups(), RenderContext::Browse);
                FetchOutcome::Rendered(count)
            }
            Err(e) => self.fetch_failed(e, ticket, RenderContext::Browse, target),
        }
    }

    /// Score the cached browse list against `filters` and draw the top picks.
    pub fn recommend(
        &self,
        filters: &UserFilters,
        target: &mut dyn RenderTarget,
    ) -> Vec<ScoredGroup> {
        let scored = self.scorer.score(filters, &self.browse_cache.groups());
        self.renderer.render_scored(target, &scored);
        scored
    }

    /// Browse list followed by recommendations, as a filter change does.
    pub async fn refresh_browse(
        &self,
        filters: &UserFilters,
        groups_target: &mut dyn RenderTarget,
        recommendations_target: &mut dyn RenderTarget,
    ) -> FetchOutcome {
        let outcome = self.load_groups(filters, groups_target).await;
        if matches!(outcome, FetchOutcome::Rendered(_)) {
            self.recommend(filters, recommendations_target);
        }
        outcome
    }

    /// Server-side matches drawn into the recommendation panel.
    pub async fn server_matches(&self, target: &mut dyn RenderTarget) -> FetchOutcome {
        match self.repo.auto_match().await {
            Ok(groups) => {
                self.renderer
                    .render(target, &groups, RenderContext::Recommendation);
                FetchOutcome::Rendered(groups.len())
            }
            Err(DomainError::AuthRequired) => {
                self.report_auth(&DomainError::AuthRequired);
                self.renderer.render_message(
                    target,
                    RenderContext::Recommendation,
                    MATCHES_LOGIN_MESSAGE,
                );
                FetchOutcome::AuthRequired
            }
            Err(e) => {
                tracing::warn!("Error fetching recommendations: {}", e);
                self.renderer
                    .render(target, &[], RenderContext::Recommendation);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Join a group, then refresh the browse list and recommendations.
    pub async fn join(
        &self,
        id: &GroupId,
        filters: &UserFilters,
        groups_target: &mut dyn RenderTarget,
        recommendations_target: &mut dyn RenderTarget,
    ) -> Result<()> {
        match self.repo.join_group(id).await {
            Ok(()) => {
                tracing::info!("Joined group {}", id);
                self.event_bus.publish(DomainEvent::info(format!(
                    "Success! You joined Group {}",
                    id
                )));
                self.event_bus.publish(DomainEvent::GroupJoined {
                    group_id: id.to_string(),
                });
                self.refresh_browse(filters, groups_target, recommendations_target)
                    .await;
                Ok(())
            }
            Err(e) => {
                match &e {
                    DomainError::AuthRequired => self.report_auth(&e),
                    DomainError::Rejected(msg) => self
                        .event_bus
                        .publish(DomainEvent::error(format!("Error joining group: {}", msg))),
                    other => {
                        tracing::error!("Error joining group {}: {}", id, other);
                        self.event_bus.publish(DomainEvent::error(
                            "An error occurred while joining the group",
                        ));
                    }
                }
                Err(e)
            }
        }
    }

    /// Validate locally, then create the group as the logged-in user.
    pub async fn create(&self, form: NewGroup) -> Result<Option<GroupId>> {
        if let Err(e) = form.validate() {
            self.event_bus.publish(DomainEvent::error(e.to_string()));
            return Err(e);
        }

        let user = match self.repo.current_user().await {
            Ok(user) => user,
            Err(e) => {
                if e.is_auth_required() {
                    self.event_bus
                        .publish(DomainEvent::error("Please log in first to create a group"));
                    self.report_auth(&e);
                } else {
                    tracing::error!("Error getting user info: {}", e);
                    self.event_bus.publish(DomainEvent::error(format!(
                        "An error occurred while creating the group: {}",
                        e
                    )));
                }
                return Err(e);
            }
        };

        let payload = form.into_payload(user.id);
        match self.repo.create_group(&payload).await {
            Ok(group_id) => {
                let message = match &group_id {
                    Some(id) => format!("Success! Group created successfully.\nGroup ID: {}", id),
                    None => "Group created successfully!".to_string(),
                };
                tracing::info!("Created group {:?}", group_id);
                self.event_bus.publish(DomainEvent::info(message));
                self.event_bus.publish(DomainEvent::GroupCreated {
                    group_id: group_id.as_ref().map(|id| id.to_string()),
                });
                Ok(group_id)
            }
            Err(e) => {
                match &e {
                    DomainError::AuthRequired => self.report_auth(&e),
                    DomainError::Rejected(msg) => self
                        .event_bus
                        .publish(DomainEvent::error(format!("Error creating group: {}", msg))),
                    other => self.event_bus.publish(DomainEvent::error(format!(
                        "An error occurred while creating the group: {}",
                        other
                    ))),
                }
                Err(e)
            }
        }
    }

    /// Fetch the viewer's groups and draw them.
    pub async fn load_my_groups(&self, target: &mut dyn RenderTarget) -> FetchOutcome {
        let ticket = self.my_groups_cache.begin_fetch();
        match self.repo.my_groups().await {
            Ok(groups) => {
                let count = groups.len();
                if !self.my_groups_cache.commit(ticket, groups) {
                    return FetchOutcome::Stale;
                }
                self.renderer.render(
                    target,
                    &self.my_groups_cache.groups(),
                    RenderContext::MyGroups,
                );
                FetchOutcome::Rendered(count)
            }
            Err(e) => self.fetch_failed(e, ticket, RenderContext::MyGroups, target),
        }
    }

    /// Filter the cached my-groups list. A blank term shows everything.
    pub fn search_my_groups(&self, term: &str, target: &mut dyn RenderTarget) -> Vec<Group> {
        let groups = self.my_groups_cache.groups();
        if term.trim().is_empty() {
            self.renderer
                .render(target, &groups, RenderContext::MyGroups);
            return groups.to_vec();
        }

        let hits = search(term, &groups, self.renderer.names());
        self.renderer
            .render(target, &hits, RenderContext::MyGroupsSearch);
        hits
    }

    /// Delete a group the viewer created, then reload their groups.
    pub async fn delete(&self, id: &GroupId, target: &mut dyn RenderTarget) -> Result<()> {
        match self.repo.delete_group(id).await {
            Ok(()) => {
                tracing::info!("Deleted group {}", id);
                self.event_bus
                    .publish(DomainEvent::info("Group deleted successfully"));
                self.event_bus.publish(DomainEvent::GroupDeleted {
                    group_id: id.to_string(),
                });
                self.load_my_groups(target).await;
                Ok(())
            }
            Err(e) => {
                match &e {
                    DomainError::AuthRequired => self.report_auth(&e),
                    DomainError::Rejected(msg) => self
                        .event_bus
                        .publish(DomainEvent::error(format!("Error deleting group: {}", msg))),
                    other => {
                        tracing::error!("Error deleting group {}: {}", id, other);
                        self.event_bus.publish(DomainEvent::error("Error deleting group"));
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn group_details(&self, id: &GroupId) -> Result<GroupDetails> {
        self.repo
            .group_details(id)
            .await
            .inspect_err(|e| self.report_auth(e))
    }

    fn fetch_failed(
        &self,
        err: DomainError,
        ticket: FetchTicket,
        context: RenderContext,
        target: &mut dyn RenderTarget,
    ) -> FetchOutcome {
        let cache = match context {
            RenderContext::Browse => &self.browse_cache,
            _ => &self.my_groups_cache,
        };
        // a newer fetch owns the panel now
        if !cache.is_current(ticket) {
            return FetchOutcome::Stale;
        }

        match err {
            DomainError::AuthRequired => {
                self.report_auth(&err);
                if context != RenderContext::Browse {
                    self.renderer
                        .render_message(target, context, MY_GROUPS_LOGIN_MESSAGE);
                }
                FetchOutcome::AuthRequired
            }
            other => {
                tracing::error!("Error fetching groups: {}", other);
                let message = match context {
                    RenderContext::Browse => BROWSE_ERROR_MESSAGE,
                    _ => MY_GROUPS_ERROR_MESSAGE,
                };
                self.renderer.render_message(target, context, message);
                FetchOutcome::Failed(other.to_string())
            }
        }
    }

    fn report_auth(&self, err: &DomainError) {
        if err.is_auth_required() {
            tracing::info!("Backend requires login");
            self.event_bus.publish(DomainEvent::AuthRequired {
                login_url: self.login_url.clone(),
            });
        }
    }
}
