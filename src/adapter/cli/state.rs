use tokio::sync::broadcast;

use crate::application::eventbus::{drain, SharedEventBus};
use crate::application::render::ListRenderer;
use crate::application::service::{GroupService, RecommendationScorer};
use crate::domain::event::DomainEvent;
use crate::domain::repository::GroupRepository;
use crate::infrastructure::config::AppConfig;

/// Type alias for the dynamic backend
pub type DynGroupRepository = Box<dyn GroupRepository>;

pub struct AppState {
    pub group_service: GroupService<DynGroupRepository>,
    events: broadcast::Receiver<DomainEvent>,
}

impl AppState {
    pub fn new(group_repo: DynGroupRepository, config: &AppConfig, event_bus: SharedEventBus) -> Self {
        let renderer = ListRenderer::new(config.name_resolver(), &config.display.date_format);
        let scorer = RecommendationScorer::new(config.recommendations.limit);
        let events = event_bus.subscribe();

        Self {
            group_service: GroupService::new(
                group_repo,
                renderer,
                scorer,
                event_bus,
                config.backend.login_url(),
            ),
            events,
        }
    }

    /// Events published since the last call.
    pub fn drain_events(&mut self) -> Vec<DomainEvent> {
        drain(&mut self.events)
    }
}
