use crate::domain::event::DomainEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast bus carrying alerts and login redirects to the UI side
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: DomainEvent) {
        let name = event.event_name();
        if let Err(e) = self.sender.send(event) {
            tracing::trace!("No subscribers for {} event: {}", name, e);
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::default())
}

/// Take everything already queued on `receiver` without waiting.
pub fn drain(receiver: &mut broadcast::Receiver<DomainEvent>) -> Vec<DomainEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!("Event receiver lagged by {} events", n);
            }
            Err(_) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_events_in_order() {
        let bus = create_event_bus();
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::info("first"));
        bus.publish(DomainEvent::error("second"));

        let events = drain(&mut rx);
        assert_eq!(events, vec![DomainEvent::info("first"), DomainEvent::error("second")]);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let bus = EventBus::new(4);
        bus.publish(DomainEvent::GroupDeleted {
            group_id: "1".into(),
        });
    }
}
