//! In-memory copy of the last group list the backend served.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::model::Group;

/// Proof that a fetch was started. Only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Explicit state container for the cached list. Replaced wholesale on
/// each accepted fetch, never patched in place.
#[derive(Debug, Default)]
pub struct GroupCache {
    issued: AtomicU64,
    state: RwLock<Snapshot>,
}

#[derive(Debug, Default, Clone)]
struct Snapshot {
    generation: u64,
    groups: Arc<Vec<Group>>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new in-flight fetch. Any older outstanding ticket becomes
    /// stale.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `groups` if `ticket` is still the newest fetch. Returns false
    /// and drops the list when a newer fetch has been started since.
    pub fn commit(&self, ticket: FetchTicket, groups: Vec<Group>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale group list (generation {}, latest {})",
                ticket.0,
                self.issued.load(Ordering::SeqCst)
            );
            return false;
        }

        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.generation > ticket.0 {
            return false;
        }
        *state = Snapshot {
            generation: ticket.0,
            groups: Arc::new(groups),
        };
        true
    }

    pub fn groups(&self) -> Arc<Vec<Group>> {
        match self.state.read() {
            Ok(guard) => guard.groups.clone(),
            Err(poisoned) => poisoned.into_inner().groups.clone(),
        }
    }

    /// Generation of the list currently held; 0 before the first commit.
    pub fn generation(&self) -> u64 {
        match self.state.read() {
            Ok(guard) => guard.generation,
            Err(poisoned) => poisoned.into_inner().generation,
        }
    }
}
