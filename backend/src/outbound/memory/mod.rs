//! In-process store implementing every driven port.
//!
//! Used when no database is configured and by integration tests. All state
//! sits behind one `tokio::sync::RwLock`, so a ticket and its seed activity
//! are written in the same critical section and deleting a ticket removes
//! its activities before the lock is released.

mod activities;
mod identity;
mod tickets;

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{Activity, AuthToken, DirectoryUser, Ticket, UserId};

#[derive(Default)]
struct StoreState {
    tickets: Vec<Ticket>,
    activities: Vec<Activity>,
    users: Vec<DirectoryUser>,
    tokens: HashMap<UserId, AuthToken>,
}

/// Shared in-memory backing store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ticketrax::outbound::memory::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::new());
/// # let _ = store;
/// ```
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory user. Replaces any user with the same id.
    pub async fn add_user(&self, user: DirectoryUser) {
        let mut state = self.state.write().await;
        state
            .users
            .retain(|existing| existing.profile.id != user.profile.id);
        state.users.push(user);
    }

    /// Number of stored activities, across all tickets.
    pub async fn activity_count(&self) -> usize {
        self.state.read().await.activities.len()
    }
}
