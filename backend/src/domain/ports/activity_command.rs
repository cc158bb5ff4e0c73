//! Driving port for recording activities.

use async_trait::async_trait;

use crate::domain::{Activity, ActivityDraft, Error};

#[async_trait]
pub trait ActivityCommand: Send + Sync {
    /// Append an activity to an existing ticket.
    async fn record(&self, draft: ActivityDraft) -> Result<Activity, Error>;
}
