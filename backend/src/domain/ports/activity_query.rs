//! Driving port for activity reads.

use async_trait::async_trait;

use crate::domain::{Activity, ActivityId, Error};

#[async_trait]
pub trait ActivityQuery: Send + Sync {
    /// Every activity, oldest first.
    async fn list(&self) -> Result<Vec<Activity>, Error>;

    async fn get(&self, id: &ActivityId) -> Result<Activity, Error>;
}
