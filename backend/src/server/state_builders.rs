//! Builders choosing the driven adapters behind [`HttpState`].

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use ticketrax::domain::{DirectoryUser, UserId, UserProfile};
use ticketrax::inbound::http::state::{DrivenAdapters, HttpState};
use ticketrax::outbound::memory::InMemoryStore;
use ticketrax::outbound::password::{Argon2PasswordVerifier, hash_password};
use ticketrax::outbound::persistence::{
    DbPool, DieselActivityRepository, DieselTicketRepository, DieselTokenStore,
    DieselUserDirectory, PoolConfig, run_pending_migrations,
};

use super::ServerSettings;

/// Build the HTTP state from configuration.
///
/// With `TICKETRAX_DATABASE_URL` set, every port is backed by PostgreSQL and
/// pending migrations run first unless disabled. Otherwise all ports share one
/// in-memory store, optionally seeded with a single directory user.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail, the pool cannot be built,
/// or the seed password cannot be hashed.
pub async fn build_http_state(settings: &ServerSettings) -> std::io::Result<HttpState> {
    match settings.database_url.as_deref() {
        Some(url) => build_database_state(settings, url).await,
        None => build_memory_state(settings).await,
    }
}

async fn build_database_state(settings: &ServerSettings, url: &str) -> std::io::Result<HttpState> {
    if settings.run_migrations() {
        let applied = run_pending_migrations(url)
            .await
            .map_err(|err| std::io::Error::other(format!("database migrations: {err}")))?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;

    Ok(HttpState::wire(
        DrivenAdapters {
            tickets: Arc::new(DieselTicketRepository::new(pool.clone())),
            activities: Arc::new(DieselActivityRepository::new(pool.clone())),
            users: Arc::new(DieselUserDirectory::new(pool.clone())),
            tokens: Arc::new(DieselTokenStore::new(pool)),
            passwords: Arc::new(Argon2PasswordVerifier),
        },
        Arc::new(DefaultClock),
    ))
}

async fn build_memory_state(settings: &ServerSettings) -> std::io::Result<HttpState> {
    warn!("TICKETRAX_DATABASE_URL not set; using in-memory adapters (data is not persisted)");
    let store = Arc::new(InMemoryStore::new());

    if let Some((email, password)) = settings.seed_user() {
        store.add_user(seed_user(email, password)?).await;
        info!(email, "seeded in-memory directory user");
    }

    Ok(HttpState::wire(
        DrivenAdapters {
            tickets: store.clone(),
            activities: store.clone(),
            users: store.clone(),
            tokens: store,
            passwords: Arc::new(Argon2PasswordVerifier),
        },
        Arc::new(DefaultClock),
    ))
}

fn seed_user(email: &str, password: &str) -> std::io::Result<DirectoryUser> {
    let password_hash = hash_password(password)
        .map_err(|err| std::io::Error::other(format!("hash seed password: {err}")))?;
    let username = email.split('@').next().unwrap_or(email).to_owned();
    Ok(DirectoryUser {
        profile: UserProfile {
            id: UserId::random(),
            username,
            email: email.to_owned(),
            first_name: String::new(),
            last_name: String::new(),
        },
        password_hash,
    })
}
