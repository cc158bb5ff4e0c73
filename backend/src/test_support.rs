//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{DirectoryUser, UserId, UserProfile};
use crate::inbound::http::state::{DrivenAdapters, HttpState};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::{Argon2PasswordVerifier, hash_password};

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Credentials of a user registered with [`seed_user`].
#[derive(Debug, Clone)]
pub struct SeededUser {
    pub profile: UserProfile,
    pub password: String,
}

/// Register a directory user with an argon2 hash of `password`.
///
/// # Examples
/// ```
/// use ticketrax::outbound::memory::InMemoryStore;
/// use ticketrax::test_support::seed_user;
///
/// # async fn demo() {
/// let store = InMemoryStore::new();
/// let user = seed_user(&store, "ada", "ada@example.com", "pw").await;
/// assert_eq!(user.profile.email, "ada@example.com");
/// # }
/// ```
pub async fn seed_user(
    store: &InMemoryStore,
    username: &str,
    email: &str,
    password: &str,
) -> SeededUser {
    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(error) => panic!("hash fixture password: {error}"),
    };
    let profile = UserProfile {
        id: UserId::random(),
        username: username.to_owned(),
        email: email.to_owned(),
        first_name: username.to_owned(),
        last_name: "Tester".to_owned(),
    };
    store
        .add_user(DirectoryUser {
            profile: profile.clone(),
            password_hash,
        })
        .await;
    SeededUser {
        profile,
        password: password.to_owned(),
    }
}

/// Wire the domain services over one in-memory store.
pub fn memory_state(store: &Arc<InMemoryStore>, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::wire(
        DrivenAdapters {
            tickets: store.clone(),
            activities: store.clone(),
            users: store.clone(),
            tokens: store.clone(),
            passwords: Arc::new(Argon2PasswordVerifier),
        },
        clock,
    )
}
