//! Identity gateway: credential checks and token issuance.
//!
//! Failed logins never reveal whether the email or the password was wrong;
//! both surface as the same `invalid_credentials` error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    LoginService, PasswordVerifier, TokenAuthenticator, TokenStore, TokenStoreError,
    UserDirectory, UserDirectoryError,
};
use crate::domain::{AuthSession, AuthToken, Error, LoginCredentials, TraceId, UserProfile};

/// Message for any failed email/password check.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
/// Message for a presented token that maps to no user.
pub const INVALID_TOKEN: &str = "Invalid token.";

/// Identity gateway implementing the login and token driving ports.
#[derive(Clone)]
pub struct IdentityService<D, T, P> {
    directory: Arc<D>,
    tokens: Arc<T>,
    verifier: Arc<P>,
}

impl<D, T, P> IdentityService<D, T, P> {
    /// Create a new gateway over the given directory, token store and
    /// password verifier.
    pub fn new(directory: Arc<D>, tokens: Arc<T>, verifier: Arc<P>) -> Self {
        Self {
            directory,
            tokens,
            verifier,
        }
    }
}

impl<D, T, P> IdentityService<D, T, P>
where
    D: UserDirectory,
    T: TokenStore,
    P: PasswordVerifier + 'static,
{
    fn map_directory_error(error: UserDirectoryError) -> Error {
        match error {
            UserDirectoryError::Connection { message } => {
                Error::service_unavailable(format!("user directory unavailable: {message}"))
            }
            UserDirectoryError::Query { message } => {
                Error::internal(format!("user directory error: {message}"))
            }
        }
    }

    fn map_token_error(error: TokenStoreError) -> Error {
        match error {
            TokenStoreError::Connection { message } => {
                Error::service_unavailable(format!("token store unavailable: {message}"))
            }
            TokenStoreError::Query { message } => {
                Error::internal(format!("token store error: {message}"))
            }
        }
    }

    async fn password_matches(
        &self,
        credentials: &LoginCredentials,
        password_hash: String,
    ) -> Result<bool, Error> {
        let verifier = Arc::clone(&self.verifier);
        let password = credentials.password_secret();
        let outcome =
            TraceId::spawn_blocking(move || verifier.verify(password.as_str(), &password_hash))
                .await
                .map_err(|err| Error::internal(format!("password check did not complete: {err}")))?;

        match outcome {
            Ok(matched) => Ok(matched),
            Err(err) => {
                warn!(error = %err, "stored password hash rejected by verifier");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl<D, T, P> LoginService for IdentityService<D, T, P>
where
    D: UserDirectory,
    T: TokenStore,
    P: PasswordVerifier + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        // Stored addresses never contain NUL, and PostgreSQL refuses it as a
        // query parameter.
        if credentials.email().contains('\0') {
            warn!("login rejected: unknown email");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }
        let Some(user) = self
            .directory
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_directory_error)?
        else {
            warn!("login rejected: unknown email");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };

        if !self
            .password_matches(credentials, user.password_hash)
            .await?
        {
            warn!(user_id = %user.profile.id, "login rejected: password mismatch");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        let token = self
            .tokens
            .get_or_create(&user.profile.id, &AuthToken::generate())
            .await
            .map_err(Self::map_token_error)?;
        info!(user_id = %user.profile.id, "user authenticated");

        Ok(AuthSession {
            token,
            user: user.profile,
        })
    }
}

#[async_trait]
impl<D, T, P> TokenAuthenticator for IdentityService<D, T, P>
where
    D: UserDirectory,
    T: TokenStore,
    P: PasswordVerifier + 'static,
{
    async fn resolve(&self, token: &AuthToken) -> Result<UserProfile, Error> {
        self.tokens
            .resolve(token)
            .await
            .map_err(Self::map_token_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockPasswordVerifier, MockTokenStore, MockUserDirectory, PasswordVerifierError,
    };
    use crate::domain::{DirectoryUser, ErrorCode, UserId};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::from_uuid(uuid::Uuid::nil()),
            username: "agent".to_owned(),
            email: "agent@example.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Agent".to_owned(),
        }
    }

    fn directory_with_user() -> MockUserDirectory {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .with(eq("Agent@Example.com"))
            .times(1)
            .return_once(|_| {
                Ok(Some(DirectoryUser {
                    profile: profile(),
                    password_hash: "stored-hash".to_owned(),
                }))
            });
        directory
    }

    fn verifier_returning(
        result: Result<bool, PasswordVerifierError>,
    ) -> MockPasswordVerifier {
        let mut verifier = MockPasswordVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .return_once(move |_, _| result);
        verifier
    }

    fn service(
        directory: MockUserDirectory,
        tokens: MockTokenStore,
        verifier: MockPasswordVerifier,
    ) -> IdentityService<MockUserDirectory, MockTokenStore, MockPasswordVerifier> {
        IdentityService::new(Arc::new(directory), Arc::new(tokens), Arc::new(verifier))
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("Agent@Example.com", password).expect("credentials")
    }

    #[tokio::test]
    async fn successful_login_returns_stored_token_and_profile() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_get_or_create()
            .times(1)
            .return_once(|_, _| Ok(AuthToken::new("existing-token")));
        let service = service(directory_with_user(), tokens, verifier_returning(Ok(true)));

        let session = service
            .authenticate(&credentials("secret"))
            .await
            .expect("login succeeds");

        assert_eq!(session.token, AuthToken::new("existing-token"));
        assert_eq!(session.user, profile());
    }

    #[rstest]
    #[case::wrong_password(Ok(false))]
    #[case::malformed_hash(Err(PasswordVerifierError::malformed_hash("bad phc")))]
    #[tokio::test]
    async fn password_failures_are_invalid_credentials(
        #[case] outcome: Result<bool, PasswordVerifierError>,
    ) {
        let mut tokens = MockTokenStore::new();
        tokens.expect_get_or_create().never();
        let service = service(directory_with_user(), tokens, verifier_returning(outcome));

        let err = service
            .authenticate(&credentials("wrong"))
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_email_matches_wrong_password_error() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        let mut verifier = MockPasswordVerifier::new();
        verifier.expect_verify().never();
        let service = service(directory, MockTokenStore::new(), verifier);

        let err = service
            .authenticate(&credentials("secret"))
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn email_with_nul_is_rejected_without_lookup() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_email().never();
        let service = service(directory, MockTokenStore::new(), MockPasswordVerifier::new());
        let credentials =
            LoginCredentials::try_from_parts("agent\0@example.com", "secret").expect("credentials");

        let err = service
            .authenticate(&credentials)
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn directory_outage_is_service_unavailable() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_email()
            .return_once(|_| Err(UserDirectoryError::connection("refused")));
        let service = service(directory, MockTokenStore::new(), MockPasswordVerifier::new());

        let err = service
            .authenticate(&credentials("secret"))
            .await
            .expect_err("login fails");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let mut tokens = MockTokenStore::new();
        tokens.expect_resolve().times(1).return_once(|_| Ok(None));
        let service = service(MockUserDirectory::new(), tokens, MockPasswordVerifier::new());

        let err = service
            .resolve(&AuthToken::new("nope"))
            .await
            .expect_err("unknown token");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn known_token_resolves_to_owner() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_resolve()
            .times(1)
            .return_once(|_| Ok(Some(profile())));
        let service = service(MockUserDirectory::new(), tokens, MockPasswordVerifier::new());

        let user = service
            .resolve(&AuthToken::new("known"))
            .await
            .expect("token resolves");

        assert_eq!(user, profile());
    }
}
