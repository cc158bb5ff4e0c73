//! Register a directory user with an argon2 password hash.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ticketrax::domain::{DirectoryUser, EmailAddress, UserId, UserProfile};
use ticketrax::outbound::password::hash_password;
use ticketrax::outbound::persistence::{
    DbPool, DieselUserDirectory, PoolConfig, run_pending_migrations,
};

/// `create-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-user",
    about = "Add a user who can authenticate against the ticket API",
    version
)]
struct CliArgs {
    /// Login name shown alongside the profile.
    #[arg(long, value_name = "name")]
    username: String,
    /// Email used to authenticate; matched case-insensitively.
    #[arg(long, value_name = "email")]
    email: String,
    /// Plain-text password; only its argon2 hash is stored.
    #[arg(long, value_name = "password")]
    password: String,
    #[arg(long = "first-name", value_name = "name", default_value = "")]
    first_name: String,
    #[arg(long = "last-name", value_name = "name", default_value = "")]
    last_name: String,
    /// Database connection URL. Falls back to `TICKETRAX_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before inserting.
    #[arg(long = "migrate")]
    migrate: bool,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url.clone())?;
    let user = directory_user(&args)?;

    if args.migrate {
        let applied = run_pending_migrations(&database_url)
            .await
            .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
        info!(applied, "database migrations complete");
    }

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    DieselUserDirectory::new(pool)
        .register(&user)
        .await
        .map_err(|error| io::Error::other(format!("register user: {error}")))?;

    info!(user_id = %user.profile.id, email = %user.profile.email, "user created");
    println!("{}", user.profile.id);
    Ok(())
}

fn directory_user(args: &CliArgs) -> io::Result<DirectoryUser> {
    let email = EmailAddress::new(&args.email).map_err(|error| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("--email: {error}"))
    })?;
    if args.username.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--username must not be empty",
        ));
    }
    if args.password.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--password must not be empty",
        ));
    }
    let password_hash = hash_password(&args.password)
        .map_err(|error| io::Error::other(format!("hash password: {error}")))?;

    Ok(DirectoryUser {
        profile: UserProfile {
            id: UserId::random(),
            username: args.username.trim().to_owned(),
            email: email.as_ref().to_owned(),
            first_name: args.first_name.trim().to_owned(),
            last_name: args.last_name.trim().to_owned(),
        },
        password_hash,
    })
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("TICKETRAX_DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or TICKETRAX_DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "TICKETRAX_DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn args() -> CliArgs {
        CliArgs::try_parse_from([
            "create-user",
            "--username",
            "kim",
            "--email",
            " Kim@Example.com ",
            "--password",
            "hunter2",
            "--first-name",
            "Kim",
        ])
        .expect("args should parse")
    }

    #[rstest]
    fn directory_user_hashes_password_and_trims_email() {
        let cli = args();
        assert!(!cli.migrate);
        assert!(cli.database_url.is_none());

        let user = directory_user(&cli).expect("user");

        assert_eq!(user.profile.email, "Kim@Example.com");
        assert_eq!(user.profile.first_name, "Kim");
        assert_eq!(user.profile.last_name, "");
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "hunter2");
    }

    #[rstest]
    #[case(CliArgs { email: "not-an-email".to_owned(), ..args() })]
    #[case(CliArgs { password: String::new(), ..args() })]
    #[case(CliArgs { username: "  ".to_owned(), ..args() })]
    fn directory_user_rejects_bad_input(#[case] cli: CliArgs) {
        let err = directory_user(&cli).expect_err("invalid input");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn explicit_database_url_wins() {
        let url = resolve_database_url(Some("postgres://db/tickets".to_owned())).expect("url");
        assert_eq!(url, "postgres://db/tickets");
    }

    #[rstest]
    fn blank_explicit_database_url_is_rejected() {
        let err = resolve_database_url(Some("  ".to_owned())).expect_err("blank url");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn database_url_falls_back_to_environment() {
        let _guard = lock_env([(
            "TICKETRAX_DATABASE_URL",
            Some("postgres://env/tickets"),
        )]);
        assert_eq!(
            resolve_database_url(None).expect("url"),
            "postgres://env/tickets"
        );
    }

    #[rstest]
    fn missing_database_url_is_reported() {
        let _guard = lock_env([("TICKETRAX_DATABASE_URL", None::<String>)]);
        let err = resolve_database_url(None).expect_err("missing url");
        assert!(err.to_string().contains("--database-url"));
    }
}
