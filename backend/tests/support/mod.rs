//! Helpers shared by the PostgreSQL adapter suites.
//!
//! Each integration test compiles as its own crate and pulls this module in
//! with `mod support;`, so not every suite uses every helper.
#![allow(dead_code)]

pub mod cluster_skip;
pub mod embedded_postgres;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;

use ticketrax::outbound::persistence::{DbPool, PoolConfig};

pub use cluster_skip::{handle_cluster_setup_failure, shared_cluster};
pub use embedded_postgres::{migrate_schema, provision_template_database};

/// Render a `postgres` error with its SQLSTATE and server message.
///
/// `Display` on `postgres::Error` often reduces server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// One freshly migrated database with a pool and a runtime to drive it.
///
/// Fields drop in declaration order, so the pool releases its connections
/// before the temporary database is dropped.
pub struct PgContext {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub database_url: String,
    _database: TemporaryDatabase,
}

impl PgContext {
    /// Run raw SQL against the test database, bypassing the adapters.
    pub fn execute(
        &self,
        sql: &str,
        params: &[&(dyn postgres::types::ToSql + Sync)],
    ) -> u64 {
        let mut client = Client::connect(self.database_url.as_str(), NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
        client
            .execute(sql, params)
            .unwrap_or_else(|err| panic!("execute {sql}: {}", format_postgres_error(&err)))
    }

    /// Count the rows of `table`.
    pub fn count_rows(&self, table: &str) -> i64 {
        let mut client = Client::connect(self.database_url.as_str(), NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
        let row = client
            .query_one(format!("SELECT COUNT(*) FROM {table}").as_str(), &[])
            .unwrap_or_else(|err| panic!("count {table}: {}", format_postgres_error(&err)));
        row.get(0)
    }
}

/// Build a [`PgContext`] on a database cloned from the migration template.
pub fn setup_context(max_connections: u32) -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;
    let database_url = database.url().to_string();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(max_connections)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        runtime,
        pool,
        database_url,
        _database: database,
    })
}

/// Context for an rstest fixture; `None` means the suite should skip.
pub fn pg_context(max_connections: u32) -> Option<PgContext> {
    match setup_context(max_connections) {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
