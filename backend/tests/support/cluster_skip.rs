//! Access to the embedded PostgreSQL cluster shared by a test binary.
//!
//! Environments that cannot download or start PostgreSQL set
//! `SKIP_TEST_CLUSTER=1` to skip the adapter suites instead of failing them.

use std::fmt::Display;
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

const BOOTSTRAP_ATTEMPTS: usize = 5;
const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Superuser password used when the environment does not pin one.
///
/// A reused data directory only accepts the password it was initialised
/// with, so every run must present the same value.
const STABLE_PASSWORD: &str = "ticketrax_embedded_test";

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes"
/// (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster setup failure.
///
/// Prints a skip marker and returns `None` when skipping is allowed, and
/// panics otherwise so a broken CI cluster is never silently ignored.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Start the shared cluster on first use and return its handle.
///
/// Bootstrap is retried because parallel test binaries race for the same
/// installation directory.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _password = std::env::var_os("PG_PASSWORD")
        .is_none()
        .then(|| env_lock::lock_env([("PG_PASSWORD", Some(STABLE_PASSWORD))]));

    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt < BOOTSTRAP_ATTEMPTS => {
                eprintln!(
                    "cluster bootstrap attempt {attempt}/{BOOTSTRAP_ATTEMPTS} failed: {error}"
                );
                attempt += 1;
                std::thread::sleep(BOOTSTRAP_RETRY_DELAY);
            }
            Err(error) => {
                return Err(format!(
                    "cluster bootstrap failed after {BOOTSTRAP_ATTEMPTS} attempts: {error}"
                ));
            }
        }
    }
}
