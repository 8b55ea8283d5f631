//! Shared helpers for `ssm-run`'s integration tests.
//!
//! - [`fakes`]: in-memory collaborators for the lifecycle engine.
//! - [`builders`]: requests, raw inputs and status snapshots with test
//!   defaults.

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single engine run in a test. Runs use millisecond poll
/// intervals, so hitting it means the controller is stuck polling.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Route engine diagnostics into the test harness' captured output.
///
/// Defaults to `ssm_run=debug` so lifecycle transitions show up next to a
/// failing assertion; `RUST_LOG` overrides it.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,ssm_run=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it outlives [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("engine run did not finish within {TEST_TIMEOUT:?}"))
}
