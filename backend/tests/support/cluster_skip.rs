//! Skip policy for suites that need an embedded PostgreSQL cluster.
//!
//! Developer machines and sandboxes often cannot download or start the
//! cluster. Suites skip with a `SKIP-TEST-CLUSTER` marker unless
//! `REQUIRE_TEST_CLUSTER` is truthy, in which case setup failure is fatal.

/// Whether `REQUIRE_TEST_CLUSTER` is `1`, `true`, or `yes` (any case).
pub fn test_cluster_required() -> bool {
    std::env::var("REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster setup failure and decide whether the calling test runs.
///
/// Returns `None` after printing the skip marker; panics when the cluster is
/// required.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if test_cluster_required() {
        panic!("Test cluster setup failed: {reason}. Unset REQUIRE_TEST_CLUSTER to skip.");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
