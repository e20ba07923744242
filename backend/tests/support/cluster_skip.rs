//! Skip policy for suites that need the embedded cluster.
//!
//! Setting `SKIP_TEST_CLUSTER` lets suites pass on machines that cannot
//! start PostgreSQL; without it a setup failure is a test failure.

/// Whether `SKIP_TEST_CLUSTER` is "1", "true", or "yes" (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Print a skip marker and return `None` when skipping is allowed; panic
/// otherwise so a broken cluster is not masked in CI.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values_enable_skipping() {
        for value in ["1", "TRUE", "yes"] {
            let _guard = env_lock::lock_env([("SKIP_TEST_CLUSTER", Some(value))]);
            assert!(should_skip_test_cluster(), "{value} should skip");
        }
    }

    #[test]
    fn skipping_yields_none() {
        let _guard = env_lock::lock_env([("SKIP_TEST_CLUSTER", Some("1"))]);
        assert!(handle_cluster_setup_failure::<()>("no binaries").is_none());
    }
}
