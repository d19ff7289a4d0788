//! Starting embedded PostgreSQL clusters for the integration suites.
//!
//! Clusters start one at a time. Unless both `PG_RUNTIME_DIR` and
//! `PG_DATA_DIR` are set, each start gets scratch directories under
//! `target/pg-embed/<pid>-<uuid>` so parallel test binaries never share a
//! data directory.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static START_LOCK: Mutex<()> = Mutex::new(());

const ATTEMPTS: u32 = 3;
const FIRST_BACKOFF: Duration = Duration::from_millis(500);

/// Download failures worth another attempt.
const TRANSIENT_MARKERS: [&str; 6] = [
    "connection reset",
    "timed out",
    "timeout",
    "dns error",
    "temporarily unavailable",
    "error decoding response body",
];

fn is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

fn scratch_dirs() -> std::io::Result<(String, String)> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("{}-{}", std::process::id(), Uuid::new_v4().simple()));
    let runtime = base.join("install");
    let data = base.join("data");
    std::fs::create_dir_all(&runtime)?;
    std::fs::create_dir_all(&data)?;
    Ok((
        runtime.to_string_lossy().into_owned(),
        data.to_string_lossy().into_owned(),
    ))
}

/// Start a [`TestCluster`], retrying transient download failures with
/// doubling backoff.
pub fn start_cluster() -> Result<TestCluster, String> {
    let _serial = START_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let dirs_configured =
        std::env::var_os("PG_RUNTIME_DIR").is_some() && std::env::var_os("PG_DATA_DIR").is_some();
    let _env = if dirs_configured {
        None
    } else {
        let (runtime, data) = scratch_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime)),
            ("PG_DATA_DIR", Some(data)),
        ]))
    };

    let mut backoff = FIRST_BACKOFF;
    let mut attempt = 1;
    loop {
        let message = match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => format!("{err:?}"),
        };
        if attempt == ATTEMPTS || !is_transient(&message) {
            return Err(message);
        }
        eprintln!("pg-embed: attempt {attempt}/{ATTEMPTS} failed, retrying in {backoff:?}: {message}");
        std::thread::sleep(backoff);
        backoff *= 2;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::is_transient;
    use rstest::rstest;

    #[rstest]
    #[case("Connection reset by peer", true)]
    #[case("operation TIMED OUT", true)]
    #[case("initdb: permission denied", false)]
    fn only_network_failures_are_retried(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(is_transient(message), expected);
    }
}
