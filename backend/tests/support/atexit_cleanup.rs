//! Process-exit shutdown for the shared embedded PostgreSQL cluster.
//!
//! `shared_cluster_handle()` leaks its guard so the cluster lives as long
//! as the test binary. Under `nextest` every binary is its own process, and
//! a postmaster left running blocks the next binary from starting on the
//! same data directory. A `libc::atexit` handler stops it instead.

#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
#[cfg(unix)]
use std::path::PathBuf;
#[cfg(unix)]
use std::sync::OnceLock;
#[cfg(unix)]
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

#[cfg(unix)]
use color_eyre::eyre::eyre;
#[cfg(unix)]
use pg_embedded_setup_unpriv::BootstrapError;
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
#[cfg(unix)]
const SHARED_CLUSTER_LOCK_FILE: &str = "marketplace-pg-embedded-shared-cluster.lock";
const STABLE_PASSWORD: &str = "marketplace_embedded_test";

#[cfg(unix)]
static PG_POSTMASTER_PID: AtomicI32 = AtomicI32::new(0);
#[cfg(unix)]
static PG_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
#[cfg(unix)]
static SHARED_CLUSTER_PROCESS_LOCK_FD: OnceLock<i32> = OnceLock::new();

/// Serialise cluster bootstrap across test processes with an `flock`.
#[cfg(unix)]
fn acquire_shared_cluster_process_lock() -> BootstrapResult<()> {
    if SHARED_CLUSTER_PROCESS_LOCK_FD.get().is_some() {
        return Ok(());
    }

    let lock_path = std::env::temp_dir().join(SHARED_CLUSTER_LOCK_FILE);
    let lock_path_cstring = CString::new(lock_path.as_os_str().as_bytes()).map_err(|error| {
        BootstrapError::from(eyre!(
            "encode shared cluster lock path '{}': {error}",
            lock_path.display()
        ))
    })?;

    // SAFETY: `lock_path_cstring` is NUL-terminated and outlives the call.
    let fd = unsafe {
        libc::open(
            lock_path_cstring.as_ptr(),
            libc::O_CREAT | libc::O_RDWR,
            0o600,
        )
    };
    if fd < 0 {
        let error = std::io::Error::last_os_error();
        return Err(BootstrapError::from(eyre!(
            "open shared cluster lock file '{}': {error}",
            lock_path.display()
        )));
    }

    // SAFETY: `fd` is a valid descriptor returned by `open` above.
    if unsafe { libc::flock(fd, libc::LOCK_EX) } != 0 {
        let error = std::io::Error::last_os_error();
        // SAFETY: `fd` is valid and unused elsewhere.
        unsafe {
            libc::close(fd);
        }
        return Err(BootstrapError::from(eyre!(
            "acquire shared cluster lock '{}': {error}",
            lock_path.display()
        )));
    }

    if SHARED_CLUSTER_PROCESS_LOCK_FD.set(fd).is_err() {
        // SAFETY: another caller won `set`; this descriptor is ours to close.
        unsafe {
            libc::close(fd);
        }
    }
    Ok(())
}

/// The process-wide cluster, with an exit hook that stops PostgreSQL.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    #[cfg(unix)]
    acquire_shared_cluster_process_lock()?;
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => {
                #[cfg(unix)]
                register_process_exit_cleanup(handle);
                return Ok(handle);
            }
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(error);
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pin `PG_PASSWORD` so a reused data directory keeps accepting logins.
///
/// `postgresql_embedded` picks a random password per process, but `initdb`
/// only runs when the data directory is new.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster library spawns threads and at most
        // once per process behind the shared-cluster mutex.
        unsafe {
            std::env::set_var("PG_PASSWORD", STABLE_PASSWORD);
        }
    }
}

#[cfg(unix)]
fn read_postmaster_pid(data_dir: &std::path::Path) -> Option<i32> {
    let dir = cap_std::fs::Dir::open_ambient_dir(data_dir, cap_std::ambient_authority()).ok()?;
    let content = dir.read_to_string("postmaster.pid").ok()?;
    content.lines().next()?.trim().parse().ok()
}

/// SIGTERM the postmaster, then SIGKILL it after five seconds.
///
/// The PID is re-read from `postmaster.pid` and must match the recorded
/// one, so a recycled PID is never signalled.
#[cfg(unix)]
extern "C" fn stop_postgres_on_exit() {
    let stored_pid = PG_POSTMASTER_PID.load(Ordering::Relaxed);
    if stored_pid <= 0 {
        return;
    }
    let pid = match PG_DATA_DIR.get().and_then(|dir| read_postmaster_pid(dir)) {
        Some(current_pid) if current_pid == stored_pid => current_pid,
        _ => return,
    };

    // SAFETY: `pid` matches the on-disk postmaster record.
    unsafe {
        if libc::kill(pid, libc::SIGTERM) != 0 {
            return;
        }
    }
    for _ in 0..50 {
        std::thread::sleep(Duration::from_millis(100));
        // SAFETY: signal 0 only checks that the process exists.
        if unsafe { libc::kill(pid, 0) } != 0 {
            return;
        }
    }
    // SAFETY: same validated `pid`; the graceful budget is spent.
    unsafe {
        libc::kill(pid, libc::SIGKILL);
    }
}

#[cfg(unix)]
fn register_process_exit_cleanup(handle: &ClusterHandle) {
    let data_dir = &handle.settings().data_dir;
    let Some(pid) = read_postmaster_pid(data_dir) else {
        return;
    };
    if PG_POSTMASTER_PID
        .compare_exchange(0, pid, Ordering::Relaxed, Ordering::Relaxed)
        .is_err()
    {
        return;
    }
    let _ = PG_DATA_DIR.set(data_dir.clone());

    // SAFETY: `stop_postgres_on_exit` is an `extern "C"` fn with no
    // preconditions beyond the PID recorded above.
    let rc = unsafe { libc::atexit(stop_postgres_on_exit) };
    if rc != 0 {
        eprintln!("pg-embed: failed to register atexit handler (rc={rc}); PID {pid} may outlive the test binary");
    }
}

#[cfg(test)]
mod tests {
    use cap_std::ambient_authority;
    use cap_std::fs::Dir;

    #[cfg(unix)]
    fn write_postmaster_pid(dir_path: &std::path::Path, content: &str) {
        let dir = Dir::open_ambient_dir(dir_path, ambient_authority()).expect("open dir");
        dir.write("postmaster.pid", content).expect("write");
    }

    #[cfg(unix)]
    #[test]
    fn postmaster_pid_is_the_first_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_postmaster_pid(dir.path(), "12345\n/some/path\n5432\n");
        assert_eq!(super::read_postmaster_pid(dir.path()), Some(12345));
    }

    #[cfg(unix)]
    #[test]
    fn missing_or_garbled_pid_files_are_ignored() {
        let missing = tempfile::tempdir().expect("tempdir");
        assert_eq!(super::read_postmaster_pid(missing.path()), None);

        let garbled = tempfile::tempdir().expect("tempdir");
        write_postmaster_pid(garbled.path(), "not-a-number\n");
        assert_eq!(super::read_postmaster_pid(garbled.path()), None);
    }

    #[test]
    fn an_existing_password_is_kept() {
        let _guard = env_lock::lock_env([("PG_PASSWORD", Some("custom_value"))]);
        super::ensure_stable_password();
        assert_eq!(
            std::env::var("PG_PASSWORD").expect("PG_PASSWORD should be set"),
            "custom_value"
        );
    }
}
