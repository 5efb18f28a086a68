//! Advisory lock on one persisted registry, held by a mutating `pugh` run.
//!
//! The lock is a JSON file next to the registry (`<data_dir>/<key>.lock`)
//! naming the process and command that hold it. Two projects sharing a data
//! directory but using different persist keys never contend.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const WAIT_FOR_HOLDER: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the lock file records about its owner.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Holder {
    pid: u32,
    command: String,
    since: DateTime<Utc>,
}

enum Owner {
    /// Released between our attempt and the read.
    Released,
    Live(Holder),
    Exited(Holder),
    /// Present but not (yet) a complete holder record.
    Unreadable,
}

/// Held registry lock; the file is removed on drop.
#[derive(Debug)]
pub struct RegistryLock {
    path: PathBuf,
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to release registry lock");
            }
        }
    }
}

#[must_use]
pub fn lock_path(data_dir: &Path, persist_key: &str) -> PathBuf {
    data_dir.join(format!("{persist_key}.lock"))
}

/// Lock registry `persist_key` in `data_dir` on behalf of `command`, waiting
/// for a live holder to finish. Locks left by exited processes are cleared.
pub fn lock_registry(
    data_dir: &Path,
    persist_key: &str,
    command: &str,
) -> anyhow::Result<RegistryLock> {
    lock_registry_within(data_dir, persist_key, command, WAIT_FOR_HOLDER)
}

fn lock_registry_within(
    data_dir: &Path,
    persist_key: &str,
    command: &str,
    wait: Duration,
) -> anyhow::Result<RegistryLock> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let path = lock_path(data_dir, persist_key);
    let deadline = Instant::now() + wait;

    loop {
        match claim(&path, command) {
            Ok(lock) => {
                tracing::debug!(path = %path.display(), command, "registry locked");
                return Ok(lock);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to lock registry '{persist_key}' at {}", path.display())
                });
            }
        }

        match read_owner(&path) {
            Owner::Released => continue,
            Owner::Exited(holder) => {
                tracing::warn!(
                    pid = holder.pid,
                    command = %holder.command,
                    "clearing lock left by an exited pugh process"
                );
                match fs::remove_file(&path) {
                    Ok(()) => continue,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("failed to clear stale lock {}", path.display()));
                    }
                }
            }
            Owner::Live(holder) if Instant::now() >= deadline => {
                anyhow::bail!(
                    "registry '{persist_key}' is busy: `pugh {}` (pid {}) has held it since {}",
                    holder.command,
                    holder.pid,
                    holder.since.to_rfc3339()
                );
            }
            Owner::Unreadable if Instant::now() >= deadline => {
                anyhow::bail!(
                    "lock file {} is not readable; delete it if no pugh process is running",
                    path.display()
                );
            }
            Owner::Live(_) | Owner::Unreadable => std::thread::sleep(POLL_INTERVAL),
        }
    }
}

/// Create the lock file exclusively and record ourselves in it.
fn claim(path: &Path, command: &str) -> io::Result<RegistryLock> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    // From here on the file is ours; drop removes it if the write fails.
    let lock = RegistryLock {
        path: path.to_path_buf(),
    };
    let holder = Holder {
        pid: std::process::id(),
        command: command.to_string(),
        since: Utc::now(),
    };
    serde_json::to_writer(file, &holder).map_err(io::Error::from)?;
    Ok(lock)
}

fn read_owner(path: &Path) -> Owner {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Owner::Released,
        Err(_) => return Owner::Unreadable,
    };
    match serde_json::from_str::<Holder>(&text) {
        Ok(holder) if process_alive(holder.pid) => Owner::Live(holder),
        Ok(holder) => Owner::Exited(holder),
        Err(_) => Owner::Unreadable,
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const NO_WAIT: Duration = Duration::ZERO;

    #[test]
    fn lock_file_names_the_holder_and_is_released() {
        let temp = TempDir::new().expect("tempdir should create");
        let dir = temp.path().join(".pugh");

        let lock = lock_registry(&dir, "pugh-matrix", "rate").expect("lock should take");
        let path = lock_path(&dir, "pugh-matrix");
        let holder: Holder =
            serde_json::from_str(&fs::read_to_string(&path).expect("lock readable")).expect("holder json");
        assert_eq!(holder.pid, std::process::id());
        assert_eq!(holder.command, "rate");

        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn live_holder_makes_the_registry_busy() {
        let temp = TempDir::new().expect("tempdir should create");
        let _held = lock_registry(temp.path(), "pugh-matrix", "branch").expect("lock should take");

        let err = lock_registry_within(temp.path(), "pugh-matrix", "option", NO_WAIT)
            .expect_err("second writer should be refused");
        let message = err.to_string();
        assert!(message.contains("registry 'pugh-matrix' is busy"), "{message}");
        assert!(message.contains("`pugh branch`"), "{message}");
    }

    #[test]
    fn other_persist_keys_do_not_contend() {
        let temp = TempDir::new().expect("tempdir should create");
        let _main = lock_registry(temp.path(), "pugh-matrix", "rate").expect("lock should take");
        let _team = lock_registry_within(temp.path(), "team", "rate", NO_WAIT).expect("independent key");
    }

    #[cfg(unix)]
    #[test]
    fn lock_of_exited_process_is_cleared() {
        let temp = TempDir::new().expect("tempdir should create");
        let path = lock_path(temp.path(), "pugh-matrix");
        let stale = Holder {
            pid: 999_999_999,
            command: "rate".into(),
            since: Utc::now(),
        };
        fs::write(&path, serde_json::to_string(&stale).expect("holder json")).expect("lock writes");

        let lock = lock_registry_within(temp.path(), "pugh-matrix", "comment", NO_WAIT)
            .expect("stale lock should be replaced");
        let holder: Holder =
            serde_json::from_str(&fs::read_to_string(&path).expect("lock readable")).expect("holder json");
        assert_eq!(holder.pid, std::process::id());
        drop(lock);
    }

    #[test]
    fn unreadable_lock_is_reported_after_waiting() {
        let temp = TempDir::new().expect("tempdir should create");
        fs::write(lock_path(temp.path(), "pugh-matrix"), "12345").expect("lock writes");

        let err = lock_registry_within(temp.path(), "pugh-matrix", "rate", NO_WAIT)
            .expect_err("garbage lock should block");
        assert!(err.to_string().contains("not readable"));
    }

    #[test]
    fn data_dir_that_is_a_file_fails_fast() {
        let temp = TempDir::new().expect("tempdir should create");
        let blocked = temp.path().join("state");
        fs::write(&blocked, "").expect("file writes");

        let err = lock_registry_within(&blocked, "pugh-matrix", "rate", WAIT_FOR_HOLDER)
            .expect_err("cannot lock inside a file");
        assert!(err.to_string().contains("failed to create data directory"));
    }
}
