//! Domain-partitioned state store for the Hearth kernel.
//!
//! All shared simulation state lives here, split into named domains.
//! Each domain is an independently locked JSON document with its own
//! version counter, so mutations to one domain never serialize against
//! another. Every successful mutation is snapshotted to
//! `<data_dir>/<domain>.json` with a write-temp-then-rename sequence;
//! the in-memory value stays authoritative even when the disk write
//! fails, and a failed write is retried on the next mutation of that
//! domain (with backoff, so a dead disk is not hammered forever).
//!
//! Domains are created lazily: reading an unknown domain yields an
//! empty document at version 0, never an error.

mod error;
mod merge;

pub use error::{StateError, StateResult};
pub use merge::deep_merge;

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Callback invoked after every successful mutation, with the domain
/// name and the new version.
pub type ChangeListener = Arc<dyn Fn(&str, u64) + Send + Sync>;

/// Consecutive persist failures after which retries start skipping
/// mutations (doubling the skip window each further failure, capped).
const PERSIST_BACKOFF_CAP: u32 = 5;

struct DomainSlot {
    value: Value,
    version: u64,
    /// Consecutive failed disk writes for this domain.
    persist_failures: u32,
    /// Mutations to skip before the next persist attempt.
    persist_skip: u32,
}

impl DomainSlot {
    fn empty() -> Self {
        Self {
            value: Value::Object(serde_json::Map::new()),
            version: 0,
            persist_failures: 0,
            persist_skip: 0,
        }
    }

    fn preloaded(value: Value) -> Self {
        Self {
            value,
            ..Self::empty()
        }
    }
}

/// The authoritative in-memory state store.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct StateStore {
    data_dir: PathBuf,
    domains: RwLock<HashMap<String, Arc<Mutex<DomainSlot>>>>,
    change_listener: RwLock<Option<ChangeListener>>,
    failed_writes: AtomicU64,
}

impl StateStore {
    /// Opens a store over the given data directory, creating it if
    /// missing and preloading every `*.json` file found as a domain.
    ///
    /// Unreadable or malformed files are logged and skipped; a bad
    /// snapshot never prevents the kernel from booting.
    pub fn open(data_dir: impl Into<PathBuf>) -> StateResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let mut domains = HashMap::new();
        for entry in std::fs::read_dir(&data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(domain) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match std::fs::read(&path).map_err(StateError::from).and_then(|bytes| {
                serde_json::from_slice::<Value>(&bytes).map_err(StateError::from)
            }) {
                Ok(value) => {
                    debug!(domain, "Preloaded domain snapshot");
                    domains.insert(
                        domain.to_string(),
                        Arc::new(Mutex::new(DomainSlot::preloaded(value))),
                    );
                }
                Err(e) => {
                    warn!(domain, error = %e, "Skipping unreadable domain snapshot");
                }
            }
        }

        info!(
            data_dir = %data_dir.display(),
            domains = domains.len(),
            "State store opened"
        );

        Ok(Self {
            data_dir,
            domains: RwLock::new(domains),
            change_listener: RwLock::new(None),
            failed_writes: AtomicU64::new(0),
        })
    }

    /// Installs the change listener invoked after every mutation.
    /// Replaces any previous listener.
    pub fn set_change_listener(&self, listener: impl Fn(&str, u64) + Send + Sync + 'static) {
        *write_lock(&self.change_listener) = Some(Arc::new(listener));
    }

    /// Returns the current document and version for a domain.
    ///
    /// An unknown domain is implicitly created with an empty document
    /// at version 0.
    pub fn read(&self, domain: &str) -> StateResult<(Value, u64)> {
        let slot = self.slot(domain)?;
        let guard = lock_slot(&slot);
        Ok((guard.value.clone(), guard.version))
    }

    /// Deep-merges a partial document into a domain and returns the
    /// new version.
    ///
    /// Fails with [`StateError::TypeMismatch`] (leaving the domain
    /// untouched) when the stored value is a keyed document but the
    /// partial is not.
    pub fn patch(&self, domain: &str, partial: Value) -> StateResult<u64> {
        let slot = self.slot(domain)?;
        let mut guard = lock_slot(&slot);

        if guard.value.is_object() && !partial.is_object() {
            return Err(StateError::TypeMismatch {
                domain: domain.to_string(),
            });
        }

        deep_merge(&mut guard.value, partial);
        guard.version += 1;
        let version = guard.version;
        self.persist(domain, &mut guard);
        drop(guard);

        self.notify(domain, version);
        Ok(version)
    }

    /// Replaces a domain's document wholesale and returns the new
    /// version. The only operation that can shrink a domain.
    pub fn replace(&self, domain: &str, document: Value) -> StateResult<u64> {
        let slot = self.slot(domain)?;
        let mut guard = lock_slot(&slot);

        guard.value = document;
        guard.version += 1;
        let version = guard.version;
        self.persist(domain, &mut guard);
        drop(guard);

        self.notify(domain, version);
        Ok(version)
    }

    /// Returns the names of all known domains, sorted.
    pub fn domains(&self) -> Vec<String> {
        let mut names: Vec<String> = read_lock(&self.domains).keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of failed disk writes since the store opened.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Path of the on-disk snapshot for a domain.
    pub fn snapshot_path(&self, domain: &str) -> PathBuf {
        self.data_dir.join(format!("{domain}.json"))
    }

    fn slot(&self, domain: &str) -> StateResult<Arc<Mutex<DomainSlot>>> {
        validate_domain_name(domain)?;
        if let Some(slot) = read_lock(&self.domains).get(domain) {
            return Ok(Arc::clone(slot));
        }
        let mut map = write_lock(&self.domains);
        Ok(Arc::clone(
            map.entry(domain.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(DomainSlot::empty()))),
        ))
    }

    /// Writes the domain snapshot atomically. Failure is non-fatal:
    /// it is logged and counted, and the next mutation retries (after
    /// the backoff window).
    fn persist(&self, domain: &str, slot: &mut MutexGuard<'_, DomainSlot>) {
        if slot.persist_skip > 0 {
            slot.persist_skip -= 1;
            return;
        }

        match write_snapshot(&self.snapshot_path(domain), &slot.value) {
            Ok(()) => {
                if slot.persist_failures > 0 {
                    info!(domain, "Domain persistence recovered");
                }
                slot.persist_failures = 0;
            }
            Err(e) => {
                slot.persist_failures = slot.persist_failures.saturating_add(1);
                slot.persist_skip = (1 << slot.persist_failures.min(PERSIST_BACKOFF_CAP)) - 1;
                self.failed_writes.fetch_add(1, Ordering::Relaxed);
                warn!(
                    domain,
                    failures = slot.persist_failures,
                    error = %e,
                    "Domain persistence failed; in-memory state remains authoritative"
                );
            }
        }
    }

    fn notify(&self, domain: &str, version: u64) {
        let listener = read_lock(&self.change_listener).clone();
        if let Some(listener) = listener {
            listener(domain, version);
        }
    }
}

/// Write-temp-then-rename so a reader never sees a torn file.
fn write_snapshot(path: &Path, value: &Value) -> StateResult<()> {
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn validate_domain_name(domain: &str) -> StateResult<()> {
    let escapes = domain.is_empty()
        || domain == "."
        || domain == ".."
        || domain.contains('/')
        || domain.contains('\\');
    if escapes {
        return Err(StateError::InvalidDomainName(domain.to_string()));
    }
    Ok(())
}

// Lock helpers that recover from poisoning: a panicked caller must not
// take the whole store down with it.
fn lock_slot(slot: &Mutex<DomainSlot>) -> MutexGuard<'_, DomainSlot> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
