// rust-dilithium/src/audit.rs

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, VecDeque},
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::sampler;

/// One security-relevant event, immutable once appended.
///
/// `hash` chains the event to its predecessor:
/// hash = SHA3-256(previous_hash || canonical_json(event_without_hash)),
/// with canonical meaning sorted keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEvent {
    pub timestamp: f64,
    pub event_type: String,
    pub actor_id: String,
    pub action: String,
    pub status: String,
    pub details: BTreeMap<String, String>,
    pub hash: String,
}

struct ChainState {
    events: VecDeque<AuditEvent>,
    previous_hash: String,
}

/// Tamper-evident audit log: a bounded in-memory ring buffer of hash-chained
/// events.
///
/// `previous_hash` is chain-wide and only moves forward, while the buffer
/// holds at most `capacity` events. Consequence: [`Self::verify_chain`]
/// replays from the empty seed and therefore only vouches for a chain whose
/// genesis event is still retained — once eviction has started, it reports
/// false. That asymmetry is part of the contract, not an oversight.
///
/// One lock serializes appends with the hash advance; readers take the same
/// lock and work on snapshots, so no caller ever observes a half-appended
/// entry.
pub struct AuditChain {
    inner: Mutex<ChainState>,
    capacity: usize,
}

/// Default retention window.
pub const DEFAULT_CAPACITY: usize = 1000;

impl AuditChain {
    pub fn new(capacity: usize) -> Self {
        AuditChain {
            inner: Mutex::new(ChainState {
                events: VecDeque::new(),
                previous_hash: String::new(),
            }),
            capacity,
        }
    }

    /// Rebuilds a chain from previously persisted events, e.g. a reloaded
    /// JSONL file. Input larger than the window is trimmed to its newest
    /// `capacity` events. The stored hashes are taken as-is; run
    /// [`Self::verify_chain`] afterwards to check them.
    pub fn from_events(events: Vec<AuditEvent>, capacity: usize) -> Self {
        let previous_hash = events.last().map(|e| e.hash.clone()).unwrap_or_default();
        let mut events: VecDeque<AuditEvent> = events.into();
        while events.len() > capacity {
            events.pop_front();
        }
        AuditChain {
            inner: Mutex::new(ChainState {
                events,
                previous_hash,
            }),
            capacity,
        }
    }

    /// Appends an event, computing its chained hash and evicting the oldest
    /// entry once the window is full. Returns the stored event.
    pub fn record(
        &self,
        event_type: &str,
        actor_id: &str,
        action: &str,
        status: &str,
        details: BTreeMap<String, String>,
    ) -> AuditEvent {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        let mut event = AuditEvent {
            timestamp,
            event_type: event_type.to_string(),
            actor_id: actor_id.to_string(),
            action: action.to_string(),
            status: status.to_string(),
            details,
            hash: String::new(),
        };

        let mut state = lock_state(&self.inner);
        event.hash = chained_hash(&state.previous_hash, &event);
        state.previous_hash = event.hash.clone();
        // the window never holds more than `capacity` events, even if the
        // chain was rebuilt over-capacity; capacity 0 retains nothing
        while state.events.len() >= self.capacity.max(1) {
            state.events.pop_front();
        }
        if self.capacity > 0 {
            state.events.push_back(event.clone());
        }
        tracing::debug!(
            event_type,
            actor_id,
            status,
            retained = state.events.len(),
            "audit event recorded"
        );
        event
    }

    /// Snapshot of all retained events in insertion order.
    pub fn events(&self) -> Vec<AuditEvent> {
        let state = lock_state(&self.inner);
        state.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock_state(&self.inner).events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replays the retained events from the empty previous-hash seed,
    /// recomputing every hash. False on the first mismatch.
    ///
    /// See the type-level caveat: after eviction the retained head no longer
    /// chains from the empty seed, so this returns false even without
    /// tampering.
    pub fn verify_chain(&self) -> bool {
        let events = self.events();
        let mut previous = String::new();
        for (index, event) in events.iter().enumerate() {
            let expected = chained_hash(&previous, event);
            if expected != event.hash {
                tracing::warn!(index, "audit chain hash mismatch");
                return false;
            }
            previous = event.hash.clone();
        }
        true
    }
}

/// Takes the chain lock, recovering from poisoning: state mutations happen
/// only under the lock and are complete before it is released, so the data
/// is consistent even if some other holder panicked.
fn lock_state(inner: &Mutex<ChainState>) -> std::sync::MutexGuard<'_, ChainState> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Canonical JSON of the event without its hash field: sorted keys, no
/// whitespace. serde_json object maps are BTreeMap-backed, which gives the
/// key ordering for free.
fn canonical_without_hash(event: &AuditEvent) -> String {
    serde_json::json!({
        "timestamp": event.timestamp,
        "event_type": event.event_type,
        "actor_id": event.actor_id,
        "action": event.action,
        "status": event.status,
        "details": event.details,
    })
    .to_string()
}

fn chained_hash(previous_hash: &str, event: &AuditEvent) -> String {
    let canonical = canonical_without_hash(event);
    hex::encode(sampler::sha3_256(&[
        previous_hash.as_bytes(),
        canonical.as_bytes(),
    ]))
}

/// Append-only JSONL sink for audit events: one canonical JSON object,
/// chained hash included, per line. The chain itself stays in memory; this
/// writer is how peripheral layers persist it.
pub struct AuditLogWriter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl AuditLogWriter {
    /// Appends to `path`, creating parent directories as needed.
    pub fn to_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path_ref)?;
        Ok(Self {
            writer: Mutex::new(Box::new(file)),
        })
    }

    /// Wrap any writer (useful for tests).
    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Append one event as a JSON line.
    pub fn record(&self, event: &AuditEvent) -> io::Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        serde_json::to_writer(&mut *guard, event)?;
        guard.write_all(b"\n")?;
        guard.flush()?;
        Ok(())
    }
}
