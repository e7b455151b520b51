//! Store de resultados canónicos: cache direccionada por fingerprint.
//!
//! Rol en el flujo:
//! - `put` es creación pura: re-put idéntico es no-op; re-put distinto para
//!   el mismo fingerprint es `ConsistencyViolation` (la guarda principal
//!   contra un cambio de código que rompa el determinismo sin subir la
//!   versión del generador).
//! - La expiración es perezosa en `get` y masiva en `sweep`; expirar nunca
//!   recomputa ni toca la historia de auditoría.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RETENTION_DAYS;
use crate::errors::CoreError;
use crate::model::{CanonicalResult, Fingerprint};

/// Entrada de cache con su ventana de retención.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub result: CanonicalResult,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(result: CanonicalResult, retention: Duration) -> Self {
        let created_at = Utc::now();
        Self { result, created_at, expires_at: created_at + retention }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Contrato del store. Un miss es `None`, nunca un error.
pub trait ResultStore: Send + Sync {
    fn get(&self, fingerprint: &Fingerprint) -> Option<CanonicalResult>;
    fn put(&self, result: CanonicalResult) -> Result<(), CoreError>;
    /// Barrido de entradas vencidas; devuelve cuántas se eliminaron.
    fn sweep(&self, now: DateTime<Utc>) -> usize;
}

/// Implementación en memoria sobre `DashMap` (lookups de fingerprints
/// distintos no se bloquean entre sí).
pub struct InMemoryResultStore {
    entries: DashMap<String, CacheEntry>,
    retention: Duration,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::with_retention_days(DEFAULT_RETENTION_DAYS)
    }

    pub fn with_retention_days(days: i64) -> Self {
        Self { entries: DashMap::new(), retention: Duration::days(days) }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore for InMemoryResultStore {
    fn get(&self, fingerprint: &Fingerprint) -> Option<CanonicalResult> {
        let key = fingerprint.as_hex();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired(Utc::now()) => true,
            Some(entry) => return Some(entry.result.clone()),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn put(&self, result: CanonicalResult) -> Result<(), CoreError> {
        use dashmap::mapref::entry::Entry;
        let key = result.fingerprint.as_hex().to_string();
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                if occupied.get().result.content_equals(&result) {
                    Ok(()) // re-put idéntico: no-op
                } else {
                    Err(CoreError::ConsistencyViolation {
                        fingerprint: result.fingerprint.as_hex().to_string(),
                    })
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(result, self.retention));
                Ok(())
            }
        }
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hash_str;
    use serde_json::json;

    fn result(seed: &str, payload: serde_json::Value) -> CanonicalResult {
        let fp = Fingerprint::parse(&hash_str(seed)).unwrap();
        CanonicalResult::new(fp, payload)
    }

    #[test]
    fn put_then_get_roundtrip() {
        let store = InMemoryResultStore::new();
        let r = result("s1", json!({"category": "disclose"}));
        store.put(r.clone()).unwrap();
        let got = store.get(&r.fingerprint).unwrap();
        assert!(got.content_equals(&r));
    }

    #[test]
    fn identical_re_put_is_noop() {
        let store = InMemoryResultStore::new();
        let r1 = result("s1", json!({"category": "disclose"}));
        let r2 = result("s1", json!({"category": "disclose"}));
        store.put(r1).unwrap();
        store.put(r2).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn differing_re_put_is_consistency_violation() {
        let store = InMemoryResultStore::new();
        let r1 = result("s1", json!({"category": "disclose"}));
        let r2 = result("s1", json!({"category": "decline"}));
        store.put(r1).unwrap();
        let err = store.put(r2).unwrap_err();
        assert!(matches!(err, CoreError::ConsistencyViolation { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn expired_entry_is_lazily_evicted() {
        let store = InMemoryResultStore::with_retention_days(0); // expira al instante
        let r = result("s1", json!({"category": "disclose"}));
        store.put(r.clone()).unwrap();
        assert!(store.get(&r.fingerprint).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_removes_only_expired() {
        let expired = InMemoryResultStore::with_retention_days(0);
        let fresh = InMemoryResultStore::new();
        expired.put(result("s1", json!({"a": 1}))).unwrap();
        fresh.put(result("s2", json!({"b": 2}))).unwrap();
        assert_eq!(expired.sweep(Utc::now()), 1);
        assert_eq!(fresh.sweep(Utc::now()), 0);
    }
}
