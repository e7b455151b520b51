//! Backends en disco.
//!
//! - `FileResultStore`: un documento JSON por fingerprint (nombre de archivo
//!   = digest hex) bajo el directorio de cache. Escritura vía archivo
//!   temporal + rename para no dejar entradas a medio escribir.
//! - `FileAuditLedger`: archivo JSONL append-only; una línea por entrada en
//!   orden de seq. Se indexa completo en memoria al abrir, así la
//!   verificación tras un reinicio recorre exactamente lo persistido.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use parking_lot::Mutex;

use dictamen_core::ledger::seal_draft;
use dictamen_core::store::CacheEntry;
use dictamen_core::{
    AuditDraft, AuditEntry, AuditLedger, CanonicalResult, CoreError, Fingerprint, ResultStore,
};

use crate::error::PersistenceError;

pub struct FileResultStore {
    root: PathBuf,
    retention: chrono::Duration,
}

impl FileResultStore {
    pub fn open(root: impl Into<PathBuf>, retention_days: i64) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PersistenceError::io(&root, e))?;
        Ok(Self { root, retention: chrono::Duration::days(retention_days) })
    }

    fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(format!("{}.json", fingerprint.as_hex()))
    }

    fn load_entry(&self, path: &Path) -> Result<Option<CacheEntry>, PersistenceError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::io(path, e)),
        };
        let entry = serde_json::from_str(&raw).map_err(|e| PersistenceError::CorruptRecord {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Ok(Some(entry))
    }

    fn write_entry(&self, path: &Path, entry: &CacheEntry) -> Result<(), PersistenceError> {
        let tmp = path.with_extension("json.tmp");
        let raw = serde_json::to_string(entry)?;
        fs::write(&tmp, raw).map_err(|e| PersistenceError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| PersistenceError::io(path, e))?;
        Ok(())
    }

    fn evict(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!("no se pudo expirar {}: {e}", path.display());
        } else {
            debug!("entrada expirada eliminada: {}", path.display());
        }
    }
}

impl ResultStore for FileResultStore {
    fn get(&self, fingerprint: &Fingerprint) -> Option<CanonicalResult> {
        let path = self.path_for(fingerprint);
        match self.load_entry(&path) {
            Ok(Some(entry)) if entry.is_expired(Utc::now()) => {
                self.evict(&path);
                None
            }
            Ok(Some(entry)) => Some(entry.result),
            Ok(None) => None,
            Err(e) => {
                // una entrada ilegible se trata como miss, no como fallo del flujo
                warn!("lectura de cache fallida: {e}");
                None
            }
        }
    }

    fn put(&self, result: CanonicalResult) -> Result<(), CoreError> {
        let path = self.path_for(&result.fingerprint);
        match self.load_entry(&path).map_err(CoreError::from)? {
            Some(existing) => {
                if existing.result.content_equals(&result) {
                    Ok(()) // re-put idéntico: no-op
                } else {
                    Err(CoreError::ConsistencyViolation {
                        fingerprint: result.fingerprint.as_hex().to_string(),
                    })
                }
            }
            None => {
                let entry = CacheEntry::new(result, self.retention);
                self.write_entry(&path, &entry).map_err(CoreError::from)
            }
        }
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let Ok(dir) = fs::read_dir(&self.root) else {
            return 0;
        };
        let mut removed = 0;
        for item in dir.flatten() {
            let path = item.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            match self.load_entry(&path) {
                Ok(Some(entry)) if entry.is_expired(now) => {
                    self.evict(&path);
                    removed += 1;
                }
                Ok(_) => {}
                Err(e) => warn!("sweep: entrada ilegible {}: {e}", path.display()),
            }
        }
        removed
    }
}

/// Ledger JSONL. El `Mutex` sobre el índice serializa el punto de append
/// (asignación de seq/prev_hash + escritura de la línea).
pub struct FileAuditLedger {
    path: PathBuf,
    entries: Mutex<Vec<AuditEntry>>,
}

impl FileAuditLedger {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        let mut entries = Vec::new();
        match fs::read_to_string(&path) {
            Ok(raw) => {
                for (n, line) in raw.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let entry: AuditEntry =
                        serde_json::from_str(line).map_err(|e| PersistenceError::CorruptRecord {
                            path: format!("{}:{}", path.display(), n + 1),
                            detail: e.to_string(),
                        })?;
                    entries.push(entry);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(PersistenceError::io(&path, e)),
        }
        debug!("ledger abierto con {} entradas", entries.len());
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    fn persist_line(&self, entry: &AuditEntry) -> Result<(), PersistenceError> {
        let line = serde_json::to_string(entry)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PersistenceError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| PersistenceError::io(&self.path, e))?;
        file.flush().map_err(|e| PersistenceError::io(&self.path, e))?;
        Ok(())
    }
}

impl AuditLedger for FileAuditLedger {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, CoreError> {
        let mut entries = self.entries.lock();
        let entry = seal_draft(draft, entries.last());
        self.persist_line(&entry).map_err(CoreError::from)?;
        entries.push(entry.clone());
        Ok(entry)
    }

    fn list_entries(&self, from_seq: u64, to_seq: u64) -> Result<Vec<AuditEntry>, CoreError> {
        let entries = self.entries.lock();
        Ok(entries
            .iter()
            .filter(|e| e.seq >= from_seq && e.seq <= to_seq)
            .cloned()
            .collect())
    }

    fn len(&self) -> u64 {
        self.entries.lock().len() as u64
    }
}
