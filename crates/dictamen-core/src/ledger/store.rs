//! Trait `AuditLedger` e implementación en memoria.

use parking_lot::Mutex;

use super::types::{AuditDraft, AuditEntry};
use crate::constants::GENESIS_HASH;
use crate::errors::CoreError;

/// Almacenamiento append-only de entradas de auditoría.
///
/// El punto de append es un cuello de serialización estricto por diseño: el
/// orden de las entradas forma parte del contrato de integridad, así que la
/// asignación de `seq`/`prev_hash` ocurre bajo un único lock (o su
/// equivalente en el backend).
pub trait AuditLedger: Send + Sync {
    /// Sella un draft: asigna `seq`, `prev_hash`, `ts` y `entry_hash`, y lo
    /// agrega al final de la cadena.
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, CoreError>;

    /// Rango inclusivo `[from_seq, to_seq]` en orden ascendente. Sólo
    /// lectura: no existe camino de mutación exportado.
    fn list_entries(&self, from_seq: u64, to_seq: u64) -> Result<Vec<AuditEntry>, CoreError>;

    /// Cantidad total de entradas (el próximo seq).
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifica la cadena recomputando hashes en orden y falla rápido en el
    /// primer desajuste, reportando el `seq` ofensor. Toda entrada posterior
    /// al punto de fallo queda sin confianza hasta re-anclar la cadena.
    fn verify_chain(&self, from_seq: u64, to_seq: u64) -> Result<(), CoreError> {
        let mut prev = if from_seq == 0 {
            GENESIS_HASH.to_string()
        } else {
            let anchor_seq = from_seq - 1;
            self.list_entries(anchor_seq, anchor_seq)?
                .pop()
                .map(|e| e.entry_hash)
                .ok_or(CoreError::ChainVerificationFailure { seq: anchor_seq })?
        };
        let mut expected_seq = from_seq;
        for entry in self.list_entries(from_seq, to_seq)? {
            if entry.seq != expected_seq
                || entry.prev_hash != prev
                || entry.recomputed_hash() != entry.entry_hash
            {
                return Err(CoreError::ChainVerificationFailure { seq: entry.seq });
            }
            prev = entry.entry_hash.clone();
            expected_seq += 1;
        }
        Ok(())
    }
}

/// Ledger en memoria; el `Mutex` único materializa el punto de
/// serialización del append.
pub struct InMemoryAuditLedger {
    inner: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditLedger {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Vec::new()) }
    }
}

impl Default for InMemoryAuditLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLedger for InMemoryAuditLedger {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, CoreError> {
        let mut entries = self.inner.lock();
        let entry = seal_draft(draft, entries.last());
        entries.push(entry.clone());
        Ok(entry)
    }

    fn list_entries(&self, from_seq: u64, to_seq: u64) -> Result<Vec<AuditEntry>, CoreError> {
        let entries = self.inner.lock();
        Ok(entries
            .iter()
            .filter(|e| e.seq >= from_seq && e.seq <= to_seq)
            .cloned()
            .collect())
    }

    fn len(&self) -> u64 {
        self.inner.lock().len() as u64
    }
}

/// Sella un draft contra la última entrada conocida (o el génesis).
/// Compartido por los backends (memoria, archivo) para que todos produzcan
/// exactamente la misma cadena.
pub fn seal_draft(draft: AuditDraft, last: Option<&AuditEntry>) -> AuditEntry {
    use super::types::compute_entry_hash;
    use chrono::Utc;

    let seq = last.map(|e| e.seq + 1).unwrap_or(0);
    let prev_hash = last.map(|e| e.entry_hash.clone()).unwrap_or_else(|| GENESIS_HASH.to_string());
    let ts = Utc::now();
    let fingerprint = draft.fingerprint.as_hex().to_string();
    let entry_hash = compute_entry_hash(
        &prev_hash,
        seq,
        draft.kind,
        &fingerprint,
        &draft.input_hash,
        &draft.output_hash,
        ts,
        &draft.actor,
    );
    AuditEntry {
        seq,
        kind: draft.kind,
        fingerprint,
        input_hash: draft.input_hash,
        output_hash: draft.output_hash,
        prev_hash,
        entry_hash,
        ts,
        actor: draft.actor,
    }
}
