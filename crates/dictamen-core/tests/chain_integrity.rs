//! Integridad de cadena vista desde fuera del crate: un backend propio que
//! reusa `seal_draft` hereda `verify_chain` y detecta manipulación en el
//! seq exacto.

use std::sync::Mutex;

use dictamen_core::hashing::hash_str;
use dictamen_core::ledger::{seal_draft, AuditDraft, AuditEntry, AuditKind, AuditLedger};
use dictamen_core::{CoreError, Fingerprint};

/// Backend mínimo de prueba con acceso directo a sus entradas.
struct VecLedger {
    entries: Mutex<Vec<AuditEntry>>,
}

impl VecLedger {
    fn new() -> Self {
        Self { entries: Mutex::new(Vec::new()) }
    }

    fn tamper(&self, seq: usize, f: impl FnOnce(&mut AuditEntry)) {
        f(&mut self.entries.lock().unwrap()[seq]);
    }
}

impl AuditLedger for VecLedger {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, CoreError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = seal_draft(draft, entries.last());
        entries.push(entry.clone());
        Ok(entry)
    }

    fn list_entries(&self, from_seq: u64, to_seq: u64) -> Result<Vec<AuditEntry>, CoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.seq >= from_seq && e.seq <= to_seq)
            .cloned()
            .collect())
    }

    fn len(&self) -> u64 {
        self.entries.lock().unwrap().len() as u64
    }
}

fn draft(seed: &str) -> AuditDraft {
    AuditDraft {
        kind: AuditKind::Write,
        fingerprint: Fingerprint::parse(&hash_str(seed)).unwrap(),
        input_hash: hash_str(&format!("in-{seed}")),
        output_hash: hash_str(&format!("out-{seed}")),
        actor: "auditor".into(),
    }
}

#[test]
fn custom_backend_inherits_verification() {
    let ledger = VecLedger::new();
    for i in 0..6 {
        ledger.append(draft(&format!("case-{i}"))).unwrap();
    }
    ledger.verify_chain(0, 5).unwrap();
}

#[test]
fn single_byte_mutation_fails_at_that_seq() {
    let ledger = VecLedger::new();
    for i in 0..6 {
        ledger.append(draft(&format!("case-{i}"))).unwrap();
    }
    ledger.tamper(3, |e| {
        // un solo byte del actor
        e.actor = "Auditor".into();
    });
    assert_eq!(
        ledger.verify_chain(0, 5).unwrap_err(),
        CoreError::ChainVerificationFailure { seq: 3 }
    );
}

#[test]
fn rewriting_prev_hash_cannot_hide_tampering() {
    let ledger = VecLedger::new();
    for i in 0..4 {
        ledger.append(draft(&format!("case-{i}"))).unwrap();
    }
    // el atacante ajusta entry_hash para que su propia entrada "cierre",
    // pero el enlace prev_hash de la siguiente entrada lo delata
    ledger.tamper(1, |e| {
        e.output_hash = hash_str("forged-output");
        e.entry_hash = e.recomputed_hash();
    });
    assert_eq!(
        ledger.verify_chain(0, 3).unwrap_err(),
        CoreError::ChainVerificationFailure { seq: 2 }
    );
}
