//! Persistencia en disco: las dos tiendas sobreviven reinicios de proceso
//! (instancias nuevas sobre el mismo directorio) y la verificación del
//! ledger opera sobre lo realmente persistido.

use std::fs;
use std::path::PathBuf;

use dictamen_core::hashing::{hash_str, hash_value};
use dictamen_core::{
    AuditDraft, AuditKind, AuditLedger, CanonicalResult, CoreError, Fingerprint, ResultStore,
};
use dictamen_persistence::{FileAuditLedger, FileResultStore};
use serde_json::json;

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dictamen-{label}-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn fp(seed: &str) -> Fingerprint {
    Fingerprint::parse(&hash_str(seed)).unwrap()
}

fn result(seed: &str, payload: serde_json::Value) -> CanonicalResult {
    CanonicalResult::new(fp(seed), payload)
}

#[test]
fn result_survives_process_restart() {
    let dir = scratch_dir("cache");
    let r = result("case-1", json!({"category": "disclose", "risk_score": 71}));
    {
        let store = FileResultStore::open(&dir, 30).unwrap();
        store.put(r.clone()).unwrap();
    }
    // instancia nueva sobre el mismo directorio
    let store = FileResultStore::open(&dir, 30).unwrap();
    let got = store.get(&r.fingerprint).unwrap();
    assert!(got.content_equals(&r));
    assert_eq!(got.output_hash, hash_value(&r.payload));
}

#[test]
fn differing_re_put_is_rejected_across_instances() {
    let dir = scratch_dir("cache");
    FileResultStore::open(&dir, 30).unwrap().put(result("case-1", json!({"v": 1}))).unwrap();
    let err = FileResultStore::open(&dir, 30)
        .unwrap()
        .put(result("case-1", json!({"v": 2})))
        .unwrap_err();
    assert!(matches!(err, CoreError::ConsistencyViolation { .. }));
}

#[test]
fn expired_entries_are_evicted_from_disk() {
    let dir = scratch_dir("cache");
    let store = FileResultStore::open(&dir, 0).unwrap(); // retención cero
    let r = result("case-1", json!({"v": 1}));
    store.put(r.clone()).unwrap();
    assert!(store.get(&r.fingerprint).is_none());
    // el archivo desapareció con la evicción perezosa
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn sweep_counts_removed_entries() {
    let dir = scratch_dir("cache");
    let store = FileResultStore::open(&dir, 0).unwrap();
    store.put(result("a", json!({"v": 1}))).unwrap();
    store.put(result("b", json!({"v": 2}))).unwrap();
    assert_eq!(store.sweep(chrono::Utc::now()), 2);
}

fn draft(seed: &str, actor: &str) -> AuditDraft {
    AuditDraft {
        kind: AuditKind::Write,
        fingerprint: fp(seed),
        input_hash: hash_str(&format!("in-{seed}")),
        output_hash: hash_str(&format!("out-{seed}")),
        actor: actor.into(),
    }
}

#[test]
fn ledger_chain_survives_reopen() {
    let dir = scratch_dir("ledger");
    let path = dir.join("ledger.jsonl");
    {
        let ledger = FileAuditLedger::open(&path).unwrap();
        for i in 0..5 {
            ledger.append(draft(&format!("case-{i}"), "alice")).unwrap();
        }
        ledger.verify_chain(0, 4).unwrap();
    }
    let reopened = FileAuditLedger::open(&path).unwrap();
    assert_eq!(reopened.len(), 5);
    reopened.verify_chain(0, 4).unwrap();
    // y sigue encadenando sobre la historia previa
    let e5 = reopened.append(draft("case-5", "bob")).unwrap();
    assert_eq!(e5.seq, 5);
    reopened.verify_chain(0, 5).unwrap();
}

#[test]
fn tampering_the_file_is_detected_at_that_seq() {
    let dir = scratch_dir("ledger");
    let path = dir.join("ledger.jsonl");
    {
        let ledger = FileAuditLedger::open(&path).unwrap();
        ledger.append(draft("case-0", "alice")).unwrap();
        ledger.append(draft("case-1", "alice")).unwrap();
        ledger.append(draft("case-2", "alice")).unwrap();
    }
    // edición directa del archivo: cambia el actor de la entrada 1
    let raw = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = raw.lines().map(|l| l.to_string()).collect();
    lines[1] = lines[1].replace("\"alice\"", "\"mallory\"");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let reopened = FileAuditLedger::open(&path).unwrap();
    assert_eq!(
        reopened.verify_chain(0, 2).unwrap_err(),
        CoreError::ChainVerificationFailure { seq: 1 }
    );
}

#[test]
fn ledger_and_cache_are_independent() {
    let dir = scratch_dir("both");
    let cache_dir = dir.join("cache");
    let ledger_path = dir.join("audit").join("ledger.jsonl");

    let store = FileResultStore::open(&cache_dir, 0).unwrap();
    let ledger = FileAuditLedger::open(&ledger_path).unwrap();
    let r = result("case-1", json!({"v": 1}));
    store.put(r.clone()).unwrap();
    ledger.append(draft("case-1", "alice")).unwrap();

    // expira toda la cache; el ledger sigue íntegro y verificable
    store.sweep(chrono::Utc::now());
    assert!(store.get(&r.fingerprint).is_none());
    FileAuditLedger::open(&ledger_path).unwrap().verify_chain(0, 0).unwrap();
}
