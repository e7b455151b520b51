//! Demo del flujo completo sobre stores en memoria: miss, hit, export de
//! auditoría y verificación de cadena.

use std::sync::Arc;

use dictamen_core::{CoordinatorConfig, InMemoryAuditLedger, InMemoryResultStore, Request};
use dictamen_rust::DecisionService;
use serde_json::json;

fn main() {
    let service = DecisionService::new(
        Arc::new(InMemoryResultStore::new()),
        Arc::new(InMemoryAuditLedger::new()),
        CoordinatorConfig::default(),
    );

    let payload = json!({
        "situation": "vendor gift offer",
        "riskLevel": "high",
        "department": "purchasing",
        "date": "2025-09-12",
    });

    let first = service
        .process(&Request::new(payload.clone(), "demo"))
        .expect("primera solicitud");
    println!(
        "primera llamada: {:?} fingerprint={} seq={}",
        first.cache_status,
        first.fingerprint,
        first.audit_ref.seq
    );
    println!("payload: {}", first.result.payload);

    let second = service
        .process(&Request::new(payload, "demo"))
        .expect("segunda solicitud");
    println!(
        "segunda llamada: {:?} (mismo resultado: {})",
        second.cache_status,
        second.result.content_equals(&first.result)
    );

    let entries = service.audit_entries(0, service.ledger_len()).expect("export");
    for e in &entries {
        println!("auditoría seq={} kind={} hash={}", e.seq, e.kind.as_str(), &e.entry_hash[..12]);
    }
    match service.verify_chain(0, service.ledger_len().saturating_sub(1)) {
        Ok(()) => println!("cadena de auditoría íntegra"),
        Err(e) => eprintln!("cadena comprometida: {e}"),
    }
}
