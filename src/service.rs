//! Interfaz de entrada del servicio de decisiones.
//!
//! `DecisionService` se construye una vez al arranque con sus stores
//! inyectados por handle y orquesta el flujo completo:
//! solicitud → fingerprint → coordinador consulta el store → (hit: resultado
//! cacheado + entrada de auditoría `read`) | (miss: cómputo determinista →
//! publicar → entrada `write`) → resultado.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dictamen_core::hashing::hash_value;
use dictamen_core::{
    AuditDraft, AuditEntry, AuditKind, AuditLedger, CacheStatus, CanonicalResult,
    ComputationCoordinator, CoordinatorConfig, CoreError, Fingerprint, Fingerprinter, Request,
    RequestSchema, ResultStore, Verification, Verifier,
};

use crate::advisor::AdvicePolicy;

/// Referencia opaca que un colaborador puede entregar después a un
/// verificador externo; no expone internals del ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRef {
    pub seq: u64,
    pub entry_hash: String,
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub result: CanonicalResult,
    pub fingerprint: Fingerprint,
    pub audit_ref: AuditRef,
    pub cache_status: CacheStatus,
}

pub struct DecisionService<S: ResultStore, L: AuditLedger> {
    fingerprinter: Fingerprinter,
    policy: AdvicePolicy,
    coordinator: ComputationCoordinator<S>,
    ledger: Arc<L>,
}

/// Subconjunto relevante del payload de una solicitud de cumplimiento.
/// `date` es el día lógico del caso: entra al fingerprint normalizado a
/// fecha, así la misma consulta del mismo día comparte identidad.
fn compliance_schema() -> RequestSchema {
    RequestSchema::new(&["situation", "riskLevel", "department", "date"]).date_fields(&["date"])
}

impl<S: ResultStore, L: AuditLedger> DecisionService<S, L> {
    pub fn new(store: Arc<S>, ledger: Arc<L>, config: CoordinatorConfig) -> Self {
        Self {
            fingerprinter: Fingerprinter::new(compliance_schema()),
            policy: AdvicePolicy::new(),
            coordinator: ComputationCoordinator::new(store, config),
            ledger,
        }
    }

    /// Procesa una solicitud de principio a fin. Cada llamada deja exactamente
    /// una entrada de auditoría: `write` si este llamador publicó el cómputo,
    /// `read` si observó uno ya publicado.
    pub fn process(&self, request: &Request) -> Result<ProcessOutcome, CoreError> {
        let fingerprint = self.fingerprinter.fingerprint(request)?;

        let (result, cache_status) = self.coordinator.compute_or_wait(&fingerprint, || {
            use dictamen_core::DecisionPolicy;
            let payload = self.policy.decide(request, &fingerprint)?;
            Ok(CanonicalResult::new(fingerprint.clone(), payload))
        })?;

        let kind = match cache_status {
            CacheStatus::Miss => AuditKind::Write,
            CacheStatus::Hit => AuditKind::Read,
        };
        let entry = self.ledger.append(AuditDraft {
            kind,
            fingerprint: fingerprint.clone(),
            input_hash: hash_value(&request.payload),
            output_hash: result.output_hash.clone(),
            actor: request.context.actor.clone(),
        })?;

        Ok(ProcessOutcome {
            result,
            fingerprint,
            audit_ref: AuditRef { seq: entry.seq, entry_hash: entry.entry_hash },
            cache_status,
        })
    }

    /// Recomputación independiente contra un resultado reclamado.
    pub fn verify(
        &self,
        request: &Request,
        claimed: &CanonicalResult,
    ) -> Result<Verification, CoreError> {
        Verifier::new(&self.fingerprinter, &self.policy).verify(request, claimed)
    }

    /// Export de auditoría de sólo lectura para herramientas externas.
    pub fn audit_entries(&self, from_seq: u64, to_seq: u64) -> Result<Vec<AuditEntry>, CoreError> {
        self.ledger.list_entries(from_seq, to_seq)
    }

    pub fn verify_chain(&self, from_seq: u64, to_seq: u64) -> Result<(), CoreError> {
        self.ledger.verify_chain(from_seq, to_seq)
    }

    pub fn ledger_len(&self) -> u64 {
        self.ledger.len()
    }

    /// Barrido periódico de la cache; nunca toca la historia de auditoría.
    pub fn sweep_cache(&self) -> usize {
        self.coordinator.store().sweep(chrono::Utc::now())
    }
}
