//! Tipos de entrada del ledger de auditoría.
//!
//! Rol en el flujo:
//! - Cada cómputo (write) y cada lectura de cache (read) queda registrada
//!   como una `AuditEntry` encadenada por hash a toda la historia previa.
//! - `entry_hash = hash(prev_hash ‖ campos canonicalizados)`: alterar una
//!   entrada histórica invalida esa entrada y todas las posteriores.
//! - No existe superficie de update ni delete: sólo append y lectura.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hashing::{hash_str, to_canonical_json};
use crate::model::Fingerprint;

/// Naturaleza del evento auditado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Primera computación publicada para un fingerprint.
    Write,
    /// Entrega desde cache de un resultado ya publicado.
    Read,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::Write => "write",
            AuditKind::Read => "read",
        }
    }
}

/// Campos que aporta el llamador; `seq`, `prev_hash`, `ts` y `entry_hash`
/// los asigna el ledger en el punto de serialización del append.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    pub kind: AuditKind,
    pub fingerprint: Fingerprint,
    pub input_hash: String,
    pub output_hash: String,
    pub actor: String,
}

/// Entrada inmutable de la cadena de auditoría.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub seq: u64,
    pub kind: AuditKind,
    pub fingerprint: String,
    pub input_hash: String,
    pub output_hash: String,
    pub prev_hash: String,
    pub entry_hash: String,
    pub ts: DateTime<Utc>,
    pub actor: String,
}

impl AuditEntry {
    /// Recalcula el hash de esta entrada desde sus campos almacenados.
    pub fn recomputed_hash(&self) -> String {
        compute_entry_hash(
            &self.prev_hash,
            self.seq,
            self.kind,
            &self.fingerprint,
            &self.input_hash,
            &self.output_hash,
            self.ts,
            &self.actor,
        )
    }
}

/// Hash de entrada: prev_hash concatenado con los campos en JSON canónico.
/// El timestamp se fija a RFC 3339 con nanosegundos para que la
/// recomputación tras persistir/recargar sea estable byte a byte.
#[allow(clippy::too_many_arguments)]
pub fn compute_entry_hash(
    prev_hash: &str,
    seq: u64,
    kind: AuditKind,
    fingerprint: &str,
    input_hash: &str,
    output_hash: &str,
    ts: DateTime<Utc>,
    actor: &str,
) -> String {
    let fields = json!({
        "seq": seq,
        "kind": kind.as_str(),
        "fingerprint": fingerprint,
        "input_hash": input_hash,
        "output_hash": output_hash,
        "ts": ts.to_rfc3339_opts(SecondsFormat::Nanos, true),
        "actor": actor,
    });
    hash_str(&format!("{prev_hash}{}", to_canonical_json(&fields)))
}
