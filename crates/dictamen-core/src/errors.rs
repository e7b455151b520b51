//! Errores del núcleo.
//!
//! Política de propagación:
//! - `InvalidRequest` y `Busy` son recuperables: el llamador corrige la
//!   entrada o reintenta más tarde.
//! - `ConsistencyViolation` y `ChainVerificationFailure` son fatales: nunca
//!   se auto-resuelven; deben llegar a una alerta visible para el operador.
//! - Un miss de cache NO es error: se modela como valor normal (`Option` /
//!   `CacheStatus::Miss`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreError {
    /// Falta un campo relevante requerido o la solicitud está malformada.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// El resultado almacenado difiere del recomputado para el mismo
    /// fingerprint y versión: bug de determinismo, nunca se sobreescribe.
    #[error("consistency violation for fingerprint {fingerprint}")]
    ConsistencyViolation { fingerprint: String },
    /// Espera agotada sobre un cómputo en vuelo del mismo fingerprint.
    #[error("computation in flight: wait timed out")]
    Busy,
    /// La cadena de auditoría no verifica a partir de `seq`; toda entrada
    /// posterior queda sin confianza hasta investigación manual.
    #[error("audit chain verification failed at seq {seq}")]
    ChainVerificationFailure { seq: u64 },
    /// Parámetros de derivación inválidos (conjunto vacío, rango invertido).
    #[error("invalid derivation: {0}")]
    InvalidDerivation(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` si el llamador puede reintentar o corregir sin intervención
    /// del operador.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::InvalidRequest(_) | CoreError::Busy)
    }
}
