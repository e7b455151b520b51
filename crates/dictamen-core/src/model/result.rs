//! Resultado canónico asociado a un fingerprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::GENERATOR_VERSION;
use crate::hashing::hash_value;
use crate::model::Fingerprint;

/// Salida única y autoritativa de un fingerprint bajo una versión de
/// generador. Inmutable una vez creada: un cambio de reglas exige subir
/// `GENERATOR_VERSION` (nueva entrada), nunca mutar esta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub fingerprint: Fingerprint,
    pub payload: Value,
    /// Hash del payload canónico; identidad de contenido del resultado.
    pub output_hash: String,
    pub generated_at: DateTime<Utc>, // metadato, no participa en igualdad
    pub generator_version: String,
}

impl CanonicalResult {
    pub fn new(fingerprint: Fingerprint, payload: Value) -> Self {
        let output_hash = hash_value(&payload);
        Self {
            fingerprint,
            payload,
            output_hash,
            generated_at: Utc::now(),
            generator_version: GENERATOR_VERSION.to_string(),
        }
    }

    /// Igualdad de contenido: mismo payload canónico y misma versión.
    /// `generated_at` queda fuera (dos recomputaciones idénticas difieren
    /// sólo en el instante de creación).
    pub fn content_equals(&self, other: &CanonicalResult) -> bool {
        self.fingerprint == other.fingerprint
            && self.output_hash == other.output_hash
            && self.generator_version == other.generator_version
    }
}
