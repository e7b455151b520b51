//! Verificador independiente: recomputa y compara contra un resultado
//! reclamado.
//!
//! Re-ejecuta Fingerprinter + política de decisión desde cero y reporta QUÉ
//! divergió, para distinguir causa raíz: versión de generador distinta
//! (fingerprint diverge), almacenamiento corrupto (el hash registrado no
//! corresponde al payload registrado) o regla de derivación cambiada (campo
//! concreto diverge).

use serde_json::Value;

use crate::constants::GENERATOR_VERSION;
use crate::errors::CoreError;
use crate::fingerprint::Fingerprinter;
use crate::hashing::hash_value;
use crate::model::{CanonicalResult, Fingerprint, Request};

/// Política de decisión: el seam entre el núcleo y el dominio. Recomputa el
/// payload de una solicitud ya fingerprinted usando sólo derivaciones
/// deterministas (nada de reloj ni I/O).
pub trait DecisionPolicy: Send + Sync {
    fn decide(&self, request: &Request, fingerprint: &Fingerprint) -> Result<Value, CoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Match,
    Mismatch(MismatchDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MismatchDetail {
    /// La identidad recomputada no coincide: típicamente un cambio de
    /// versión del generador entre el registro y la verificación.
    FingerprintDiverged {
        recorded: String,
        recomputed: String,
        recorded_version: String,
        current_version: String,
    },
    /// El hash registrado no corresponde al payload registrado: corrupción
    /// de almacenamiento, no bug de determinismo.
    OutputHashDiverged { recorded: String, recomputed_from_payload: String },
    /// La recomputación produce otro valor en un campo concreto del payload.
    FieldDiverged { field: String, recorded: Value, recomputed: Value },
}

pub struct Verifier<'a, P: DecisionPolicy> {
    fingerprinter: &'a Fingerprinter,
    policy: &'a P,
}

impl<'a, P: DecisionPolicy> Verifier<'a, P> {
    pub fn new(fingerprinter: &'a Fingerprinter, policy: &'a P) -> Self {
        Self { fingerprinter, policy }
    }

    /// Contrasta `claimed` contra una recomputación limpia de la solicitud
    /// original. `Mismatch` es un resultado normal del verificador, no un
    /// error del proceso de verificación.
    pub fn verify(
        &self,
        request: &Request,
        claimed: &CanonicalResult,
    ) -> Result<Verification, CoreError> {
        let recomputed_fp = self.fingerprinter.fingerprint(request)?;
        if recomputed_fp != claimed.fingerprint {
            return Ok(Verification::Mismatch(MismatchDetail::FingerprintDiverged {
                recorded: claimed.fingerprint.as_hex().to_string(),
                recomputed: recomputed_fp.as_hex().to_string(),
                recorded_version: claimed.generator_version.clone(),
                current_version: GENERATOR_VERSION.to_string(),
            }));
        }

        let recorded_payload_hash = hash_value(&claimed.payload);
        if recorded_payload_hash != claimed.output_hash {
            return Ok(Verification::Mismatch(MismatchDetail::OutputHashDiverged {
                recorded: claimed.output_hash.clone(),
                recomputed_from_payload: recorded_payload_hash,
            }));
        }

        let recomputed_payload = self.policy.decide(request, &recomputed_fp)?;
        if hash_value(&recomputed_payload) != claimed.output_hash {
            return Ok(Verification::Mismatch(first_divergent_field(
                &claimed.payload,
                &recomputed_payload,
            )));
        }
        Ok(Verification::Match)
    }
}

/// Primer campo (en orden de clave) cuyo valor difiere entre payloads.
fn first_divergent_field(recorded: &Value, recomputed: &Value) -> MismatchDetail {
    if let (Some(a), Some(b)) = (recorded.as_object(), recomputed.as_object()) {
        let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
        keys.sort();
        keys.dedup();
        for key in keys {
            let va = a.get(key).cloned().unwrap_or(Value::Null);
            let vb = b.get(key).cloned().unwrap_or(Value::Null);
            if va != vb {
                return MismatchDetail::FieldDiverged { field: key.clone(), recorded: va, recomputed: vb };
            }
        }
    }
    // payloads no-objeto o divergencia sólo en canonicalización
    MismatchDetail::FieldDiverged {
        field: "<payload>".into(),
        recorded: recorded.clone(),
        recomputed: recomputed.clone(),
    }
}
