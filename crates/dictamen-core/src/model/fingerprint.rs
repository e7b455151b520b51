//! Identidad estable de una solicitud.
//!
//! `FingerprintInput` agrupa los insumos previos a canonicalizar; NO es el
//! fingerprint final (hash hex) sino el modelo que se serializa de forma
//! canónica antes de hashear.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::CoreError;

/// Digest de 256 bits en hex minúscula (64 chars). Invariante del
/// constructor: siempre hex válido, lo que permite extraer ventanas
/// numéricas sin fallo (ver `generator`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    hex: String,
}

impl Fingerprint {
    /// Construcción interna desde un digest ya hexeado por `hashing`.
    pub(crate) fn from_digest(hex: String) -> Self {
        debug_assert!(hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()));
        Self { hex }
    }

    /// Parseo validado para fingerprints que llegan de fuera del proceso
    /// (estado persistido, herramientas de verificación).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.len() != 64 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CoreError::InvalidRequest(format!(
                "fingerprint malformado: se esperaban 64 hex minúscula, llegó `{s}`"
            )));
        }
        Ok(Self { hex: s.to_string() })
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Fingerprint::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Insumos del fingerprint: versión del generador + subconjunto relevante ya
/// normalizado (claves ordenadas por el BTreeMap).
#[derive(Serialize)]
pub struct FingerprintInput<'a> {
    pub generator_version: &'a str,
    pub fields: &'a BTreeMap<String, Value>,
}
