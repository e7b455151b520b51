//! Fingerprinter: deriva la identidad estable de una solicitud.
//!
//! Rol en el flujo:
//! - Selecciona SOLO los campos relevantes declarados en el `RequestSchema`.
//! - Normaliza campos volátiles de fecha a granularidad de día, de modo que
//!   solicitudes del mismo día lógico para el mismo caso lógico produzcan el
//!   mismo fingerprint.
//! - Normaliza strings (espacios) y números (forma textual fija vía JSON
//!   canónico) para eliminar dependencia de orden de inserción, locale o
//!   representación flotante.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::GENERATOR_VERSION;
use crate::errors::CoreError;
use crate::hashing::{hash_str, to_canonical_json};
use crate::model::{Fingerprint, FingerprintInput, Request};

/// Declaración del subconjunto relevante del payload.
#[derive(Debug, Clone, Default)]
pub struct RequestSchema {
    required: Vec<String>,
    optional: Vec<String>,
    /// Campos con precisión sub-día que se colapsan a fecha (`YYYY-MM-DD`).
    date_fields: Vec<String>,
}

impl RequestSchema {
    pub fn new(required: &[&str]) -> Self {
        Self {
            required: required.iter().map(|s| s.to_string()).collect(),
            optional: Vec::new(),
            date_fields: Vec::new(),
        }
    }

    pub fn optional(mut self, fields: &[&str]) -> Self {
        self.optional.extend(fields.iter().map(|s| s.to_string()));
        self
    }

    pub fn date_fields(mut self, fields: &[&str]) -> Self {
        self.date_fields.extend(fields.iter().map(|s| s.to_string()));
        self
    }
}

pub struct Fingerprinter {
    schema: RequestSchema,
}

impl Fingerprinter {
    pub fn new(schema: RequestSchema) -> Self {
        Self { schema }
    }

    /// Calcula el fingerprint del subconjunto relevante de la solicitud.
    ///
    /// Invariante: mismos campos relevantes ⇒ mismo fingerprint, sin
    /// importar el orden de los campos en el payload original. Falla con
    /// `InvalidRequest` si falta un campo requerido o si el subconjunto
    /// relevante queda vacío.
    pub fn fingerprint(&self, request: &Request) -> Result<Fingerprint, CoreError> {
        let obj = request
            .payload
            .as_object()
            .ok_or_else(|| CoreError::InvalidRequest("el payload debe ser un objeto JSON".into()))?;

        let mut fields: BTreeMap<String, Value> = BTreeMap::new();
        for name in &self.schema.required {
            let value = obj.get(name).ok_or_else(|| {
                CoreError::InvalidRequest(format!("falta el campo relevante requerido `{name}`"))
            })?;
            fields.insert(name.clone(), self.normalize(name, value)?);
        }
        for name in &self.schema.optional {
            if let Some(value) = obj.get(name) {
                fields.insert(name.clone(), self.normalize(name, value)?);
            }
        }
        if fields.is_empty() {
            return Err(CoreError::InvalidRequest("ningún campo relevante presente".into()));
        }

        let input = FingerprintInput { generator_version: GENERATOR_VERSION, fields: &fields };
        let as_value = serde_json::to_value(&input)
            .map_err(|e| CoreError::Internal(format!("serialización de fingerprint: {e}")))?;
        Ok(Fingerprint::from_digest(hash_str(&to_canonical_json(&as_value))))
    }

    fn normalize(&self, name: &str, value: &Value) -> Result<Value, CoreError> {
        if self.schema.date_fields.iter().any(|f| f == name) {
            return normalize_date(name, value);
        }
        match value {
            Value::String(s) => Ok(Value::String(normalize_whitespace(s))),
            other => Ok(other.clone()),
        }
    }
}

/// Colapsa espacios repetidos y recorta extremos.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Acepta `YYYY-MM-DD` o RFC 3339 completo; siempre emite sólo la fecha.
fn normalize_date(name: &str, value: &Value) -> Result<Value, CoreError> {
    let raw = value.as_str().ok_or_else(|| {
        CoreError::InvalidRequest(format!("el campo de fecha `{name}` debe ser string"))
    })?;
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| {
            CoreError::InvalidRequest(format!("fecha inválida en `{name}`: `{raw}`"))
        })?;
    Ok(Value::String(date.format("%Y-%m-%d").to_string()))
}
