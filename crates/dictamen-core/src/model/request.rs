//! Solicitud de decisión.
//!
//! El `payload` es JSON genérico; el núcleo no interpreta su semántica más
//! allá del subconjunto relevante declarado en el `RequestSchema`. Una vez
//! calculado su fingerprint la solicitud se trata como inmutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Contexto de quién y cuándo; metadato de auditoría, no entra al
/// fingerprint (el día lógico relevante viaja dentro del payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub actor: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub payload: Value,
    pub context: RequestContext,
}

impl Request {
    pub fn new(payload: Value, actor: impl Into<String>) -> Self {
        Self {
            payload,
            context: RequestContext {
                request_id: Uuid::new_v4(),
                actor: actor.into(),
                received_at: Utc::now(),
            },
        }
    }
}
