//! Política de decisión de cumplimiento.
//!
//! Toda pseudo-aleatoriedad sale del generador determinista particionado por
//! propósito; la clasificación de intención y la tabla de orientación vienen
//! del dominio. Función pura de (solicitud, fingerprint): sin reloj, sin
//! I/O, sin estado mutable.

use serde_json::{json, Value};

use dictamen_core::generator::{bounded_score, pick, Purpose};
use dictamen_core::{CoreError, DecisionPolicy, Fingerprint, Request};
use dictamen_domain::{DecisionCategory, Intent, RiskLevel};

/// Rango documentado del plazo de revisión, en días.
const REVIEW_DAYS_MIN: u32 = 7;
const REVIEW_DAYS_MAX: u32 = 30;

#[derive(Debug, Default)]
pub struct AdvicePolicy;

impl AdvicePolicy {
    pub fn new() -> Self {
        Self
    }
}

fn required_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str, CoreError> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::InvalidRequest(format!("falta el campo `{field}` o no es string")))
}

impl DecisionPolicy for AdvicePolicy {
    fn decide(&self, request: &Request, fingerprint: &Fingerprint) -> Result<Value, CoreError> {
        let situation = required_str(&request.payload, "situation")?;
        let risk: RiskLevel = required_str(&request.payload, "riskLevel")?
            .parse()
            .map_err(|e: dictamen_domain::DomainError| CoreError::InvalidRequest(e.to_string()))?;

        let intent = Intent::classify(situation);
        let category =
            pick(fingerprint, Purpose::CategorySelection, DecisionCategory::candidates_for(risk))?;

        // puntaje acotado al tramo del nivel declarado (siempre dentro de 0..=100)
        let floor = risk.score_floor();
        let risk_score =
            bounded_score(fingerprint, Purpose::ScoreOffset, floor, floor + risk.score_span())?;
        let review_in_days =
            bounded_score(fingerprint, Purpose::ReviewCadence, REVIEW_DAYS_MIN, REVIEW_DAYS_MAX)?;

        Ok(json!({
            "intent": intent,
            "category": category.as_str(),
            "risk_score": risk_score,
            "review_in_days": review_in_days,
            "guidance": intent.guidance(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictamen_core::{Fingerprinter, RequestSchema};
    use serde_json::json;

    fn fingerprint_of(request: &Request) -> Fingerprint {
        Fingerprinter::new(
            RequestSchema::new(&["situation", "riskLevel", "department", "date"])
                .date_fields(&["date"]),
        )
        .fingerprint(request)
        .unwrap()
    }

    fn request(risk: &str) -> Request {
        Request::new(
            json!({
                "situation": "vendor gift offer",
                "riskLevel": risk,
                "department": "purchasing",
                "date": "2025-09-12",
            }),
            "alice",
        )
    }

    #[test]
    fn decision_is_reproducible() {
        let policy = AdvicePolicy::new();
        let req = request("high");
        let fp = fingerprint_of(&req);
        assert_eq!(policy.decide(&req, &fp).unwrap(), policy.decide(&req, &fp).unwrap());
    }

    #[test]
    fn high_risk_never_yields_direct_proceed() {
        let policy = AdvicePolicy::new();
        let req = request("high");
        let fp = fingerprint_of(&req);
        let payload = policy.decide(&req, &fp).unwrap();
        assert_ne!(payload["category"], "proceed");
    }

    #[test]
    fn derived_values_respect_documented_bounds() {
        let policy = AdvicePolicy::new();
        for risk in ["low", "medium", "high"] {
            let req = request(risk);
            let fp = fingerprint_of(&req);
            let payload = policy.decide(&req, &fp).unwrap();
            let score = payload["risk_score"].as_u64().unwrap();
            let review = payload["review_in_days"].as_u64().unwrap();
            assert!(score <= 100);
            assert!((u64::from(REVIEW_DAYS_MIN)..=u64::from(REVIEW_DAYS_MAX)).contains(&review));
        }
    }

    #[test]
    fn unknown_risk_level_is_invalid_request() {
        let policy = AdvicePolicy::new();
        let req = request("extreme");
        let fp = Fingerprinter::new(RequestSchema::new(&["situation"]))
            .fingerprint(&req)
            .unwrap();
        assert!(matches!(policy.decide(&req, &fp), Err(CoreError::InvalidRequest(_))));
    }
}
