//! Categorías de decisión y niveles de riesgo.
//!
//! El orden de declaración de `DecisionCategory::ALL` es contrato: la
//! selección determinista desempata por índice (primero declarado gana),
//! así que reordenar variantes cambia resultados y exige subir la versión
//! del generador en el núcleo.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Categoría final de una recomendación de cumplimiento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    /// Puede proceder sin trámite adicional.
    Proceed,
    /// Puede proceder declarándolo en el registro correspondiente.
    Disclose,
    /// Requiere revisión del comité de ética.
    Escalate,
    /// Debe rechazarse.
    Decline,
}

impl DecisionCategory {
    /// Conjunto completo de candidatas, en orden de declaración.
    pub const ALL: &'static [DecisionCategory] = &[
        DecisionCategory::Proceed,
        DecisionCategory::Disclose,
        DecisionCategory::Escalate,
        DecisionCategory::Decline,
    ];

    /// Candidatas admisibles por nivel de riesgo. Riesgo alto nunca habilita
    /// `Proceed` directo.
    pub fn candidates_for(risk: RiskLevel) -> &'static [DecisionCategory] {
        match risk {
            RiskLevel::Low => Self::ALL,
            RiskLevel::Medium => &[
                DecisionCategory::Disclose,
                DecisionCategory::Escalate,
                DecisionCategory::Decline,
            ],
            RiskLevel::High => &[
                DecisionCategory::Disclose,
                DecisionCategory::Escalate,
                DecisionCategory::Decline,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::Proceed => "proceed",
            DecisionCategory::Disclose => "disclose",
            DecisionCategory::Escalate => "escalate",
            DecisionCategory::Decline => "decline",
        }
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nivel de riesgo declarado en la solicitud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Piso del puntaje de riesgo por nivel (escala 0..=100).
    pub fn score_floor(&self) -> u32 {
        match self {
            RiskLevel::Low => 5,
            RiskLevel::Medium => 35,
            RiskLevel::High => 65,
        }
    }

    /// Amplitud del tramo de puntaje por nivel.
    pub fn score_span(&self) -> u32 {
        30
    }
}

impl FromStr for RiskLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(DomainError::Validation(format!("nivel de riesgo desconocido: {other}"))),
        }
    }
}
