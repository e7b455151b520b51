//! Intenciones clasificadas y tabla de orientación.
//!
//! La clasificación ocurre ANTES del motor determinista: el núcleo nunca ve
//! texto libre, sólo la intención ya cerrada. La orientación es un lookup
//! puro por variante (sin `contains` sobre strings en el camino de decisión).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conjunto cerrado de intenciones reconocidas por el asesor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    GiftsAndHospitality,
    ConflictOfInterest,
    DataPrivacy,
    ExpenseReporting,
    /// Fallback para situaciones no catalogadas.
    General,
}

/// Tabla de frases normalizadas -> intención. Extensible sin tocar el núcleo.
static SITUATION_TABLE: Lazy<HashMap<&'static str, Intent>> = Lazy::new(|| {
    HashMap::from([
        ("vendor gift offer", Intent::GiftsAndHospitality),
        ("client dinner invitation", Intent::GiftsAndHospitality),
        ("supplier holiday basket", Intent::GiftsAndHospitality),
        ("relative in bidding process", Intent::ConflictOfInterest),
        ("board seat at partner firm", Intent::ConflictOfInterest),
        ("customer data export request", Intent::DataPrivacy),
        ("marketing list reuse", Intent::DataPrivacy),
        ("taxi receipt missing", Intent::ExpenseReporting),
        ("duplicate meal claim", Intent::ExpenseReporting),
    ])
});

impl Intent {
    /// Orden de declaración estable (usado por tests y documentación).
    pub const ALL: [Intent; 5] = [
        Intent::GiftsAndHospitality,
        Intent::ConflictOfInterest,
        Intent::DataPrivacy,
        Intent::ExpenseReporting,
        Intent::General,
    ];

    /// Clasifica una situación de texto libre contra la tabla de frases.
    /// Normaliza espacios y mayúsculas; lo no catalogado cae en `General`.
    pub fn classify(situation: &str) -> Intent {
        let normalized = situation
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        SITUATION_TABLE.get(normalized.as_str()).copied().unwrap_or(Intent::General)
    }

    /// Orientación fija por intención (lookup puro, una entrada por variante).
    pub fn guidance(&self) -> &'static str {
        match self {
            Intent::GiftsAndHospitality => {
                "Registre el ofrecimiento en el portal de regalos y consulte el umbral de valor vigente antes de aceptar."
            }
            Intent::ConflictOfInterest => {
                "Declare la relación por escrito y absténgase de participar en la decisión hasta recibir respuesta."
            }
            Intent::DataPrivacy => {
                "Verifique la base legal del tratamiento y confirme con privacidad antes de mover datos personales."
            }
            Intent::ExpenseReporting => {
                "Adjunte el comprobante disponible y marque la excepción; no presente el gasto sin documentarla."
            }
            Intent::General => {
                "Documente la situación y eleve la consulta al canal de ética para una evaluación puntual."
            }
        }
    }
}
