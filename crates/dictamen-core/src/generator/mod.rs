//! Generador determinista: pseudo-aleatoriedad reproducible por propósito.
//!
//! Cada `Purpose` posee una ventana disjunta de 8 bytes (16 hex) del digest
//! de 32 bytes, de modo que variar una decisión derivada no perturba otra
//! decisión derivada del mismo fingerprint. Toda derivación es función pura
//! de `(fingerprint, purpose)`: nunca lee reloj ni I/O externo.

use crate::errors::CoreError;
use crate::model::Fingerprint;

/// Propósitos de derivación registrados. Añadir uno nuevo significa asignarle
/// la siguiente ventana libre; reasignar ventanas existentes cambia salidas y
/// exige subir `GENERATOR_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Selección de categoría de decisión.
    CategorySelection,
    /// Desplazamiento del puntaje numérico acotado.
    ScoreOffset,
    /// Plazo de revisión (días hasta re-evaluar la recomendación).
    ReviewCadence,
}

impl Purpose {
    /// Índice de la ventana de 16 hex dentro del digest (0..=3).
    fn window(&self) -> usize {
        match self {
            Purpose::CategorySelection => 0,
            Purpose::ScoreOffset => 1,
            Purpose::ReviewCadence => 2,
        }
    }
}

/// Valor crudo de 64 bits de la ventana del propósito.
pub fn derive(fingerprint: &Fingerprint, purpose: Purpose) -> u64 {
    let start = purpose.window() * 16;
    let window = &fingerprint.as_hex()[start..start + 16];
    // Invariante del constructor de Fingerprint: siempre hex válido.
    u64::from_str_radix(window, 16).unwrap_or_default()
}

/// Selección categórica: `valor mod N` sobre el conjunto candidato.
/// Desempate por orden de declaración (índice menor gana). El conjunto vacío
/// es un error de derivación, no un pánico.
pub fn pick<'a, T>(
    fingerprint: &Fingerprint,
    purpose: Purpose,
    candidates: &'a [T],
) -> Result<&'a T, CoreError> {
    if candidates.is_empty() {
        return Err(CoreError::InvalidDerivation("conjunto candidato vacío".into()));
    }
    let idx = (derive(fingerprint, purpose) % candidates.len() as u64) as usize;
    Ok(&candidates[idx])
}

/// Puntaje acotado: `min + (valor mod (max - min + 1))`. El resultado cae
/// siempre dentro de `[min, max]` inclusive.
pub fn bounded_score(
    fingerprint: &Fingerprint,
    purpose: Purpose,
    min: u32,
    max: u32,
) -> Result<u32, CoreError> {
    if min > max {
        return Err(CoreError::InvalidDerivation(format!("rango invertido: [{min}, {max}]")));
    }
    let span = u64::from(max - min) + 1;
    Ok(min + (derive(fingerprint, purpose) % span) as u32)
}
