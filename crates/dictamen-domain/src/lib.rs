//! dictamen-domain: vocabulario del dominio de cumplimiento.
//!
//! Este crate es el "proveedor de contenido" colaborador del núcleo:
//! - Define el conjunto cerrado de intenciones (`Intent`) y su tabla de
//!   orientación (lookup puro, sin ramas por substring).
//! - Define categorías de decisión (`DecisionCategory`) y niveles de riesgo
//!   (`RiskLevel`) con su orden de declaración estable.
//!
//! No conoce fingerprints, locks ni el ledger: sólo aporta payloads de
//! entrada y consume payloads de resultado.

pub mod decision;
pub mod error;
pub mod intent;

pub use decision::{DecisionCategory, RiskLevel};
pub use error::DomainError;
pub use intent::Intent;
