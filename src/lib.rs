//! Dictamen
//!
//! Fachada de servicio sobre `dictamen-core`:
//! - `advisor`: la política de decisión que une el generador determinista
//!   con el vocabulario de cumplimiento de `dictamen-domain`.
//! - `service`: la interfaz de entrada (procesar solicitud, exportar
//!   auditoría, verificar) que consumen los colaboradores externos. Éstos
//!   sólo ven el Result final y una referencia opaca de auditoría; nunca
//!   fingerprints, locks ni internals del ledger.

pub mod advisor;
pub mod service;

pub use advisor::AdvicePolicy;
pub use service::{AuditRef, DecisionService, ProcessOutcome};

pub use dictamen_core::{
    CacheStatus, CanonicalResult, CoordinatorConfig, CoreError, Request, Verification,
};
