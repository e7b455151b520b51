//! dictamen-core: cache de cómputo determinista, at-most-once y auditada.
//!
//! Componentes, de hoja a raíz:
//! - `fingerprint`: identidad estable del subconjunto relevante de una
//!   solicitud.
//! - `generator`: pseudo-aleatoriedad reproducible particionada por
//!   propósito.
//! - `store`: cache direccionada por fingerprint, creación pura con guarda
//!   de consistencia.
//! - `coordinator`: a lo sumo una computación en vuelo por fingerprint.
//! - `ledger`: registro append-only encadenado por hash.
//! - `verifier`: recomputación independiente contra resultados reclamados.
//!
//! Los componentes se construyen una vez al arranque del proceso y se pasan
//! por handle (nada de estado global ambiente).

pub mod constants;
pub mod coordinator;
pub mod errors;
pub mod fingerprint;
pub mod generator;
pub mod hashing;
pub mod ledger;
pub mod model;
pub mod store;
pub mod verifier;

pub use coordinator::{CacheStatus, ComputationCoordinator, CoordinatorConfig};
pub use errors::CoreError;
pub use fingerprint::{Fingerprinter, RequestSchema};
pub use generator::{bounded_score, derive, pick, Purpose};
pub use ledger::{AuditDraft, AuditEntry, AuditKind, AuditLedger, InMemoryAuditLedger};
pub use model::{CanonicalResult, Fingerprint, Request, RequestContext};
pub use store::{InMemoryResultStore, ResultStore};
pub use verifier::{DecisionPolicy, MismatchDetail, Verification, Verifier};
