//! dictamen-persistence
//!
//! Implementaciones en disco de `ResultStore` y `AuditLedger`, con layouts
//! independientes: la integridad del ledger se puede verificar sin la cache
//! viva, y expirar la cache jamás toca la historia de auditoría.
//!
//! Módulos:
//! - `fs`: store de resultados (un JSON por fingerprint) y ledger JSONL
//!   append-only.
//! - `config`: carga de configuración desde `.env`.
//! - `error`: mapeo de errores de IO/serialización a variantes semánticas.

pub mod config;
pub mod error;
pub mod fs;

pub use config::{init_dotenv, StorageConfig};
pub use error::PersistenceError;
pub use fs::{FileAuditLedger, FileResultStore};
