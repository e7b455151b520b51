//! Ledger de auditoría: definiciones de entrada y trait `AuditLedger`.

mod store;
mod types;

pub use store::{seal_draft, AuditLedger, InMemoryAuditLedger};
pub use types::{compute_entry_hash, AuditDraft, AuditEntry, AuditKind};
