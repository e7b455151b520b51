//! Errores del dominio de cumplimiento.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("validación fallida: {0}")]
    Validation(String),
}
