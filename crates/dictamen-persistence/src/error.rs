//! Errores de persistencia.
//! Mapea errores de IO / serialización a variantes semánticas; hacia el
//! núcleo se degradan a `CoreError::Internal` (la semántica de dominio, como
//! `ConsistencyViolation`, se decide antes de llegar aquí).

use thiserror::Error;

use dictamen_core::CoreError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt record in {path}: {detail}")]
    CorruptRecord { path: String, detail: String },
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersistenceError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), source }
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        CoreError::Internal(err.to_string())
    }
}
