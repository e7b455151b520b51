//! Carga de configuración de almacenamiento desde variables de entorno.
//! Convención `DICTAMEN_*` con defaults razonables para desarrollo.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

use dictamen_core::constants::{DEFAULT_RETENTION_DAYS, DEFAULT_WAIT_TIMEOUT_MS};

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directorio raíz; la cache vive en `cache/` y el ledger en
    /// `audit/ledger.jsonl` debajo de él.
    pub data_dir: PathBuf,
    /// Retención de la cache de resultados, en días (el ledger no expira).
    pub cache_retention_days: i64,
    /// Timeout de espera del coordinador, en milisegundos.
    pub wait_timeout_ms: u64,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let data_dir = env::var("DICTAMEN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./dictamen-data"));
        let cache_retention_days = env::var("DICTAMEN_CACHE_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETENTION_DAYS);
        let wait_timeout_ms = env::var("DICTAMEN_WAIT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WAIT_TIMEOUT_MS);
        Self { data_dir, cache_retention_days, wait_timeout_ms }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("audit").join("ledger.jsonl")
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
