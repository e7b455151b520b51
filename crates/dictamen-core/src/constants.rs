//! Constantes del núcleo.
//!
//! Este módulo agrupa valores estáticos que participan en el cálculo de
//! fingerprints y en la compatibilidad entre versiones del generador.
//! Cambios aquí alteran la identidad de cache de toda solicitud nueva.

/// Versión lógica del generador determinista. Forma parte del input del
/// fingerprint: subir la versión crea entradas de cache nuevas en lugar de
/// mutar resultados ya publicados. Mantener estable mientras las reglas de
/// derivación no cambien de forma incompatible.
pub const GENERATOR_VERSION: &str = "D1.0";

/// Hash ancla de la cadena de auditoría (entrada previa inexistente).
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Horizonte de retención por defecto del store de resultados, en días.
/// El ledger de auditoría no expira (retención independiente, ver DESIGN.md).
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Tiempo máximo de espera por defecto sobre un cómputo en vuelo, en ms.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;
