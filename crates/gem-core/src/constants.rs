//! Constantes del motor de gapfilling.
//!
//! Este módulo agrupa valores estáticos compartidos entre el generador de
//! identidades, el store de sesión y el orquestador. Cambios aquí afectan la
//! reproducibilidad de los hashes de parámetros (por diseño,
//! `ORCHESTRATOR_VERSION` participa en ellos).

/// Versión lógica del orquestador. Participa en los hashes de parámetros de
/// las políticas de resultado para que un cambio de versión invalide
/// comparaciones entre ejecuciones incompatibles. Mantener estable mientras
/// no haya cambios de semántica.
pub const ORCHESTRATOR_VERSION: &str = "GF1.0";

/// Reintentos máximos del generador de ids aleatorios antes de rendirse con
/// `StorageCollision` (colisión astronómicamente improbable en la práctica).
pub const MAX_ID_GENERATION_RETRIES: u32 = 10;

/// Longitud del componente aleatorio de los ids base.
pub const RANDOM_ID_LEN: usize = 6;

/// Capacidad por defecto del store de sesión (entradas).
pub const DEFAULT_STORE_CAPACITY: usize = 100;

/// Límite por defecto de workers para el barrido de condiciones de StageA.
pub const DEFAULT_STAGE_A_CONCURRENCY: usize = 8;

/// Objetivo mínimo exigido a cada condición de prueba del barrido energético.
pub const DEFAULT_TRIAL_MIN_OBJECTIVE: f64 = 1e-3;

/// Umbral bajo el cual un flujo o crecimiento se considera cero.
pub const FLUX_EPSILON: f64 = 1e-9;
