//! Errores del core (taxonomía completa del ciclo de vida modelo/medio).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum CoreError {
    /// Entrada rechazada antes de tocar store o ejecutor.
    #[error("validation: {0}")]
    Validation(String),

    /// Identificador desconocido; `hints` lista alternativas válidas.
    #[error("artifact '{id}' not found")]
    NotFound { id: String, hints: Vec<String> },

    /// El id ya existe en el store (los callers deben pasar por el generador).
    #[error("duplicate id '{0}' in session store")]
    DuplicateId(String),

    /// El generador aleatorio agotó sus reintentos.
    #[error("id generation collided {attempts} times")]
    StorageCollision { attempts: u32 },

    /// El id no lleva un sufijo de estado de versión reconocible.
    #[error("unrecognized identifier format '{0}'")]
    InvalidIdentifierFormat(String),

    /// StageB/Verify no encontró reparación utilizable; el artefacto de
    /// entrada se preserva intacto y su id viaja en el error.
    #[error("gapfilling infeasible for '{input_id}': {reason}")]
    Infeasible { input_id: String, reason: String },

    /// El motor externo agotó su presupuesto de tiempo; no se materializa
    /// ningún artefacto parcial.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Ejecución abortada por el token de cancelación del caller.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Fallo del ejecutor externo fuera de StageA (donde se tolera).
    #[error("executor: {0}")]
    Executor(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<gem_domain::DomainError> for CoreError {
    fn from(e: gem_domain::DomainError) -> Self {
        CoreError::Validation(e.to_string())
    }
}
