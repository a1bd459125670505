//! Frontera con el motor de optimización externo.
//!
//! El orquestador trata al ejecutor como una función pura de sus entradas:
//! evaluar una (red, medio, objetivo) y reportar estado, crecimiento
//! alcanzado y, si se pidió, un conjunto de reacciones de reparación
//! propuestas. Las implementaciones concretas viven en `gem-adapters`.

pub mod control;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gem_domain::{Medium, MetabolicNetwork, Reaction};

pub use control::{CancelToken, Deadline, RunControl};

use crate::errors::CoreError;

/// Estado reportado por el solver para una evaluación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

/// Petición de evaluación de una condición.
pub struct EvaluationRequest<'a> {
    pub network: &'a MetabolicNetwork,
    pub medium: &'a Medium,
    pub target_growth: f64,
    /// Si es `true`, el ejecutor puede proponer reacciones de reparación
    /// cuando el objetivo no se alcanza (búsqueda combinatoria externa).
    pub propose_repairs: bool,
}

/// Resultado de una evaluación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub status: SolverStatus,
    pub achieved_growth: f64,
    /// Reparaciones propuestas (vacío si no se pidieron o no hacen falta).
    pub proposed: Vec<Reaction>,
    /// Distribución de flujos por reacción (solo soluciones Optimal).
    pub fluxes: IndexMap<String, f64>,
}

impl Evaluation {
    /// Evaluación infactible sin propuestas, útil para implementaciones.
    pub fn infeasible() -> Self {
        Evaluation { status: SolverStatus::Infeasible,
                     achieved_growth: 0.0,
                     proposed: Vec::new(),
                     fluxes: IndexMap::new() }
    }
}

/// Errores del ejecutor. `Cancelled`/`DeadlineExceeded` provienen del
/// `RunControl` del caller; `Engine` envuelve fallos del motor externo.
#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum ExecutorError {
    #[error("evaluation cancelled")] Cancelled,
    #[error("evaluation deadline exceeded")] DeadlineExceeded,
    #[error("engine: {0}")] Engine(String),
}

impl From<ExecutorError> for CoreError {
    fn from(e: ExecutorError) -> Self {
        match e {
            ExecutorError::Cancelled => CoreError::Cancelled("stage executor".to_string()),
            ExecutorError::DeadlineExceeded => CoreError::Timeout("stage executor".to_string()),
            ExecutorError::Engine(msg) => CoreError::Executor(msg),
        }
    }
}

/// Contrato del ejecutor de etapas. Implementaciones deben ser puras
/// respecto a la petición (sin efectos sobre red ni medio) y comprobar el
/// `RunControl` entre unidades de trabajo.
pub trait StageExecutor: Send + Sync {
    /// Nombre estable de la implementación (para trazas y reportes).
    fn name(&self) -> &str;

    /// Versión de la implementación.
    fn version(&self) -> &str {
        "0.1.0"
    }

    /// Evalúa una condición y reporta el resultado.
    fn evaluate(&self, request: &EvaluationRequest<'_>, control: &RunControl) -> Result<Evaluation, ExecutorError>;
}
