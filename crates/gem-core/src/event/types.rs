//! Eventos de una orquestación de gapfilling.
//!
//! Cada transición del orquestador deja un evento en la traza append-only de
//! la ejecución. La traza es la capa de observabilidad del sistema: los
//! tests y el facade la inspeccionan en lugar de parsear logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Evento con número de secuencia y timestamp, asociado a una ejecución.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub ts: DateTime<Utc>,
    pub kind: RunEventKind,
}

/// Tipos de evento emitidos por el orquestador.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    RunStarted {
        input_id: String,
        medium_id: String,
        target_growth: f64,
    },
    /// Chequeo del crecimiento base sobre la red sin modificar.
    BaselineEvaluated {
        achieved_growth: f64,
        target_growth: f64,
        target_met: bool,
    },
    /// Una condición de prueba de StageA evaluada (pase o fallo, nunca
    /// abortan la ejecución).
    TrialEvaluated {
        index: usize,
        label: String,
        passed: bool,
        achieved_growth: f64,
        proposed_count: usize,
    },
    StageACompleted {
        conditions_tested: usize,
        conditions_passed: usize,
        conditions_failed: usize,
        reactions_accumulated: usize,
    },
    /// Búsqueda dirigida de StageB sobre la copia reparada por StageA.
    StageBCompleted {
        achieved_growth: f64,
        reactions_proposed: usize,
    },
    /// StageB omitido porque StageA ya alcanzó el objetivo (modo
    /// configurable).
    StageBSkipped {
        reason: String,
    },
    VerifyCompleted {
        achieved_growth: f64,
        target_growth: f64,
    },
    /// Artefacto derivado registrado en el store.
    RunCommitted {
        new_id: String,
        reactions_added: usize,
        gapfilling_successful: bool,
    },
    /// La ejecución terminó sin commit (infactible, timeout o cancelación).
    RunAborted {
        reason: String,
    },
}
