//! Registro efímero de una orquestación: estadísticas por etapa, resultados
//! por condición y descriptores de las reacciones añadidas. Se produce una
//! vez por ejecución y no se persiste más allá de la respuesta.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gem_domain::{Direction, Reaction};

use crate::event::RunEvent;
use crate::gapfill::outcome::{GapfillOutcome, OutcomeDecision};

/// Etapa que aportó una reacción de reparación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairStage {
    StageA,
    StageB,
}

/// Resultado de una condición de prueba de StageA. Los fallos aquí son
/// datos, nunca excepciones: la agregación es inspeccionable por sí misma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub index: usize,
    pub label: String,
    pub passed: bool,
    pub achieved_growth: f64,
    /// Ids de las reacciones propuestas para esta condición.
    pub proposed: Vec<String>,
    /// Mensaje del ejecutor si la condición falló con error (no por
    /// infactibilidad).
    pub failure: Option<String>,
}

/// Estadísticas agregadas de una etapa.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageStats {
    pub conditions_tested: usize,
    pub conditions_passed: usize,
    pub conditions_failed: usize,
    pub reactions_added: usize,
}

/// Descriptor de una reacción añadida por la reparación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedReaction {
    pub id: String,
    pub direction: Direction,
    /// Participantes como `"<coef> <clave>"`, con signo.
    pub participants: Vec<String>,
    pub stage: RepairStage,
}

impl AddedReaction {
    pub fn from_reaction(reaction: &Reaction, stage: RepairStage) -> Self {
        AddedReaction { id: reaction.id().to_string(),
                        direction: reaction.direction(),
                        participants: reaction.participants()
                                              .iter()
                                              .map(|p| format!("{} {}", p.coefficient, p.metabolite))
                                              .collect(),
                        stage }
    }
}

/// Reporte completo de una orquestación que terminó en commit (total o
/// parcial). Las ejecuciones infactibles no producen reporte: devuelven el
/// error con el id de entrada intacto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapfillReport {
    pub run_id: Uuid,
    pub input_id: String,
    pub new_network_id: String,
    pub outcome: GapfillOutcome,
    pub gapfilling_successful: bool,
    pub warning: Option<String>,
    pub target_growth: f64,
    pub growth_rate_before: f64,
    pub growth_rate_after: f64,
    pub stage_a: StageStats,
    pub stage_b: StageStats,
    pub trials: Vec<TrialOutcome>,
    pub added_reactions: Vec<AddedReaction>,
    /// Decisión de la política de resultado, con su rationale.
    pub decision: OutcomeDecision,
}

/// Reporte más traza de eventos de la ejecución.
#[derive(Debug, Clone)]
pub struct GapfillRun {
    pub report: GapfillReport,
    pub events: Vec<RunEvent>,
}
