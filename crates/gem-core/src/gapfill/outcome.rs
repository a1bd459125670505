//! Contrato de la decisión de resultado de una orquestación.
//!
//! La decisión graduada (Committed / PartialSuccess / Infeasible) es una
//! política explícita del orquestador, no un juicio implícito del ejecutor.
//! El trait vive en el core; la implementación determinista y auditable vive
//! en `gem-policies`.

use serde::{Deserialize, Serialize};

/// Resultado graduado de una orquestación de gapfilling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapfillOutcome {
    /// El objetivo se alcanzó; artefacto derivado registrado.
    Committed,
    /// Hubo progreso real pero el objetivo no se alcanzó; se registra de
    /// todos modos (la reparación es reutilizable) con aviso.
    PartialSuccess,
    /// Sin reparación utilizable; no se registra nada.
    Infeasible,
}

/// Datos sobre los que se decide el resultado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeContext {
    pub target_growth: f64,
    /// Crecimiento de la fase Verify (o el base, en el short-circuit).
    pub achieved_growth: f64,
    pub baseline_growth: f64,
    pub stage_a_reactions: usize,
    pub stage_b_reactions: usize,
    /// Umbral bajo el cual un crecimiento se considera cero.
    pub flux_epsilon: f64,
}

/// Decisión tipada, con rationale serializado en JSON neutral para que el
/// core no dependa de la forma interna de cada política.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeDecision {
    pub outcome: GapfillOutcome,
    pub gapfilling_successful: bool,
    pub warning: Option<String>,
    /// Id estático de la política que decidió.
    pub policy_id: String,
    /// Hash canónico de los parámetros de la política.
    pub params_hash: String,
    pub rationale: serde_json::Value,
}

/// Políticas de decisión de resultado deterministas.
pub trait OutcomePolicy: Send + Sync {
    fn id(&self) -> &'static str;
    fn decide(&self, ctx: &OutcomeContext) -> OutcomeDecision;
}
