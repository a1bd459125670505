//! gem-policies – Políticas de decisión de resultado del gapfilling
//!
//! Provee la implementación determinista y auditable de la decisión graduada
//! Committed / PartialSuccess / Infeasible que el orquestador aplica tras la
//! fase Verify. El desempate es una política explícita, nunca un juicio
//! implícito del ejecutor: cada decisión lleva un rationale tipado y un hash
//! canónico de parámetros para auditoría.

use serde::{Deserialize, Serialize};

use gem_core::constants::ORCHESTRATOR_VERSION;
use gem_core::gapfill::{GapfillOutcome, OutcomeContext, OutcomeDecision, OutcomePolicy};
use gem_core::hashing::{hash_str, to_canonical_json};

/// Parámetros de decisión soportados en v1.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "policy", content = "params")]
pub enum DecisionParams {
    Graduated(GraduatedParams),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GraduatedParams {
    /// Crecimiento mínimo para que un progreso parcial merezca commit.
    /// Por debajo (o igual), la ejecución se declara infactible.
    pub min_partial_growth: f64,
}

impl Default for GraduatedParams {
    fn default() -> Self {
        Self { min_partial_growth: 0.0 }
    }
}

/// Explicación tipada de la decisión.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Rationale {
    pub policy_id: String,
    pub params: DecisionParams,
    pub target_growth: f64,
    pub achieved_growth: f64,
    pub baseline_growth: f64,
    pub stage_a_reactions: usize,
    pub stage_b_reactions: usize,
    /// Regla que disparó: `target_met`, `partial_progress` o
    /// `no_usable_repair`.
    pub rule_fired: String,
}

impl Rationale {
    /// JSON canónico para auditoría/eventos.
    pub fn to_canonical_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("serialize rationale")
    }
}

/// Política graduada: objetivo cumplido -> Committed; progreso real pero
/// insuficiente -> PartialSuccess (commit con aviso); crecimiento nulo ->
/// Infeasible (sin commit).
pub struct GraduatedOutcomePolicy {
    params: GraduatedParams,
}

impl GraduatedOutcomePolicy {
    pub fn new(params: GraduatedParams) -> Self {
        Self { params }
    }
}

impl Default for GraduatedOutcomePolicy {
    fn default() -> Self {
        Self { params: GraduatedParams::default() }
    }
}

impl OutcomePolicy for GraduatedOutcomePolicy {
    fn id(&self) -> &'static str {
        "graduated_v1"
    }

    fn decide(&self, ctx: &OutcomeContext) -> OutcomeDecision {
        let params = DecisionParams::Graduated(self.params.clone());
        let target_met = ctx.achieved_growth + ctx.flux_epsilon >= ctx.target_growth;
        let partial_floor = self.params.min_partial_growth.max(ctx.flux_epsilon);

        let (outcome, successful, warning, rule) = if target_met {
            (GapfillOutcome::Committed, true, None, "target_met")
        } else if ctx.achieved_growth > partial_floor {
            (GapfillOutcome::PartialSuccess,
             false,
             Some(format!("gapfilling parcial: alcanzado {} de un objetivo {}", ctx.achieved_growth, ctx.target_growth)),
             "partial_progress")
        } else if ctx.stage_b_reactions == 0 {
            (GapfillOutcome::Infeasible,
             false,
             Some("StageB no produjo conjunto de reparación utilizable y el crecimiento sigue en cero".to_string()),
             "no_usable_repair")
        } else {
            (GapfillOutcome::Infeasible,
             false,
             Some(format!("las {} reacciones propuestas no producen crecimiento", ctx.stage_a_reactions + ctx.stage_b_reactions)),
             "no_usable_repair")
        };

        let rationale = Rationale { policy_id: self.id().to_string(),
                                    params: params.clone(),
                                    target_growth: ctx.target_growth,
                                    achieved_growth: ctx.achieved_growth,
                                    baseline_growth: ctx.baseline_growth,
                                    stage_a_reactions: ctx.stage_a_reactions,
                                    stage_b_reactions: ctx.stage_b_reactions,
                                    rule_fired: rule.to_string() };
        OutcomeDecision { outcome,
                          gapfilling_successful: successful,
                          warning,
                          policy_id: self.id().to_string(),
                          params_hash: params_hash(&params),
                          rationale: rationale.to_canonical_json() }
    }
}

/// Hash canónico de parámetros, versionado con el orquestador.
pub fn params_hash(params: &DecisionParams) -> String {
    let v = serde_json::json!({
        "orchestrator_version": ORCHESTRATOR_VERSION,
        "params": serde_json::to_value(params).expect("params serialize"),
    });
    hash_str(&to_canonical_json(&v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(target: f64, achieved: f64, stage_b: usize) -> OutcomeContext {
        OutcomeContext { target_growth: target,
                         achieved_growth: achieved,
                         baseline_growth: 0.0,
                         stage_a_reactions: 3,
                         stage_b_reactions: stage_b,
                         flux_epsilon: 1e-9 }
    }

    #[test]
    fn target_met_commits_successfully() {
        let p = GraduatedOutcomePolicy::default();
        let d = p.decide(&ctx(0.01, 0.05, 2));
        assert_eq!(d.outcome, GapfillOutcome::Committed);
        assert!(d.gapfilling_successful);
        assert!(d.warning.is_none());
        assert_eq!(d.rationale["rule_fired"], "target_met");
    }

    #[test]
    fn partial_progress_commits_with_warning() {
        let p = GraduatedOutcomePolicy::default();
        let d = p.decide(&ctx(0.01, 0.004, 2));
        assert_eq!(d.outcome, GapfillOutcome::PartialSuccess);
        assert!(!d.gapfilling_successful);
        assert!(d.warning.is_some());
    }

    #[test]
    fn zero_growth_is_infeasible_regardless_of_proposals() {
        let p = GraduatedOutcomePolicy::default();
        let empty = p.decide(&ctx(0.01, 0.0, 0));
        assert_eq!(empty.outcome, GapfillOutcome::Infeasible);
        let useless = p.decide(&ctx(0.01, 0.0, 4));
        assert_eq!(useless.outcome, GapfillOutcome::Infeasible);
        assert_ne!(empty.rationale["rule_fired"], serde_json::Value::Null);
    }

    #[test]
    fn min_partial_growth_floor_applies() {
        let p = GraduatedOutcomePolicy::new(GraduatedParams { min_partial_growth: 0.005 });
        // Progreso por debajo del suelo: infactible
        let below = p.decide(&ctx(0.01, 0.004, 2));
        assert_eq!(below.outcome, GapfillOutcome::Infeasible);
        // Por encima: parcial
        let above = p.decide(&ctx(0.01, 0.006, 2));
        assert_eq!(above.outcome, GapfillOutcome::PartialSuccess);
    }

    #[test]
    fn deterministic_decision_and_stable_params_hash() {
        let p = GraduatedOutcomePolicy::default();
        let d1 = p.decide(&ctx(0.01, 0.05, 1));
        let d2 = p.decide(&ctx(0.01, 0.05, 1));
        assert_eq!(d1.params_hash, d2.params_hash);
        assert_eq!(d1.rationale, d2.rationale);
        assert!(!d1.params_hash.is_empty());
    }
}
