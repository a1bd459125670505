//! Orquestador de gapfilling: la máquina de estados central del sistema.
//!
//! Estados: `Idle → BaselineCheck → StageA → StageB → Verify →
//! {Committed | PartialSuccess | Infeasible}`.
//!
//! La política que gobierna todo el diseño: StageA tolera fallos por
//! condición (se registran como datos y se sigue), StageB no tolera ninguno
//! (es el objetivo real del caller), y el commit se intenta siempre que haya
//! progreso. Así una reparación "casi completa" produce avance reutilizable
//! en lugar de forzar todo-o-nada, sin perder la señal nítida de
//! infactibilidad cuando el objetivo es inalcanzable.
//!
//! El orquestador solo produce entradas nuevas en el store; jamás muta las
//! existentes. Toda derivación pasa por `deep_clone_as` + id sucesor.

use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use gem_domain::{MetabolicNetwork, Reaction};

use crate::constants::{DEFAULT_STAGE_A_CONCURRENCY, DEFAULT_TRIAL_MIN_OBJECTIVE, FLUX_EPSILON};
use crate::errors::CoreError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::executor::{EvaluationRequest, RunControl, SolverStatus, StageExecutor};
use crate::gapfill::conditions::{energy_battery, TrialCondition};
use crate::gapfill::outcome::{GapfillOutcome, OutcomeContext, OutcomePolicy};
use crate::gapfill::report::{AddedReaction, GapfillReport, GapfillRun, RepairStage, StageStats, TrialOutcome};
use crate::identity::IdGenerator;
use crate::store::{ArtifactHandle, SessionStore};

/// Comportamiento de StageB cuando StageA ya alcanza el objetivo por sí
/// solo. El material de origen no fija la intención; queda como
/// configuración explícita.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageBMode {
    /// Ejecutar StageB siempre (sesgo a verificación). Por defecto.
    AlwaysRun,
    /// Omitir StageB si la copia reparada por StageA ya cumple el objetivo.
    SkipIfStageAMeetsTarget,
}

/// Opciones de una orquestación.
#[derive(Debug, Clone, Copy)]
pub struct GapfillOptions {
    /// Workers máximos para el barrido de StageA.
    pub stage_a_concurrency: usize,
    pub stage_b_mode: StageBMode,
    /// Objetivo mínimo exigido a cada condición del barrido.
    pub trial_min_objective: f64,
}

impl Default for GapfillOptions {
    fn default() -> Self {
        GapfillOptions { stage_a_concurrency: DEFAULT_STAGE_A_CONCURRENCY,
                         stage_b_mode: StageBMode::AlwaysRun,
                         trial_min_objective: DEFAULT_TRIAL_MIN_OBJECTIVE }
    }
}

pub struct GapfillOrchestrator {
    executor: Arc<dyn StageExecutor>,
    policy: Arc<dyn OutcomePolicy>,
    options: GapfillOptions,
}

impl GapfillOrchestrator {
    pub fn new(executor: Arc<dyn StageExecutor>, policy: Arc<dyn OutcomePolicy>) -> Self {
        GapfillOrchestrator { executor, policy, options: GapfillOptions::default() }
    }

    pub fn with_options(executor: Arc<dyn StageExecutor>, policy: Arc<dyn OutcomePolicy>, options: GapfillOptions) -> Self {
        GapfillOrchestrator { executor, policy, options }
    }

    pub fn options(&self) -> GapfillOptions {
        self.options
    }

    /// Ejecuta una orquestación completa contra el store.
    ///
    /// # Errores
    /// - `Validation` / `NotFound` antes de invocar al ejecutor.
    /// - `Infeasible` si la decisión final no encuentra reparación
    ///   utilizable: el store queda sin entrada nueva y el id de entrada
    ///   viaja en el error.
    /// - `Timeout` / `Cancelled` vía el `RunControl` del caller; no se
    ///   materializa artefacto parcial.
    pub fn run(&self, store: &SessionStore, input_id: &str, medium_id: &str, target_growth: f64, control: &RunControl)
               -> Result<GapfillRun, CoreError> {
        if !(target_growth > 0.0) || !target_growth.is_finite() {
            return Err(CoreError::Validation(format!("target_growth debe ser > 0 (llegó {})", target_growth)));
        }
        let network = store.get_network(input_id)?;
        let medium = store.get_medium(medium_id)?;
        let input_fingerprint = network.fingerprint();

        let run_id = Uuid::new_v4();
        let mut events = InMemoryEventStore::default();
        events.append_kind(run_id,
                           RunEventKind::RunStarted { input_id: input_id.to_string(),
                                                      medium_id: medium_id.to_string(),
                                                      target_growth });
        control.checkpoint()?;

        // ---- BaselineCheck ------------------------------------------------
        let baseline = self.executor.evaluate(&EvaluationRequest { network: &network,
                                                                   medium: &medium,
                                                                   target_growth,
                                                                   propose_repairs: false },
                                              control)?;
        let baseline_growth = baseline.achieved_growth;
        let baseline_met = baseline_growth + FLUX_EPSILON >= target_growth;
        events.append_kind(run_id,
                           RunEventKind::BaselineEvaluated { achieved_growth: baseline_growth,
                                                             target_growth,
                                                             target_met: baseline_met });
        if baseline_met {
            // Short-circuit: sin reparaciones, pero igualmente se acuña un
            // sucesor (siempre derivar, nunca mutar).
            return self.commit(store, &network, input_id, &input_fingerprint, run_id, &mut events,
                               baseline_growth, baseline_growth, target_growth,
                               StageStats { conditions_tested: 0, conditions_passed: 0, conditions_failed: 0, reactions_added: 0 },
                               StageStats::default(), Vec::new(), Vec::new(), Vec::new());
        }

        // ---- StageA: barrido energético tolerante a fallos ----------------
        let battery = energy_battery(&medium, self.options.trial_min_objective)?;
        let trial_results = self.sweep_conditions(&network, &battery, control)?;
        control.checkpoint()?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut stage_a_set: Vec<Reaction> = Vec::new();
        let mut trials: Vec<TrialOutcome> = Vec::with_capacity(trial_results.len());
        // Fusión determinista por índice de condición, no por orden de
        // terminación de los workers.
        for (outcome, proposals) in trial_results {
            events.append_kind(run_id,
                               RunEventKind::TrialEvaluated { index: outcome.index,
                                                              label: outcome.label.clone(),
                                                              passed: outcome.passed,
                                                              achieved_growth: outcome.achieved_growth,
                                                              proposed_count: proposals.len() });
            if !outcome.passed {
                for reaction in proposals {
                    if !network.contains_reaction(reaction.id()) && seen.insert(reaction.id().to_string()) {
                        stage_a_set.push(reaction);
                    }
                }
            }
            trials.push(outcome);
        }
        let stage_a_stats = StageStats { conditions_tested: trials.len(),
                                         conditions_passed: trials.iter().filter(|t| t.passed).count(),
                                         conditions_failed: trials.iter().filter(|t| !t.passed).count(),
                                         reactions_added: stage_a_set.len() };
        events.append_kind(run_id,
                           RunEventKind::StageACompleted { conditions_tested: stage_a_stats.conditions_tested,
                                                           conditions_passed: stage_a_stats.conditions_passed,
                                                           conditions_failed: stage_a_stats.conditions_failed,
                                                           reactions_accumulated: stage_a_stats.reactions_added });

        // Copia de trabajo con las reparaciones de StageA aplicadas
        let mut working = network.deep_clone_as(&format!("{}__wip", input_id))?;
        for reaction in &stage_a_set {
            if !working.contains_reaction(reaction.id()) {
                working.add_reaction(reaction.clone())?;
            }
        }

        // ---- StageB: búsqueda dirigida, sin tolerancia --------------------
        let mut stage_b_set: Vec<Reaction> = Vec::new();
        let mut run_stage_b = true;
        if self.options.stage_b_mode == StageBMode::SkipIfStageAMeetsTarget {
            control.checkpoint()?;
            let probe = self.executor.evaluate(&EvaluationRequest { network: &working,
                                                                    medium: &medium,
                                                                    target_growth,
                                                                    propose_repairs: false },
                                               control)?;
            if probe.achieved_growth + FLUX_EPSILON >= target_growth {
                run_stage_b = false;
                events.append_kind(run_id,
                                   RunEventKind::StageBSkipped { reason: format!("StageA alcanza {} >= objetivo {}",
                                                                                 probe.achieved_growth, target_growth) });
            }
        }
        if run_stage_b {
            control.checkpoint()?;
            let stage_b = self.executor.evaluate(&EvaluationRequest { network: &working,
                                                                      medium: &medium,
                                                                      target_growth,
                                                                      propose_repairs: true },
                                                 control)?;
            events.append_kind(run_id,
                               RunEventKind::StageBCompleted { achieved_growth: stage_b.achieved_growth,
                                                               reactions_proposed: stage_b.proposed.len() });
            for reaction in stage_b.proposed {
                if !working.contains_reaction(reaction.id()) && seen.insert(reaction.id().to_string()) {
                    stage_b_set.push(reaction);
                }
            }
        }
        let stage_b_stats = StageStats { conditions_tested: usize::from(run_stage_b),
                                         conditions_passed: 0,
                                         conditions_failed: 0,
                                         reactions_added: stage_b_set.len() };

        // ---- Verify: StageA ∪ StageB sobre copia fresca de la entrada -----
        let mut verified = network.deep_clone_as(&format!("{}__verify", input_id))?;
        for reaction in stage_a_set.iter().chain(stage_b_set.iter()) {
            if !verified.contains_reaction(reaction.id()) {
                verified.add_reaction(reaction.clone())?;
            }
        }
        control.checkpoint()?;
        let verify = self.executor.evaluate(&EvaluationRequest { network: &verified,
                                                                 medium: &medium,
                                                                 target_growth,
                                                                 propose_repairs: false },
                                            control)?;
        events.append_kind(run_id,
                           RunEventKind::VerifyCompleted { achieved_growth: verify.achieved_growth,
                                                           target_growth });

        // ---- Decisión graduada -------------------------------------------
        let added: Vec<AddedReaction> = stage_a_set.iter()
                                                   .map(|r| AddedReaction::from_reaction(r, RepairStage::StageA))
                                                   .chain(stage_b_set.iter()
                                                                     .map(|r| AddedReaction::from_reaction(r, RepairStage::StageB)))
                                                   .collect();
        self.commit(store, &verified, input_id, &input_fingerprint, run_id, &mut events,
                    baseline_growth, verify.achieved_growth, target_growth,
                    stage_a_stats, stage_b_stats, trials, added,
                    stage_b_set.iter().map(|r| r.id().to_string()).collect())
    }

    /// Evalúa la batería en paralelo con un pool acotado; el orden del
    /// resultado es el de la batería (índice), no el de terminación.
    fn sweep_conditions(&self, network: &MetabolicNetwork, battery: &[TrialCondition], control: &RunControl)
                        -> Result<Vec<(TrialOutcome, Vec<Reaction>)>, CoreError> {
        let workers = self.options.stage_a_concurrency.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.min(battery.len().max(1)))
            .build()
            .map_err(|e| CoreError::Internal(format!("rayon pool: {}", e)))?;
        let results: Vec<(TrialOutcome, Vec<Reaction>)> =
            pool.install(|| battery.par_iter().map(|cond| self.evaluate_trial(network, cond, control)).collect());
        Ok(results)
    }

    /// Una condición de StageA. Cualquier fallo queda registrado en el
    /// `TrialOutcome`; esta función no devuelve error jamás (tolerancia de
    /// StageA). La cancelación se detecta aquí para cortar rápido, pero se
    /// materializa como error en el checkpoint posterior al barrido.
    fn evaluate_trial(&self, network: &MetabolicNetwork, condition: &TrialCondition, control: &RunControl)
                      -> (TrialOutcome, Vec<Reaction>) {
        if control.checkpoint().is_err() {
            return (TrialOutcome { index: condition.index,
                                   label: condition.label.clone(),
                                   passed: false,
                                   achieved_growth: 0.0,
                                   proposed: Vec::new(),
                                   failure: Some("aborted".to_string()) },
                    Vec::new());
        }
        match self.executor.evaluate(&EvaluationRequest { network,
                                                          medium: &condition.medium,
                                                          target_growth: condition.min_objective,
                                                          propose_repairs: true },
                                     control) {
            Ok(eval) => {
                let passed = eval.status == SolverStatus::Optimal
                             && eval.achieved_growth + FLUX_EPSILON >= condition.min_objective;
                let proposed_ids = eval.proposed.iter().map(|r| r.id().to_string()).collect();
                (TrialOutcome { index: condition.index,
                                label: condition.label.clone(),
                                passed,
                                achieved_growth: eval.achieved_growth,
                                proposed: proposed_ids,
                                failure: None },
                 eval.proposed)
            }
            Err(e) => (TrialOutcome { index: condition.index,
                                      label: condition.label.clone(),
                                      passed: false,
                                      achieved_growth: 0.0,
                                      proposed: Vec::new(),
                                      failure: Some(e.to_string()) },
                       Vec::new()),
        }
    }

    /// Decisión final y, si procede, registro del artefacto derivado.
    #[allow(clippy::too_many_arguments)]
    fn commit(&self, store: &SessionStore, repaired: &MetabolicNetwork,
              input_id: &str, input_fingerprint: &str, run_id: Uuid, events: &mut InMemoryEventStore,
              baseline_growth: f64, achieved_growth: f64, target_growth: f64,
              stage_a: StageStats, stage_b: StageStats, trials: Vec<TrialOutcome>,
              added: Vec<AddedReaction>, stage_b_ids: Vec<String>)
              -> Result<GapfillRun, CoreError> {
        let ctx = OutcomeContext { target_growth,
                                   achieved_growth,
                                   baseline_growth,
                                   stage_a_reactions: stage_a.reactions_added,
                                   stage_b_reactions: stage_b_ids.len(),
                                   flux_epsilon: FLUX_EPSILON };
        let decision = self.policy.decide(&ctx);

        if decision.outcome == GapfillOutcome::Infeasible {
            let reason = decision.warning
                                 .clone()
                                 .unwrap_or_else(|| "no usable repair set".to_string());
            events.append_kind(run_id, RunEventKind::RunAborted { reason: reason.clone() });
            return Err(CoreError::Infeasible { input_id: input_id.to_string(), reason });
        }

        let new_id = IdGenerator::successor_id(input_id, |id| store.contains(id))?;
        let derived = repaired.deep_clone_as(&new_id)?;
        store.put(ArtifactHandle::Network(derived))?;

        // La entrada debe seguir byte-a-byte intacta (si no fue desalojada
        // por capacidad durante este mismo run).
        if store.contains(input_id) {
            let current = store.get_network(input_id)?;
            if current.fingerprint() != input_fingerprint {
                return Err(CoreError::Internal(format!("input artifact '{}' mutated during run", input_id)));
            }
        }

        events.append_kind(run_id,
                           RunEventKind::RunCommitted { new_id: new_id.clone(),
                                                        reactions_added: added.len(),
                                                        gapfilling_successful: decision.gapfilling_successful });
        let report = GapfillReport { run_id,
                                     input_id: input_id.to_string(),
                                     new_network_id: new_id,
                                     outcome: decision.outcome,
                                     gapfilling_successful: decision.gapfilling_successful,
                                     warning: decision.warning.clone(),
                                     target_growth,
                                     growth_rate_before: baseline_growth,
                                     growth_rate_after: achieved_growth,
                                     stage_a,
                                     stage_b,
                                     trials,
                                     added_reactions: added,
                                     decision };
        let events: Vec<RunEvent> = events.list(run_id);
        Ok(GapfillRun { report, events })
    }
}
