//! Tests de integración del orquestador sobre un ejecutor con guion.

use std::sync::Arc;

use gem_adapters::ScriptedExecutor;
use gem_core::executor::{CancelToken, Deadline, Evaluation, ExecutorError, RunControl, SolverStatus};
use gem_core::gapfill::{GapfillOptions, GapfillOrchestrator, GapfillOutcome, StageBMode};
use gem_core::store::{ArtifactHandle, SessionStore};
use gem_core::{CoreError, RunEventKind};
use gem_domain::{CompoundKey, Direction, Medium, MetabolicNetwork, Participant, Reaction, UptakeBound};
use gem_policies::GraduatedOutcomePolicy;
use indexmap::IndexMap;

fn key(raw: &str) -> CompoundKey {
    CompoundKey::parse(raw).unwrap()
}

fn target_medium() -> Medium {
    Medium::new("media_target",
                vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                     (key("cpd00007_e0"), UptakeBound::new(-10.0, 100.0).unwrap())]).unwrap()
}

fn draft_network(id: &str) -> MetabolicNetwork {
    let mut net = MetabolicNetwork::new(id).unwrap();
    net.add_reaction(Reaction::with_default_bound("rxn00148",
                                                  vec![Participant::substrate(key("cpd00027_c0"), 1.0),
                                                       Participant::product(key("cpd00020_c0"), 2.0)],
                                                  Direction::Forward).unwrap()).unwrap();
    net
}

fn repair_reaction(id: &str) -> Reaction {
    Reaction::with_default_bound(id,
                                 vec![Participant::substrate(key("cpd00020_c0"), 1.0),
                                      Participant::product(key("cpd00023_c0"), 1.0)],
                                 Direction::Forward).unwrap()
}

fn optimal(growth: f64) -> Evaluation {
    Evaluation { status: SolverStatus::Optimal,
                 achieved_growth: growth,
                 proposed: Vec::new(),
                 fluxes: IndexMap::new() }
}

fn infeasible_with(proposed: Vec<Reaction>) -> Evaluation {
    Evaluation { status: SolverStatus::Infeasible,
                 achieved_growth: 0.0,
                 proposed,
                 fluxes: IndexMap::new() }
}

fn seeded_store(network_id: &str) -> SessionStore {
    let store = SessionStore::with_defaults();
    store.put(ArtifactHandle::Network(draft_network(network_id))).unwrap();
    store.put(ArtifactHandle::Medium(target_medium())).unwrap();
    store
}

fn orchestrator(executor: ScriptedExecutor) -> GapfillOrchestrator {
    GapfillOrchestrator::new(Arc::new(executor), Arc::new(GraduatedOutcomePolicy::default()))
}

#[test]
fn test_baseline_short_circuit_still_derives() {
    // El crecimiento base ya cumple el objetivo: commit sin reacciones,
    // pero con id sucesor acuñado (siempre derivar, nunca mutar)
    let store = seeded_store("model_a.draft");
    let orch = orchestrator(ScriptedExecutor::new(optimal(0.5)));
    let run = orch.run(&store, "model_a.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap();

    assert_eq!(run.report.outcome, GapfillOutcome::Committed);
    assert!(run.report.gapfilling_successful);
    assert!(run.report.added_reactions.is_empty());
    assert_eq!(run.report.new_network_id, "model_a.draft.gf");
    assert!(store.contains("model_a.draft"));
    assert!(store.contains("model_a.draft.gf"));
    assert_eq!(run.report.stage_a.conditions_tested, 0);
}

#[test]
fn test_stage_a_failures_tolerated_stage_b_commits() {
    // Propiedad central: fallos de StageA + StageB exitoso -> Committed,
    // nunca Infeasible
    let executor = ScriptedExecutor::new(Evaluation::infeasible())
        .on_medium_fail("anaerobic", ExecutorError::Engine("solver crashed".to_string()))
        .on_medium("glucose_aerobic", optimal(0.1))
        .on_medium("__", infeasible_with(vec![repair_reaction("rxnA")]))
        .on_medium_once("media_target", false, Evaluation::infeasible())
        .on_medium_with_repairs("media_target", true, infeasible_with(vec![repair_reaction("rxnB")]))
        .on_medium_with_repairs("media_target", false, optimal(0.05));

    let store = seeded_store("model_b.draft");
    let orch = orchestrator(executor);
    let run = orch.run(&store, "model_b.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap();

    assert_eq!(run.report.outcome, GapfillOutcome::Committed);
    assert!(run.report.gapfilling_successful);
    assert_eq!(run.report.stage_a.conditions_tested, 12);
    assert_eq!(run.report.stage_a.conditions_passed, 1);
    assert_eq!(run.report.stage_a.conditions_failed, 11);
    // Los 6 trials anaerobios fallaron con error de motor, registrados como
    // datos, jamás propagados
    assert_eq!(run.report.trials.iter().filter(|t| t.failure.is_some()).count(), 6);

    // rxnA acumulada una sola vez (dedup por id), rxnB desde StageB
    let added: Vec<&str> = run.report.added_reactions.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(added, vec!["rxnA", "rxnB"]);
    assert!(run.report.growth_rate_after > run.report.growth_rate_before);

    // La red derivada contiene ambas reparaciones; la original sigue intacta
    let derived = store.get_network("model_b.draft.gf").unwrap();
    assert!(derived.contains_reaction("rxnA"));
    assert!(derived.contains_reaction("rxnB"));
    assert!(!store.get_network("model_b.draft").unwrap().contains_reaction("rxnA"));
}

#[test]
fn test_input_fingerprint_unchanged_by_run() {
    let store = seeded_store("model_fp.draft");
    let before = store.get_network("model_fp.draft").unwrap().fingerprint();
    let orch = orchestrator(ScriptedExecutor::new(optimal(0.5)));
    orch.run(&store, "model_fp.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap();
    let after = store.get_network("model_fp.draft").unwrap().fingerprint();
    assert_eq!(before, after);
}

#[test]
fn test_partial_success_commits_with_warning() {
    let executor = ScriptedExecutor::new(infeasible_with(vec![repair_reaction("rxnA")]))
        .on_medium_once("media_target", false, Evaluation::infeasible())
        .on_medium_with_repairs("media_target", true, infeasible_with(vec![repair_reaction("rxnB")]))
        .on_medium_with_repairs("media_target", false, optimal(0.004));

    let store = seeded_store("model_c.draft");
    let orch = orchestrator(executor);
    let run = orch.run(&store, "model_c.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap();

    // Progreso real pero insuficiente: commit con aviso
    assert_eq!(run.report.outcome, GapfillOutcome::PartialSuccess);
    assert!(!run.report.gapfilling_successful);
    assert!(run.report.warning.is_some());
    assert!(store.contains("model_c.draft.gf"));
}

#[test]
fn test_infeasible_preserves_input_and_stores_nothing() {
    // StageB sin conjunto utilizable y crecimiento cero: error con el id de
    // entrada, sin entrada nueva en el store
    let executor = ScriptedExecutor::new(Evaluation::infeasible());
    let store = seeded_store("model_d.draft");
    let len_before = store.len();
    let fp_before = store.get_network("model_d.draft").unwrap().fingerprint();

    let orch = orchestrator(executor);
    let err = orch.run(&store, "model_d.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap_err();

    match err {
        CoreError::Infeasible { input_id, .. } => assert_eq!(input_id, "model_d.draft"),
        other => panic!("esperaba Infeasible, llegó {:?}", other),
    }
    assert_eq!(store.len(), len_before);
    assert_eq!(store.get_network("model_d.draft").unwrap().fingerprint(), fp_before);
}

#[test]
fn test_already_gapfilled_network_gets_gf_gf() {
    let store = SessionStore::with_defaults();
    store.put(ArtifactHandle::Network(draft_network("model_e.gf"))).unwrap();
    store.put(ArtifactHandle::Medium(target_medium())).unwrap();

    let orch = orchestrator(ScriptedExecutor::new(optimal(0.5)));
    let run = orch.run(&store, "model_e.gf", "media_target", 0.01, &RunControl::unbounded()).unwrap();
    assert_eq!(run.report.new_network_id, "model_e.gf.gf");
}

#[test]
fn test_concurrent_runs_commit_independently() {
    let store = SessionStore::with_defaults();
    store.put(ArtifactHandle::Network(draft_network("model_x.draft"))).unwrap();
    store.put(ArtifactHandle::Network(draft_network("model_y.draft"))).unwrap();
    store.put(ArtifactHandle::Medium(target_medium())).unwrap();

    let orch = orchestrator(ScriptedExecutor::new(optimal(0.5)));
    std::thread::scope(|s| {
        let a = s.spawn(|| orch.run(&store, "model_x.draft", "media_target", 0.01, &RunControl::unbounded()));
        let b = s.spawn(|| orch.run(&store, "model_y.draft", "media_target", 0.01, &RunControl::unbounded()));
        let ra = a.join().unwrap().unwrap();
        let rb = b.join().unwrap().unwrap();
        assert_ne!(ra.report.new_network_id, rb.report.new_network_id);
    });
    assert!(store.contains("model_x.draft.gf"));
    assert!(store.contains("model_y.draft.gf"));
    // Ningún put interfirió con el ajeno
    assert!(store.contains("model_x.draft"));
    assert!(store.contains("model_y.draft"));
}

#[test]
fn test_cancelled_run_stores_nothing() {
    let store = seeded_store("model_f.draft");
    let cancel = CancelToken::new();
    cancel.cancel();
    let control = RunControl::new(cancel, Deadline::none());

    let orch = orchestrator(ScriptedExecutor::new(optimal(0.5)));
    let err = orch.run(&store, "model_f.draft", "media_target", 0.01, &control).unwrap_err();
    assert!(matches!(err, CoreError::Cancelled(_)));
    assert!(!store.contains("model_f.draft.gf"));
}

#[test]
fn test_skip_stage_b_when_stage_a_meets_target() {
    // Modo configurable: si la copia reparada por StageA ya cumple, StageB
    // se omite y se va directo a Verify
    let executor = ScriptedExecutor::new(infeasible_with(vec![repair_reaction("rxnA")]))
        .on_medium_once("media_target", false, Evaluation::infeasible())
        .on_medium_with_repairs("media_target", false, optimal(0.5));

    let store = seeded_store("model_g.draft");
    let options = GapfillOptions { stage_b_mode: StageBMode::SkipIfStageAMeetsTarget,
                                   ..GapfillOptions::default() };
    let orch = GapfillOrchestrator::with_options(Arc::new(executor),
                                                 Arc::new(GraduatedOutcomePolicy::default()),
                                                 options);
    let run = orch.run(&store, "model_g.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap();

    assert_eq!(run.report.outcome, GapfillOutcome::Committed);
    assert_eq!(run.report.stage_b.conditions_tested, 0);
    assert_eq!(run.report.stage_b.reactions_added, 0);
    assert!(run.events.iter().any(|e| matches!(e.kind, RunEventKind::StageBSkipped { .. })));
}

#[test]
fn test_event_trace_covers_all_stages() {
    let executor = ScriptedExecutor::new(infeasible_with(vec![repair_reaction("rxnA")]))
        .on_medium_once("media_target", false, Evaluation::infeasible())
        .on_medium_with_repairs("media_target", true, infeasible_with(vec![repair_reaction("rxnB")]))
        .on_medium_with_repairs("media_target", false, optimal(0.05));

    let store = seeded_store("model_h.draft");
    let orch = orchestrator(executor);
    let run = orch.run(&store, "model_h.draft", "media_target", 0.01, &RunControl::unbounded()).unwrap();

    let kinds: Vec<&RunEventKind> = run.events.iter().map(|e| &e.kind).collect();
    assert!(matches!(kinds.first(), Some(RunEventKind::RunStarted { .. })));
    assert!(kinds.iter().any(|k| matches!(k, RunEventKind::BaselineEvaluated { .. })));
    assert_eq!(kinds.iter().filter(|k| matches!(k, RunEventKind::TrialEvaluated { .. })).count(), 12);
    assert!(kinds.iter().any(|k| matches!(k, RunEventKind::StageACompleted { .. })));
    assert!(kinds.iter().any(|k| matches!(k, RunEventKind::StageBCompleted { .. })));
    assert!(kinds.iter().any(|k| matches!(k, RunEventKind::VerifyCompleted { .. })));
    assert!(matches!(kinds.last(), Some(RunEventKind::RunCommitted { .. })));
    // Los eventos de trial llegan fusionados por índice, no por orden de
    // terminación de los workers
    let trial_indexes: Vec<usize> = run.events
                                       .iter()
                                       .filter_map(|e| match &e.kind {
                                           RunEventKind::TrialEvaluated { index, .. } => Some(*index),
                                           _ => None,
                                       })
                                       .collect();
    assert_eq!(trial_indexes, (0..12).collect::<Vec<usize>>());
}

#[test]
fn test_validation_rejected_before_executor() {
    let store = seeded_store("model_i.draft");
    let executor = Arc::new(ScriptedExecutor::new(optimal(0.5)));
    let orch = GapfillOrchestrator::new(executor.clone(), Arc::new(GraduatedOutcomePolicy::default()));

    assert!(matches!(orch.run(&store, "model_i.draft", "media_target", 0.0, &RunControl::unbounded()),
                     Err(CoreError::Validation(_))));
    assert!(matches!(orch.run(&store, "model_i.draft", "media_target", -1.0, &RunControl::unbounded()),
                     Err(CoreError::Validation(_))));
    // Ids desconocidos: NotFound con pistas, sin invocar al ejecutor
    match orch.run(&store, "model_zzz.draft", "media_target", 0.01, &RunControl::unbounded()) {
        Err(CoreError::NotFound { hints, .. }) => assert!(hints.contains(&"model_i.draft".to_string())),
        other => panic!("esperaba NotFound, llegó {:?}", other),
    }
    assert!(executor.calls().is_empty());
}
