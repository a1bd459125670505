//! Integración adaptadores ↔ core: una orquestación completa sobre el
//! ejecutor heurístico y el pool universal, sin pasar por el facade.

use std::sync::Arc;

use gem_adapters::{core_universal_pool, HeuristicExecutor};
use gem_core::executor::RunControl;
use gem_core::gapfill::{GapfillOrchestrator, GapfillOutcome};
use gem_core::store::{ArtifactHandle, SessionStore};
use gem_core::RunEventKind;
use gem_domain::{CompoundKey, Direction, Medium, MetabolicNetwork, Participant, Reaction, UptakeBound};
use gem_policies::GraduatedOutcomePolicy;

fn key(raw: &str) -> CompoundKey {
    CompoundKey::parse(raw).unwrap()
}

/// Draft con glucólisis pero sin ruta de glutamato: crecimiento base cero.
fn gapped_draft(id: &str) -> MetabolicNetwork {
    let mut net = MetabolicNetwork::new(id).unwrap();
    net.add_reaction(Reaction::with_default_bound("rxn05155",
                                                  vec![Participant::substrate(key("cpd00027_e0"), 1.0),
                                                       Participant::product(key("cpd00027_c0"), 1.0)],
                                                  Direction::Bidirectional).unwrap()).unwrap();
    net.add_reaction(Reaction::with_default_bound("rxn00148",
                                                  vec![Participant::substrate(key("cpd00027_c0"), 1.0),
                                                       Participant::product(key("cpd00020_c0"), 2.0),
                                                       Participant::product(key("cpd00002_c0"), 2.0)],
                                                  Direction::Forward).unwrap()).unwrap();
    net.add_reaction(Reaction::with_default_bound("bio1",
                                                  vec![Participant::substrate(key("cpd00002_c0"), 1.0),
                                                       Participant::substrate(key("cpd00020_c0"), 1.0),
                                                       Participant::substrate(key("cpd00023_c0"), 1.0),
                                                       Participant::product(key("cpd11416_c0"), 1.0)],
                                                  Direction::Forward).unwrap()).unwrap();
    net.set_objective("bio1").unwrap();
    net
}

fn glucose_medium() -> Medium {
    Medium::new("media_glc_min",
                vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                     (key("cpd00007_e0"), UptakeBound::new(-10.0, 100.0).unwrap()),
                     (key("cpd00013_e0"), UptakeBound::new(-10.0, 100.0).unwrap()),
                     (key("cpd00001_e0"), UptakeBound::new(-100.0, 100.0).unwrap())]).unwrap()
}

#[test]
fn orchestrated_run_over_heuristic_executor_commits() {
    let store = SessionStore::with_defaults();
    store.put(ArtifactHandle::Network(gapped_draft("model_int.draft"))).unwrap();
    store.put(ArtifactHandle::Medium(glucose_medium())).unwrap();

    let orchestrator = GapfillOrchestrator::new(Arc::new(HeuristicExecutor::new(core_universal_pool().unwrap())),
                                                Arc::new(GraduatedOutcomePolicy::default()));
    let run = orchestrator.run(&store, "model_int.draft", "media_glc_min", 0.01, &RunControl::unbounded())
                          .unwrap();

    assert_eq!(run.report.outcome, GapfillOutcome::Committed);
    assert_eq!(run.report.growth_rate_before, 0.0);
    assert!(run.report.growth_rate_after >= 0.01);
    assert!(run.report.new_network_id.ends_with(".draft.gf"));

    // La ruta de glutamato faltante llegó desde el pool universal
    let derived = store.get_network(&run.report.new_network_id).unwrap();
    assert!(derived.contains_reaction("rxn00184"));
    assert!(derived.contains_reaction("rxn05466"));

    // El barrido energético corrió completo y quedó trazado
    assert_eq!(run.report.stage_a.conditions_tested, 12);
    assert!(run.events.iter().any(|e| matches!(e.kind, RunEventKind::StageACompleted { .. })));
    assert!(matches!(run.events.last().map(|e| &e.kind), Some(RunEventKind::RunCommitted { .. })));
}

#[test]
fn orchestrated_run_without_nitrogen_is_infeasible() {
    let store = SessionStore::with_defaults();
    store.put(ArtifactHandle::Network(gapped_draft("model_n.draft"))).unwrap();
    let medium = Medium::new("media_sin_n",
                             vec![(key("cpd00027_e0"), UptakeBound::new(-5.0, 100.0).unwrap()),
                                  (key("cpd00007_e0"), UptakeBound::new(-10.0, 100.0).unwrap())]).unwrap();
    store.put(ArtifactHandle::Medium(medium)).unwrap();

    let orchestrator = GapfillOrchestrator::new(Arc::new(HeuristicExecutor::new(core_universal_pool().unwrap())),
                                                Arc::new(GraduatedOutcomePolicy::default()));
    let err = orchestrator.run(&store, "model_n.draft", "media_sin_n", 0.01, &RunControl::unbounded())
                          .unwrap_err();
    assert!(matches!(err, gem_core::CoreError::Infeasible { .. }));
    assert_eq!(store.len(), 2);
}
