//! Binario de demostración: recorre el ciclo de vida completo
//! medio -> red draft -> gapfilling -> análisis, imprimiendo el resultado
//! graduado de cada operación.

use std::sync::Arc;

use gem_adapters::{core_universal_pool, HeuristicExecutor};
use gem_core::identity::ArtifactKind;
use gem_core::store::SessionStore;

use gemflow_rust::config::CONFIG;
use gemflow_rust::providers::reference::EmbeddedReferenceProvider;
use gemflow_rust::providers::template::{CoreTemplateProvider, GenomeSource};
use gemflow_rust::workflow::{CompoundBoundSpec, GapfillCallOptions, MediumSpec, WorkflowService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== GemFlow: ciclo de vida modelo/medio ===\n");

    let store = Arc::new(SessionStore::new(CONFIG.store.to_store_config())?);
    let executor = Arc::new(HeuristicExecutor::new(core_universal_pool()?));
    let mut service = WorkflowService::new(store, executor, Box::new(EmbeddedReferenceProvider::new()))
        .with_gapfill_options(CONFIG.gapfill.to_gapfill_options())
        .with_timeouts(CONFIG.gapfill.gapfill_timeout(), CONFIG.gapfill.analyze_timeout());
    service.register_template_provider(Box::new(CoreTemplateProvider::new()));

    // 1. Medio mínimo de glucosa (aerobio, con amonio)
    let medium_id = service.create_medium(MediumSpec { compounds: vec![CompoundBoundSpec::new("cpd00027_e0", -5.0, 100.0),
                                                                       CompoundBoundSpec::new("cpd00007_e0", -10.0, 100.0),
                                                                       CompoundBoundSpec::new("cpd00013_e0", -10.0, 100.0),
                                                                       CompoundBoundSpec::new("cpd00001_e0", -100.0, 100.0)] })?;
    println!("Medio creado: {}", medium_id);

    // 2. Red draft desde la plantilla core. El genoma anota poco: la red
    //    queda sin ruta de glutamato y con crecimiento base cero.
    let genome = GenomeSource::new("demo_organism", vec!["ackA".to_string()]);
    let network_id = service.build_network(&genome, "core").await?;
    println!("Red draft construida: {}", network_id);

    // 3. Gapfilling hacia un crecimiento objetivo de 0.01
    let response = service.gapfill(&network_id, &medium_id, 0.01, GapfillCallOptions::default()).await?;
    println!("\nGapfilling: {:?} (exitoso: {})", response.outcome, response.gapfilling_successful);
    println!("  crecimiento: {} -> {} (objetivo {})",
             response.statistics.growth_rate_before,
             response.statistics.growth_rate_after,
             response.statistics.target_growth);
    println!("  StageA: {}/{} condiciones pasaron, {} reacciones",
             response.statistics.stage_a.conditions_passed,
             response.statistics.stage_a.conditions_tested,
             response.statistics.stage_a.reactions_added);
    println!("  StageB: {} reacciones", response.statistics.stage_b.reactions_added);
    for added in &response.added_reactions {
        println!("  + {} ({:?}, {:?})", added.id, added.direction, added.stage);
    }
    if let Some(warning) = &response.warning {
        println!("  aviso: {}", warning);
    }

    // 4. Análisis de flujos sobre la red reparada
    let analysis = service.analyze(&response.new_network_id, &medium_id, None).await?;
    println!("\nAnálisis de {}: {:?}, objetivo = {}",
             response.new_network_id, analysis.status, analysis.objective_value);
    for entry in &analysis.fluxes {
        println!("  {} = {}", entry.reaction_id, entry.flux);
    }

    // 5. Inventario de la sesión
    println!("\nArtefactos en sesión:");
    for entry in service.list_artifacts(None) {
        println!("  [{}] {} ({})", entry.kind, entry.id, entry.created_at.format("%H:%M:%S"));
    }
    let models = service.list_artifacts(Some(ArtifactKind::Model)).len();
    let media = service.list_artifacts(Some(ArtifactKind::Media)).len();
    println!("\n{} redes, {} medios. La red original sigue intacta en el store.", models, media);

    Ok(())
}
