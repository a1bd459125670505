//! Facade del workflow.
//! Se encarga de:
//! - Validar parámetros e identificadores antes de delegar (NotFound lleva
//!   siempre la lista de alternativas del store).
//! - Componer generador de identidades, store de sesión y orquestador para
//!   las operaciones de creación y gapfilling.
//! - Acotar con presupuesto de tiempo las llamadas largas al motor externo
//!   (spawn_blocking + timeout); al expirar se cancela la orquestación y no
//!   queda artefacto parcial.
//! - Mantener los registros de proveedores (plantillas, referencia) por
//!   nombre.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gem_core::constants::FLUX_EPSILON;
use gem_core::executor::{CancelToken, Deadline, EvaluationRequest, RunControl, StageExecutor};
use gem_core::gapfill::{GapfillOptions, GapfillOrchestrator, OutcomePolicy, StageBMode};
use gem_core::identity::{ArtifactKind, IdGenerator, VersionState};
use gem_core::store::{ArtifactEntry, ArtifactHandle, SessionStore};
use gem_core::CoreError;
use gem_domain::{CompoundKey, Medium, UptakeBound};
use gem_policies::GraduatedOutcomePolicy;

use crate::errors::ServiceError;
use crate::providers::reference::CompoundReferenceProvider;
use crate::providers::template::{GenomeSource, TemplateProvider};
use crate::workflow::responses::{AnalyzeResponse, FluxEntry, GapfillResponse};

/// Umbral de reporte para el mapa de flujos de `analyze`.
const FLUX_REPORT_THRESHOLD: f64 = 1e-6;

/// Especificación de un medio: cotas por compuesto-en-compartimento.
#[derive(Debug, Clone)]
pub struct MediumSpec {
    pub compounds: Vec<CompoundBoundSpec>,
}

#[derive(Debug, Clone)]
pub struct CompoundBoundSpec {
    /// Clave completa, p. ej. `cpd00027_e0`.
    pub compound: String,
    pub lower: f64,
    pub upper: f64,
}

impl CompoundBoundSpec {
    pub fn new(compound: &str, lower: f64, upper: f64) -> Self {
        CompoundBoundSpec { compound: compound.to_string(), lower, upper }
    }
}

/// Opciones por llamada de `gapfill`.
#[derive(Debug, Clone, Default)]
pub struct GapfillCallOptions {
    /// Omitir StageB si StageA ya alcanza el objetivo.
    pub skip_stage_b_if_met: bool,
    /// Presupuesto de tiempo; si falta, aplica el del servicio.
    pub timeout: Option<Duration>,
    /// Token de cancelación del caller.
    pub cancel: Option<CancelToken>,
}

pub struct WorkflowService {
    store: Arc<SessionStore>,
    executor: Arc<dyn StageExecutor>,
    policy: Arc<dyn OutcomePolicy>,
    template_providers: HashMap<String, Box<dyn TemplateProvider>>,
    reference_provider: Box<dyn CompoundReferenceProvider>,
    gapfill_options: GapfillOptions,
    gapfill_timeout: Duration,
    analyze_timeout: Duration,
}

impl WorkflowService {
    pub fn new(store: Arc<SessionStore>, executor: Arc<dyn StageExecutor>,
               reference_provider: Box<dyn CompoundReferenceProvider>)
               -> Self {
        WorkflowService { store,
                          executor,
                          policy: Arc::new(GraduatedOutcomePolicy::default()),
                          template_providers: HashMap::new(),
                          reference_provider,
                          gapfill_options: GapfillOptions::default(),
                          gapfill_timeout: Duration::from_secs(600),
                          analyze_timeout: Duration::from_secs(30) }
    }

    pub fn with_gapfill_options(mut self, options: GapfillOptions) -> Self {
        self.gapfill_options = options;
        self
    }

    pub fn with_timeouts(mut self, gapfill: Duration, analyze: Duration) -> Self {
        self.gapfill_timeout = gapfill;
        self.analyze_timeout = analyze;
        self
    }

    /// Registra un proveedor de plantillas bajo su propio nombre.
    pub fn register_template_provider(&mut self, provider: Box<dyn TemplateProvider>) {
        self.template_providers.insert(provider.get_name().to_string(), provider);
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Crea un medio inmutable y lo registra bajo un id base fresco.
    pub fn create_medium(&self, spec: MediumSpec) -> Result<String, ServiceError> {
        if spec.compounds.is_empty() {
            return Err(ServiceError::Validation("el medio debe definir al menos un compuesto".to_string()));
        }
        let mut pairs: Vec<(CompoundKey, UptakeBound)> = Vec::with_capacity(spec.compounds.len());
        for c in &spec.compounds {
            let key = CompoundKey::parse(&c.compound)
                .map_err(|e| ServiceError::Validation(format!("compuesto '{}': {}", c.compound, e)))?;
            let bound = UptakeBound::new(c.lower, c.upper)
                .map_err(|e| ServiceError::Validation(format!("compuesto '{}': {}", c.compound, e)))?;
            pairs.push((key, bound));
        }
        let id = IdGenerator::new_base_id(ArtifactKind::Media, |candidate| self.store.contains(candidate))?;
        let medium = Medium::new(&id, pairs)?;
        self.store.put(ArtifactHandle::Medium(medium))?;
        Ok(id)
    }

    /// Construye una red draft desde una plantilla registrada y la anota con
    /// el servicio de referencia. El id queda con sufijo `draft`.
    pub async fn build_network(&self, genome: &GenomeSource, template_name: &str) -> Result<String, ServiceError> {
        let provider = self.template_providers
                           .get(template_name)
                           .ok_or_else(|| ServiceError::NotFound { id: template_name.to_string(),
                                                                   hints: self.template_providers.keys().cloned().collect() })?;
        let draft = provider.build_draft(genome, &HashMap::new())
                            .await
                            .map_err(|e| ServiceError::Provider { name: provider.get_name().to_string(),
                                                                  message: e.to_string() })?;

        // Nombre del genoma como base del id si sirve; si no, id base fresco
        let id = match IdGenerator::new_named_id(&genome.genome_id, VersionState::draft(),
                                                 |candidate| self.store.contains(candidate)) {
            Ok(id) => id,
            Err(CoreError::Validation(_)) => {
                let base = IdGenerator::new_base_id(ArtifactKind::Model, |candidate| self.store.contains(candidate))?;
                format!("{}.{}", base, VersionState::draft())
            }
            Err(e) => return Err(e.into()),
        };

        let mut network = draft.deep_clone_as(&id)?;
        // La anotación es enriquecimiento: un miss del servicio de
        // referencia no invalida la red
        let keys: Vec<CompoundKey> = network.metabolites().map(|m| m.key().clone()).collect();
        for key in keys {
            if let Ok(Some(record)) = self.reference_provider.lookup(key.compound()).await {
                network.annotate_metabolite(&key, Some(record.name), record.formula);
            }
        }
        self.store.put(ArtifactHandle::Network(network))?;
        Ok(id)
    }

    /// Ejecuta la orquestación de gapfilling con presupuesto de tiempo.
    pub async fn gapfill(&self, network_id: &str, medium_id: &str, target_growth: f64, call: GapfillCallOptions)
                         -> Result<GapfillResponse, ServiceError> {
        if !(target_growth > 0.0) || !target_growth.is_finite() {
            return Err(ServiceError::Validation(format!("target_growth debe ser > 0 (llegó {})", target_growth)));
        }
        // Preflight de ids: NotFound inmediato, sin tocar al orquestador
        self.store.get_network(network_id)?;
        self.store.get_medium(medium_id)?;

        let timeout = call.timeout.unwrap_or(self.gapfill_timeout);
        let cancel = call.cancel.unwrap_or_default();
        let control = RunControl::new(cancel.clone(), Deadline::after(timeout));
        let mut options = self.gapfill_options;
        if call.skip_stage_b_if_met {
            options.stage_b_mode = StageBMode::SkipIfStageAMeetsTarget;
        }
        let orchestrator = GapfillOrchestrator::with_options(self.executor.clone(), self.policy.clone(), options);

        let store = self.store.clone();
        let nid = network_id.to_string();
        let mid = medium_id.to_string();
        let handle = tokio::task::spawn_blocking(move || orchestrator.run(&store, &nid, &mid, target_growth, &control));

        match tokio::time::timeout(timeout, handle).await {
            Ok(joined) => {
                let run = joined.map_err(|e| ServiceError::Internal(format!("tarea de gapfill: {}", e)))??;
                Ok(GapfillResponse::from_run(&run))
            }
            Err(_) => {
                // Abortar la orquestación en su siguiente checkpoint; no se
                // materializa artefacto parcial
                cancel.cancel();
                Err(ServiceError::Timeout(format!("gapfilling de '{}' tras {:?}", network_id, timeout)))
            }
        }
    }

    /// Análisis de flujos de solo lectura: get, copia profunda, restricciones
    /// de prueba sobre la copia, y descarte. Nunca toca la ruta de escritura
    /// del store.
    pub async fn analyze(&self, network_id: &str, medium_id: &str, objective_override: Option<&str>)
                         -> Result<AnalyzeResponse, ServiceError> {
        let network = self.store.get_network(network_id)?;
        let medium = self.store.get_medium(medium_id)?;
        let mut working = network.deep_clone_as(&format!("{}__analysis", network_id))?;
        if let Some(objective) = objective_override {
            working.set_objective(objective)
                   .map_err(|e| ServiceError::Validation(format!("objective_override '{}': {}", objective, e)))?;
        }

        let control = RunControl::new(CancelToken::new(), Deadline::after(self.analyze_timeout));
        let cancel = control.cancel.clone();
        let executor = self.executor.clone();
        let handle = tokio::task::spawn_blocking(move || {
            executor.evaluate(&EvaluationRequest { network: &working,
                                                   medium: &medium,
                                                   target_growth: FLUX_EPSILON,
                                                   propose_repairs: false },
                              &control)
        });

        match tokio::time::timeout(self.analyze_timeout, handle).await {
            Ok(joined) => {
                let evaluation = joined.map_err(|e| ServiceError::Internal(format!("tarea de análisis: {}", e)))?
                                       .map_err(|e| ServiceError::from(CoreError::from(e)))?;
                let fluxes = evaluation.fluxes
                                       .iter()
                                       .filter(|(_, v)| v.abs() > FLUX_REPORT_THRESHOLD)
                                       .map(|(id, v)| FluxEntry { reaction_id: id.clone(), flux: *v })
                                       .collect();
                Ok(AnalyzeResponse { status: evaluation.status,
                                     objective_value: evaluation.achieved_growth,
                                     fluxes })
            }
            Err(_) => {
                cancel.cancel();
                Err(ServiceError::Timeout(format!("análisis de '{}' tras {:?}", network_id, self.analyze_timeout)))
            }
        }
    }

    /// Lista artefactos registrados, opcionalmente filtrados por clase.
    pub fn list_artifacts(&self, kind: Option<ArtifactKind>) -> Vec<ArtifactEntry> {
        self.store.entries(kind)
    }
}
